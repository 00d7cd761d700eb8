//! Text dump of the whole registry, and the loader for it.
//!
//! The format is one pipe-delimited record per entity, tagged with a type
//! discriminator, with each collection wrapped in sentinel lines:
//!
//! ```text
//! USERS_START
//! STUDENT|S001|Ada Lovelace|ada@uni.edu|pw|21|ST-9|CS|2
//! USERS_END
//! ITEMS_START
//! BOOK|B001|Introduction to Algorithms|MIT Press|2009|1||978-0262033848|Cormen|Computer Science|1312
//! ITEMS_END
//! TRANSACTIONS_START
//! T1|S001|B001|2025-09-01T08:00:00+00:00|2025-09-15T08:00:00+00:00|-|0
//! TRANSACTIONS_END
//! ```
//!
//! Timestamps are RFC 3339, booleans are `1`/`0`, an unset return date is
//! `-`, an unset borrower is the empty field. Field values themselves must
//! not contain `|`; ids and the catalog fields this system deals in never do.

use chrono::{DateTime, Utc};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{LibrisError, Result};
use crate::model::{ItemDetails, LibraryItem, Person, RoleDetails};
use crate::registry::Registry;
use crate::transaction::Transaction;

const USERS_START: &str = "USERS_START";
const USERS_END: &str = "USERS_END";
const ITEMS_START: &str = "ITEMS_START";
const ITEMS_END: &str = "ITEMS_END";
const TRANSACTIONS_START: &str = "TRANSACTIONS_START";
const TRANSACTIONS_END: &str = "TRANSACTIONS_END";

// ---- serialization ----

pub fn user_record(person: &Person) -> String {
    let base = format!(
        "{}|{}|{}|{}|{}",
        person.user_id, person.name, person.email, person.password, person.age
    );
    match &person.details {
        RoleDetails::Student {
            student_id,
            major,
            year,
        } => format!("STUDENT|{base}|{student_id}|{major}|{year}"),
        RoleDetails::Faculty {
            employee_id,
            department,
            designation,
        } => format!("FACULTY|{base}|{employee_id}|{department}|{designation}"),
        RoleDetails::Librarian { employee_id, shift } => {
            format!("LIBRARIAN|{base}|{employee_id}|{shift}")
        }
    }
}

pub fn item_record(item: &LibraryItem) -> String {
    let base = format!(
        "{}|{}|{}|{}|{}|{}",
        item.item_id,
        item.title,
        item.publisher,
        item.publication_year,
        flag(item.available),
        item.current_borrower.as_deref().unwrap_or("")
    );
    match &item.details {
        ItemDetails::Book {
            isbn,
            author,
            genre,
            total_pages,
        } => format!("BOOK|{base}|{isbn}|{author}|{genre}|{total_pages}"),
        ItemDetails::Magazine {
            issue_number,
            month,
            category,
        } => format!("MAGAZINE|{base}|{issue_number}|{month}|{category}"),
        ItemDetails::Journal {
            volume_number,
            research_field,
            editor,
            peer_reviewed,
        } => format!(
            "JOURNAL|{base}|{volume_number}|{research_field}|{editor}|{}",
            flag(*peer_reviewed)
        ),
    }
}

pub fn transaction_record(tx: &Transaction) -> String {
    let returned = match tx.return_date {
        Some(d) => d.to_rfc3339(),
        None => "-".to_string(),
    };
    format!(
        "{}|{}|{}|{}|{}|{}|{}",
        tx.transaction_id,
        tx.user_id,
        tx.item_id,
        tx.borrow_date.to_rfc3339(),
        tx.due_date.to_rfc3339(),
        returned,
        tx.fine_amount
    )
}

pub fn write_dump<W: Write>(mut w: W, registry: &Registry) -> Result<()> {
    writeln!(w, "{USERS_START}")?;
    for user in registry.users() {
        writeln!(w, "{}", user_record(user))?;
    }
    writeln!(w, "{USERS_END}")?;

    writeln!(w, "{ITEMS_START}")?;
    for item in registry.items() {
        writeln!(w, "{}", item_record(item))?;
    }
    writeln!(w, "{ITEMS_END}")?;

    writeln!(w, "{TRANSACTIONS_START}")?;
    for tx in registry.transactions() {
        writeln!(w, "{}", transaction_record(tx))?;
    }
    writeln!(w, "{TRANSACTIONS_END}")?;
    Ok(())
}

pub fn save_to_path<P: AsRef<Path>>(path: P, registry: &Registry) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_dump(&mut writer, registry)?;
    writer.flush()?;
    Ok(())
}

// ---- deserialization ----

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    None,
    Users,
    Items,
    Transactions,
}

pub fn read_dump<R: BufRead>(reader: R) -> Result<Registry> {
    let mut users = Vec::new();
    let mut items = Vec::new();
    let mut transactions = Vec::new();
    let mut section = Section::None;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        match line {
            USERS_START => section = Section::Users,
            ITEMS_START => section = Section::Items,
            TRANSACTIONS_START => section = Section::Transactions,
            USERS_END | ITEMS_END | TRANSACTIONS_END => section = Section::None,
            record => match section {
                Section::Users => users.push(parse_user(record)?),
                Section::Items => items.push(parse_item(record)?),
                Section::Transactions => transactions.push(parse_transaction(record)?),
                Section::None => {
                    return Err(malformed(record, "record outside any section"));
                }
            },
        }
    }

    Registry::from_parts(users, items, transactions)
}

pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Registry> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Registry::new());
    }
    let file = File::open(path)?;
    read_dump(BufReader::new(file))
}

fn parse_user(record: &str) -> Result<Person> {
    let fields: Vec<&str> = record.split('|').collect();
    let tag = fields[0];
    let details = match (tag, fields.len()) {
        ("STUDENT", 9) => RoleDetails::Student {
            student_id: fields[6].to_string(),
            major: fields[7].to_string(),
            year: parse_num(record, fields[8])?,
        },
        ("FACULTY", 9) => RoleDetails::Faculty {
            employee_id: fields[6].to_string(),
            department: fields[7].to_string(),
            designation: fields[8].to_string(),
        },
        ("LIBRARIAN", 8) => RoleDetails::Librarian {
            employee_id: fields[6].to_string(),
            shift: fields[7].to_string(),
        },
        _ => return Err(malformed(record, "unknown user tag or field count")),
    };
    Ok(Person::new(
        fields[1],
        fields[2],
        fields[3],
        fields[4],
        parse_num(record, fields[5])?,
        details,
    ))
}

fn parse_item(record: &str) -> Result<LibraryItem> {
    let fields: Vec<&str> = record.split('|').collect();
    let tag = fields[0];
    let details = match (tag, fields.len()) {
        ("BOOK", 11) => ItemDetails::Book {
            isbn: fields[7].to_string(),
            author: fields[8].to_string(),
            genre: fields[9].to_string(),
            total_pages: parse_num(record, fields[10])?,
        },
        ("MAGAZINE", 10) => ItemDetails::Magazine {
            issue_number: parse_num(record, fields[7])?,
            month: fields[8].to_string(),
            category: fields[9].to_string(),
        },
        ("JOURNAL", 11) => ItemDetails::Journal {
            volume_number: parse_num(record, fields[7])?,
            research_field: fields[8].to_string(),
            editor: fields[9].to_string(),
            peer_reviewed: parse_flag(record, fields[10])?,
        },
        _ => return Err(malformed(record, "unknown item tag or field count")),
    };

    let mut item = LibraryItem::new(
        fields[1],
        fields[2],
        fields[3],
        parse_num(record, fields[4])?,
        details,
    );
    item.available = parse_flag(record, fields[5])?;
    item.current_borrower = if fields[6].is_empty() {
        None
    } else {
        Some(fields[6].to_string())
    };
    if item.available == item.current_borrower.is_some() {
        return Err(malformed(record, "availability and borrower disagree"));
    }
    Ok(item)
}

fn parse_transaction(record: &str) -> Result<Transaction> {
    let fields: Vec<&str> = record.split('|').collect();
    if fields.len() != 7 {
        return Err(malformed(record, "expected 7 transaction fields"));
    }
    let return_date = match fields[5] {
        "-" => None,
        s => Some(parse_date(record, s)?),
    };
    Ok(Transaction {
        transaction_id: fields[0].to_string(),
        user_id: fields[1].to_string(),
        item_id: fields[2].to_string(),
        borrow_date: parse_date(record, fields[3])?,
        due_date: parse_date(record, fields[4])?,
        return_date,
        fine_amount: fields[6]
            .parse()
            .map_err(|_| malformed(record, "bad fine amount"))?,
    })
}

fn flag(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

fn parse_flag(record: &str, field: &str) -> Result<bool> {
    match field {
        "1" => Ok(true),
        "0" => Ok(false),
        _ => Err(malformed(record, "expected 0 or 1")),
    }
}

fn parse_num<T: std::str::FromStr>(record: &str, field: &str) -> Result<T> {
    field
        .parse()
        .map_err(|_| malformed(record, "bad numeric field"))
}

fn parse_date(record: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(field)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| malformed(record, "bad timestamp"))
}

fn malformed(record: &str, why: &str) -> LibrisError {
    LibrisError::InvalidOperation(format!("Malformed record ({why}): {record}"))
}
