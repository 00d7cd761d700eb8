use chrono::{DateTime, Utc};
use colored::Colorize;
use libris::model::{LibraryItem, Person, RoleDetails};
use libris::registry::{LibraryStats, OverdueEntry, UserActivity};
use libris::transaction::Transaction;
use timeago::Formatter;
use unicode_width::UnicodeWidthStr;

const TITLE_WIDTH: usize = 40;

pub(crate) fn print_users(users: &[Person]) {
    if users.is_empty() {
        println!("No registered users.");
        return;
    }
    for user in users {
        let extra = match &user.details {
            RoleDetails::Student { major, year, .. } => format!("{major}, year {year}"),
            RoleDetails::Faculty {
                department,
                designation,
                ..
            } => format!("{designation}, {department}"),
            RoleDetails::Librarian { shift, .. } => format!("{shift} shift"),
        };
        println!(
            "{}  {} {}  {}",
            user.user_id.yellow(),
            user.name.bold(),
            format!("[{}]", user.role()).cyan(),
            extra.dimmed()
        );
    }
}

pub(crate) fn print_items(items: &[LibraryItem]) {
    if items.is_empty() {
        println!("No items found.");
        return;
    }
    for item in items {
        let status = match &item.current_borrower {
            None => "available".green().to_string(),
            Some(uid) => format!("borrowed by {uid}").red().to_string(),
        };
        println!(
            "{}  {}{}  {}  {}",
            item.item_id.yellow(),
            item.title.bold(),
            padding(&item.title),
            format!("[{}]", item.item_type()).cyan(),
            status
        );
    }
}

pub(crate) fn print_transactions(transactions: &[Transaction], now: DateTime<Utc>) {
    if transactions.is_empty() {
        println!("No transactions.");
        return;
    }
    for tx in transactions {
        let borrowed = format_time_ago(tx.borrow_date, now);
        let status = match tx.return_date {
            Some(returned) => {
                let when = format_time_ago(returned, now);
                if tx.fine_amount > 0.0 {
                    format!("returned {when}, fine {:.2}", tx.fine_amount).yellow().to_string()
                } else {
                    format!("returned {when}").green().to_string()
                }
            }
            None if tx.is_overdue(now) => {
                format!("{} days overdue", tx.days_overdue(now)).red().to_string()
            }
            None => format!("due {}", tx.due_date.format("%Y-%m-%d")).normal().to_string(),
        };
        println!(
            "{}  {} → {}  borrowed {}  {}",
            tx.transaction_id.yellow(),
            tx.user_id,
            tx.item_id,
            borrowed.dimmed(),
            status
        );
    }
}

pub(crate) fn print_overdue(entries: &[OverdueEntry]) {
    if entries.is_empty() {
        println!("No overdue items.");
        return;
    }
    println!("{}", "Overdue items".bold());
    for entry in entries {
        println!(
            "{}  {} holds {}  due {}  {}",
            entry.transaction_id.yellow(),
            entry.user_id,
            entry.item_id,
            entry.due_date.format("%Y-%m-%d"),
            format!("{} days overdue", entry.days_overdue).red()
        );
    }
}

pub(crate) fn print_activity(activity: &UserActivity, currency: &str) {
    println!("{}", format!("Activity for {}", activity.user_id).bold());
    println!("  Total items borrowed:  {}", activity.total_borrowed);
    println!("  Currently borrowed:    {}", activity.currently_borrowed);
    println!(
        "  Total fines:           {currency}{:.2}",
        activity.total_fines
    );
}

pub(crate) fn print_stats(stats: &LibraryStats) {
    println!("Users:        {}", stats.total_users);
    println!("Items:        {}", stats.total_items);
    println!("  available:  {}", stats.available_items);
    println!("Transactions: {}", stats.total_transactions);
}

fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);
    Formatter::new().convert(duration.to_std().unwrap_or_default())
}

fn padding(title: &str) -> String {
    let width = title.width();
    if width >= TITLE_WIDTH {
        String::new()
    } else {
        " ".repeat(TITLE_WIDTH - width)
    }
}
