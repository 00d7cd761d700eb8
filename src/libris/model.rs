use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LibrisError;

/// Role of a registered user. Each role fixes the two lending policy
/// constants: how many items may be held at once and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Student,
    Faculty,
    Librarian,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Faculty => "Faculty",
            Role::Librarian => "Librarian",
        }
    }

    /// Maximum number of simultaneously unreturned loans.
    pub fn max_borrow_limit(&self) -> usize {
        match self {
            Role::Student => 5,
            Role::Faculty => 10,
            Role::Librarian => 15,
        }
    }

    /// Loan duration in days; the due date is the borrow date plus this.
    pub fn borrow_duration_days(&self) -> i64 {
        match self {
            Role::Student => 14,
            Role::Faculty => 30,
            Role::Librarian => 60,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role-specific descriptive fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RoleDetails {
    Student {
        student_id: String,
        major: String,
        /// Academic year (1-4)
        year: u8,
    },
    Faculty {
        employee_id: String,
        department: String,
        designation: String,
    },
    Librarian {
        employee_id: String,
        shift: String,
    },
}

impl RoleDetails {
    pub fn role(&self) -> Role {
        match self {
            RoleDetails::Student { .. } => Role::Student,
            RoleDetails::Faculty { .. } => Role::Faculty,
            RoleDetails::Librarian { .. } => Role::Librarian,
        }
    }
}

/// A registered user. Identity fields are fixed at registration; only email
/// and password may change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub age: u32,
    pub details: RoleDetails,
}

impl Person {
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        age: u32,
        details: RoleDetails,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            email: email.into(),
            password: password.into(),
            age,
            details,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn student(
        user_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        age: u32,
        student_id: impl Into<String>,
        major: impl Into<String>,
        year: u8,
    ) -> Self {
        Self::new(
            user_id,
            name,
            email,
            password,
            age,
            RoleDetails::Student {
                student_id: student_id.into(),
                major: major.into(),
                year,
            },
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn faculty(
        user_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        age: u32,
        employee_id: impl Into<String>,
        department: impl Into<String>,
        designation: impl Into<String>,
    ) -> Self {
        Self::new(
            user_id,
            name,
            email,
            password,
            age,
            RoleDetails::Faculty {
                employee_id: employee_id.into(),
                department: department.into(),
                designation: designation.into(),
            },
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn librarian(
        user_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        age: u32,
        employee_id: impl Into<String>,
        shift: impl Into<String>,
    ) -> Self {
        Self::new(
            user_id,
            name,
            email,
            password,
            age,
            RoleDetails::Librarian {
                employee_id: employee_id.into(),
                shift: shift.into(),
            },
        )
    }

    pub fn role(&self) -> Role {
        self.details.role()
    }

    /// Plain string comparison. Known-weak auth; hardening is out of scope.
    pub fn verify_password(&self, candidate: &str) -> bool {
        self.password == candidate
    }
}

/// Kind of a catalog item. Each kind fixes the per-day late fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    Book,
    Magazine,
    Journal,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Book => "Book",
            ItemType::Magazine => "Magazine",
            ItemType::Journal => "Journal",
        }
    }

    /// Fee charged per whole overdue day.
    pub fn late_fee_per_day(&self) -> f64 {
        match self {
            ItemType::Book => 0.50,
            ItemType::Magazine => 0.25,
            ItemType::Journal => 0.75,
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = LibrisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "book" => Ok(ItemType::Book),
            "magazine" => Ok(ItemType::Magazine),
            "journal" => Ok(ItemType::Journal),
            other => Err(LibrisError::InvalidOperation(format!(
                "Unknown item type: {other}"
            ))),
        }
    }
}

/// Type-specific descriptive fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ItemDetails {
    Book {
        isbn: String,
        author: String,
        genre: String,
        total_pages: u32,
    },
    Magazine {
        issue_number: u32,
        month: String,
        category: String,
    },
    Journal {
        volume_number: u32,
        research_field: String,
        editor: String,
        peer_reviewed: bool,
    },
}

impl ItemDetails {
    pub fn item_type(&self) -> ItemType {
        match self {
            ItemDetails::Book { .. } => ItemType::Book,
            ItemDetails::Magazine { .. } => ItemType::Magazine,
            ItemDetails::Journal { .. } => ItemType::Journal,
        }
    }
}

/// One catalog entry.
///
/// Invariant: `available == false` exactly when `current_borrower` is set.
/// Only the registry flips these two fields, and always together via
/// [`LibraryItem::check_out`] / [`LibraryItem::check_in`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryItem {
    pub item_id: String,
    pub title: String,
    pub publisher: String,
    pub publication_year: i32,
    pub available: bool,
    pub current_borrower: Option<String>,
    pub details: ItemDetails,
}

impl LibraryItem {
    pub fn new(
        item_id: impl Into<String>,
        title: impl Into<String>,
        publisher: impl Into<String>,
        publication_year: i32,
        details: ItemDetails,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            title: title.into(),
            publisher: publisher.into(),
            publication_year,
            available: true,
            current_borrower: None,
            details,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn book(
        item_id: impl Into<String>,
        title: impl Into<String>,
        publisher: impl Into<String>,
        publication_year: i32,
        isbn: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        total_pages: u32,
    ) -> Self {
        Self::new(
            item_id,
            title,
            publisher,
            publication_year,
            ItemDetails::Book {
                isbn: isbn.into(),
                author: author.into(),
                genre: genre.into(),
                total_pages,
            },
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn magazine(
        item_id: impl Into<String>,
        title: impl Into<String>,
        publisher: impl Into<String>,
        publication_year: i32,
        issue_number: u32,
        month: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self::new(
            item_id,
            title,
            publisher,
            publication_year,
            ItemDetails::Magazine {
                issue_number,
                month: month.into(),
                category: category.into(),
            },
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn journal(
        item_id: impl Into<String>,
        title: impl Into<String>,
        publisher: impl Into<String>,
        publication_year: i32,
        volume_number: u32,
        research_field: impl Into<String>,
        editor: impl Into<String>,
        peer_reviewed: bool,
    ) -> Self {
        Self::new(
            item_id,
            title,
            publisher,
            publication_year,
            ItemDetails::Journal {
                volume_number,
                research_field: research_field.into(),
                editor: editor.into(),
                peer_reviewed,
            },
        )
    }

    pub fn item_type(&self) -> ItemType {
        self.details.item_type()
    }

    pub fn late_fee_per_day(&self) -> f64 {
        self.item_type().late_fee_per_day()
    }

    pub(crate) fn check_out(&mut self, user_id: &str) {
        self.available = false;
        self.current_borrower = Some(user_id.to_string());
    }

    pub(crate) fn check_in(&mut self) {
        self.available = true;
        self.current_borrower = None;
    }
}
