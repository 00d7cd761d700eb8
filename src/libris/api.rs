//! # API Facade
//!
//! Thin facade over the registry: the single entry point for every operation,
//! regardless of the UI driving it. The facade stamps `now` from the injected
//! [`Clock`] and delegates; business logic stays in the core.
//!
//! Generic over `Clock` the way the store layer of a file-backed app is
//! generic over its backend: production runs `LibraryApi<SystemClock>`, tests
//! run `LibraryApi<ManualClock>` and move time by hand.

use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::error::Result;
use crate::model::{ItemType, LibraryItem, Person};
use crate::registry::{LibraryStats, OverdueEntry, Registry, UserActivity};
use crate::transaction::Transaction;

pub struct LibraryApi<C: Clock> {
    registry: Registry,
    clock: C,
}

impl<C: Clock> LibraryApi<C> {
    pub fn new(registry: Registry, clock: C) -> Self {
        Self { registry, clock }
    }

    /// The wrapped registry, for read access and for handing off to the
    /// persistence layer.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // ---- users ----

    pub fn register_user(&mut self, person: Person) -> Result<()> {
        self.registry.register_user(person)
    }

    pub fn authenticate(&self, user_id: &str, password: &str) -> Result<Person> {
        self.registry.authenticate(user_id, password).cloned()
    }

    pub fn get_user(&self, user_id: &str) -> Result<Person> {
        self.registry.get_user(user_id).cloned()
    }

    pub fn list_users(&self) -> Vec<Person> {
        self.registry.users().cloned().collect()
    }

    // ---- catalog ----

    pub fn add_item(&mut self, item: LibraryItem) -> Result<()> {
        self.registry.add_item(item)
    }

    pub fn get_item(&self, item_id: &str) -> Result<LibraryItem> {
        self.registry.get_item(item_id).cloned()
    }

    pub fn list_items(&self, available_only: bool) -> Vec<LibraryItem> {
        if available_only {
            self.registry.available_items().cloned().collect()
        } else {
            self.registry.items().cloned().collect()
        }
    }

    pub fn search_by_title(&self, term: &str) -> Vec<LibraryItem> {
        self.registry
            .search_by_title(term)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn search_by_type(&self, item_type: ItemType) -> Vec<LibraryItem> {
        self.registry
            .search_by_type(item_type)
            .into_iter()
            .cloned()
            .collect()
    }

    // ---- loans ----

    pub fn borrow_item(&mut self, user_id: &str, item_id: &str) -> Result<Transaction> {
        let now = self.clock.now();
        self.registry.borrow_item(user_id, item_id, now)
    }

    pub fn return_item(&mut self, user_id: &str, item_id: &str) -> Result<f64> {
        let now = self.clock.now();
        self.registry.return_item(user_id, item_id, now)
    }

    pub fn list_transactions(&self, user_id: Option<&str>) -> Vec<Transaction> {
        match user_id {
            Some(uid) => self
                .registry
                .transactions_for_user(uid)
                .into_iter()
                .cloned()
                .collect(),
            None => self.registry.transactions().to_vec(),
        }
    }

    // ---- reports ----

    pub fn overdue_report(&self) -> Vec<OverdueEntry> {
        self.registry.overdue_report(self.clock.now())
    }

    pub fn user_activity(&self, user_id: &str) -> Result<UserActivity> {
        self.registry.user_activity(user_id)
    }

    pub fn stats(&self) -> LibraryStats {
        self.registry.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{Duration, TimeZone};

    fn api() -> LibraryApi<ManualClock> {
        let start = Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap();
        let mut api = LibraryApi::new(Registry::new(), ManualClock::new(start));
        api.register_user(Person::student(
            "S001", "Ada", "ada@uni.edu", "pw", 21, "ST-9", "CS", 2,
        ))
        .unwrap();
        api.add_item(LibraryItem::book(
            "B001",
            "Introduction to Algorithms",
            "MIT Press",
            2009,
            "978-0262033848",
            "Cormen",
            "Computer Science",
            1312,
        ))
        .unwrap();
        api
    }

    #[test]
    fn borrow_stamps_time_from_the_clock() {
        let mut api = api();
        let tx = api.borrow_item("S001", "B001").unwrap();
        assert_eq!(tx.borrow_date, api.now());
        assert_eq!(tx.due_date, api.now() + Duration::days(14));
    }

    #[test]
    fn two_days_late_on_a_book_costs_a_dollar() {
        let mut api = api();
        api.borrow_item("S001", "B001").unwrap();

        api.clock().advance(Duration::days(16));
        let fine = api.return_item("S001", "B001").unwrap();
        assert_eq!(fine, 1.00);
        assert!(api.get_item("B001").unwrap().available);
    }

    #[test]
    fn overdue_report_follows_the_clock() {
        let mut api = api();
        api.borrow_item("S001", "B001").unwrap();
        assert!(api.overdue_report().is_empty());

        api.clock().advance(Duration::days(15));
        let report = api.overdue_report();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].item_id, "B001");
    }

    #[test]
    fn transaction_listing_filters_by_user() {
        let mut api = api();
        api.register_user(Person::librarian(
            "L001", "Jorge", "j@uni.edu", "pw", 40, "E-1", "Evening",
        ))
        .unwrap();
        api.add_item(LibraryItem::magazine(
            "M001", "Wired", "Condé Nast", 2024, 7, "July", "Tech",
        ))
        .unwrap();
        api.borrow_item("S001", "B001").unwrap();
        api.borrow_item("L001", "M001").unwrap();

        assert_eq!(api.list_transactions(None).len(), 2);
        let mine = api.list_transactions(Some("L001"));
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].item_id, "M001");
    }
}
