//! The registry owns every user, catalog item and transaction, and enforces
//! the cross-entity rules: unique ids, item availability, per-role borrow
//! limits. It is the only code that flips an item between available and
//! borrowed, so the item invariant (unavailable ⇔ has a borrower) can be
//! audited here and nowhere else.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::error::{LibrisError, Result};
use crate::model::{ItemType, LibraryItem, Person};
use crate::transaction::Transaction;

/// One row of the overdue report.
#[derive(Debug, Clone)]
pub struct OverdueEntry {
    pub transaction_id: String,
    pub user_id: String,
    pub item_id: String,
    pub due_date: DateTime<Utc>,
    pub days_overdue: i64,
}

/// Per-user aggregate across the whole transaction log. `total_fines` only
/// ever counts settled loans, since open ones carry a zero fine.
#[derive(Debug, Clone)]
pub struct UserActivity {
    pub user_id: String,
    pub total_borrowed: usize,
    pub currently_borrowed: usize,
    pub total_fines: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct LibraryStats {
    pub total_users: usize,
    pub total_items: usize,
    pub available_items: usize,
    pub total_transactions: usize,
}

/// In-memory arena of all library state. Constructed explicitly and passed
/// around; there is no global instance.
///
/// BTreeMap keys give listings and search results a stable per-id order.
#[derive(Debug, Default)]
pub struct Registry {
    users: BTreeMap<String, Person>,
    items: BTreeMap<String, LibraryItem>,
    transactions: Vec<Transaction>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- users ----

    pub fn register_user(&mut self, person: Person) -> Result<()> {
        if self.users.contains_key(&person.user_id) {
            return Err(LibrisError::DuplicateId(person.user_id));
        }
        self.users.insert(person.user_id.clone(), person);
        Ok(())
    }

    pub fn get_user(&self, user_id: &str) -> Result<&Person> {
        self.users
            .get(user_id)
            .ok_or_else(|| LibrisError::UserNotFound(user_id.to_string()))
    }

    pub fn authenticate(&self, user_id: &str, password: &str) -> Result<&Person> {
        let user = self.get_user(user_id)?;
        if !user.verify_password(password) {
            return Err(LibrisError::AuthFailed(user_id.to_string()));
        }
        Ok(user)
    }

    pub fn users(&self) -> impl Iterator<Item = &Person> {
        self.users.values()
    }

    // ---- catalog ----

    pub fn add_item(&mut self, item: LibraryItem) -> Result<()> {
        if self.items.contains_key(&item.item_id) {
            return Err(LibrisError::DuplicateId(item.item_id));
        }
        self.items.insert(item.item_id.clone(), item);
        Ok(())
    }

    pub fn get_item(&self, item_id: &str) -> Result<&LibraryItem> {
        self.items
            .get(item_id)
            .ok_or_else(|| LibrisError::ItemNotFound(item_id.to_string()))
    }

    pub fn items(&self) -> impl Iterator<Item = &LibraryItem> {
        self.items.values()
    }

    pub fn available_items(&self) -> impl Iterator<Item = &LibraryItem> {
        self.items.values().filter(|i| i.available)
    }

    /// Case-insensitive substring match against titles.
    pub fn search_by_title(&self, term: &str) -> Vec<&LibraryItem> {
        let term_lower = term.to_lowercase();
        self.items
            .values()
            .filter(|i| i.title.to_lowercase().contains(&term_lower))
            .collect()
    }

    pub fn search_by_type(&self, item_type: ItemType) -> Vec<&LibraryItem> {
        self.items
            .values()
            .filter(|i| i.item_type() == item_type)
            .collect()
    }

    // ---- loans ----

    /// Number of unreturned loans held by a user.
    pub fn active_borrow_count(&self, user_id: &str) -> usize {
        self.transactions
            .iter()
            .filter(|t| t.user_id == user_id && !t.is_returned())
            .count()
    }

    /// Check out an item.
    ///
    /// Runs as one logical step: resolve both entities, check availability,
    /// check the borrower's role limit, append the transaction, flip the
    /// item. In a concurrent setting the whole sequence would need a single
    /// lock per registry — two borrowers racing for one item must resolve to
    /// exactly one success and one `AlreadyBorrowed`.
    pub fn borrow_item(
        &mut self,
        user_id: &str,
        item_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Transaction> {
        let user = self.get_user(user_id)?;
        let role = user.role();
        let item = self.get_item(item_id)?;

        if !item.available {
            return Err(LibrisError::AlreadyBorrowed(item_id.to_string()));
        }

        let limit = role.max_borrow_limit();
        if self.active_borrow_count(user_id) >= limit {
            return Err(LibrisError::BorrowLimitExceeded {
                user_id: user_id.to_string(),
                limit,
            });
        }

        let tid = format!("T{}", self.transactions.len() + 1);
        let tx = Transaction::new(tid, user_id, item_id, role.borrow_duration_days(), now);
        self.transactions.push(tx.clone());

        // get_item above proved the key exists
        if let Some(item) = self.items.get_mut(item_id) {
            item.check_out(user_id);
        }

        Ok(tx)
    }

    /// Settle the unique active loan matching both ids and put the item back
    /// in circulation. Returns the fine for display.
    pub fn return_item(&mut self, user_id: &str, item_id: &str, now: DateTime<Utc>) -> Result<f64> {
        self.get_user(user_id)?;
        let fee = self.get_item(item_id)?.late_fee_per_day();

        let tx = self
            .transactions
            .iter_mut()
            .find(|t| t.user_id == user_id && t.item_id == item_id && !t.is_returned())
            .ok_or_else(|| LibrisError::NoActiveBorrow {
                user_id: user_id.to_string(),
                item_id: item_id.to_string(),
            })?;

        let fine = tx.process_return(fee, now);

        if let Some(item) = self.items.get_mut(item_id) {
            item.check_in();
        }

        Ok(fine)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transactions_for_user(&self, user_id: &str) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .collect()
    }

    // ---- reports ----

    /// Open loans past their due date.
    pub fn overdue_report(&self, now: DateTime<Utc>) -> Vec<OverdueEntry> {
        self.transactions
            .iter()
            .filter(|t| !t.is_returned() && t.is_overdue(now))
            .map(|t| OverdueEntry {
                transaction_id: t.transaction_id.clone(),
                user_id: t.user_id.clone(),
                item_id: t.item_id.clone(),
                due_date: t.due_date,
                days_overdue: t.days_overdue(now),
            })
            .collect()
    }

    pub fn user_activity(&self, user_id: &str) -> Result<UserActivity> {
        self.get_user(user_id)?;

        let mut activity = UserActivity {
            user_id: user_id.to_string(),
            total_borrowed: 0,
            currently_borrowed: 0,
            total_fines: 0.0,
        };
        for tx in self.transactions.iter().filter(|t| t.user_id == user_id) {
            activity.total_borrowed += 1;
            if !tx.is_returned() {
                activity.currently_borrowed += 1;
            }
            activity.total_fines += tx.fine_amount;
        }
        Ok(activity)
    }

    pub fn stats(&self) -> LibraryStats {
        LibraryStats {
            total_users: self.users.len(),
            total_items: self.items.len(),
            available_items: self.items.values().filter(|i| i.available).count(),
            total_transactions: self.transactions.len(),
        }
    }

    /// Rebuild a registry from already-validated parts; used by the loader.
    pub(crate) fn from_parts(
        users: Vec<Person>,
        items: Vec<LibraryItem>,
        transactions: Vec<Transaction>,
    ) -> Result<Self> {
        let mut registry = Registry::new();
        for user in users {
            registry.register_user(user)?;
        }
        for item in items {
            registry.add_item(item)?;
        }
        registry.transactions = transactions;
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 15, 10, 0, 0).unwrap()
    }

    fn seeded() -> Registry {
        let mut reg = Registry::new();
        reg.register_user(Person::student(
            "S001", "Ada Lovelace", "ada@uni.edu", "pw", 21, "ST-9", "CS", 2,
        ))
        .unwrap();
        reg.register_user(Person::faculty(
            "F001",
            "Grace Hopper",
            "grace@uni.edu",
            "pw",
            55,
            "E-12",
            "Computer Science",
            "Professor",
        ))
        .unwrap();
        reg.add_item(LibraryItem::book(
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
        reg.add_item(LibraryItem::magazine(
            "M001", "Wired", "Condé Nast", 2024, 7, "July", "Tech",
        ))
        .unwrap();
        reg
    }

    fn assert_availability_invariant(reg: &Registry) {
        for item in reg.items() {
            assert_eq!(
                item.available,
                item.current_borrower.is_none(),
                "invariant broken for {}",
                item.item_id
            );
        }
    }

    #[test]
    fn duplicate_user_id_is_rejected_and_first_wins() {
        let mut reg = seeded();
        let err = reg
            .register_user(Person::student(
                "S001", "Impostor", "x@x", "pw2", 30, "ST-0", "Art", 1,
            ))
            .unwrap_err();
        assert!(matches!(err, LibrisError::DuplicateId(_)));
        assert_eq!(reg.get_user("S001").unwrap().name, "Ada Lovelace");
    }

    #[test]
    fn duplicate_item_id_is_rejected() {
        let mut reg = seeded();
        let err = reg
            .add_item(LibraryItem::magazine("B001", "X", "Y", 2020, 1, "Jan", "Z"))
            .unwrap_err();
        assert!(matches!(err, LibrisError::DuplicateId(_)));
    }

    #[test]
    fn authenticate_distinguishes_missing_user_from_bad_password() {
        let reg = seeded();
        assert!(matches!(
            reg.authenticate("NOPE", "pw").unwrap_err(),
            LibrisError::UserNotFound(_)
        ));
        assert!(matches!(
            reg.authenticate("S001", "wrong").unwrap_err(),
            LibrisError::AuthFailed(_)
        ));
        assert_eq!(reg.authenticate("S001", "pw").unwrap().user_id, "S001");
    }

    #[test]
    fn title_search_is_case_insensitive_substring() {
        let reg = seeded();
        for term in ["algorithms", "ALGO", "duction"] {
            let hits = reg.search_by_title(term);
            assert_eq!(hits.len(), 1, "term {term:?}");
            assert_eq!(hits[0].item_id, "B001");
        }
        assert!(reg.search_by_title("cookbook").is_empty());
    }

    #[test]
    fn type_search_matches_exact_tag() {
        let reg = seeded();
        let mags = reg.search_by_type(ItemType::Magazine);
        assert_eq!(mags.len(), 1);
        assert_eq!(mags[0].item_id, "M001");
        assert!(reg.search_by_type(ItemType::Journal).is_empty());
    }

    #[test]
    fn borrow_creates_transaction_and_flips_item() {
        let mut reg = seeded();
        let tx = reg.borrow_item("S001", "B001", now()).unwrap();
        assert_eq!(tx.transaction_id, "T1");
        assert_eq!(tx.due_date, now() + Duration::days(Role::Student.borrow_duration_days()));

        let item = reg.get_item("B001").unwrap();
        assert!(!item.available);
        assert_eq!(item.current_borrower.as_deref(), Some("S001"));
        assert_availability_invariant(&reg);
    }

    #[test]
    fn borrowing_an_unavailable_item_fails_for_everyone() {
        let mut reg = seeded();
        reg.borrow_item("S001", "B001", now()).unwrap();

        for uid in ["F001", "S001"] {
            let err = reg.borrow_item(uid, "B001", now()).unwrap_err();
            assert!(matches!(err, LibrisError::AlreadyBorrowed(_)), "user {uid}");
        }
        assert_availability_invariant(&reg);
    }

    #[test]
    fn borrow_resolves_entities_first() {
        let mut reg = seeded();
        assert!(matches!(
            reg.borrow_item("NOPE", "B001", now()).unwrap_err(),
            LibrisError::UserNotFound(_)
        ));
        assert!(matches!(
            reg.borrow_item("S001", "NOPE", now()).unwrap_err(),
            LibrisError::ItemNotFound(_)
        ));
    }

    #[test]
    fn limit_blocks_then_a_return_frees_a_slot() {
        let mut reg = seeded();
        // Student limit is 5; give the shelf enough books.
        for i in 0..6 {
            reg.add_item(LibraryItem::book(
                format!("X{i}"),
                format!("Filler {i}"),
                "Pub",
                2020,
                "isbn",
                "A",
                "G",
                100,
            ))
            .unwrap();
        }
        for i in 0..5 {
            reg.borrow_item("S001", &format!("X{i}"), now()).unwrap();
        }
        let err = reg.borrow_item("S001", "X5", now()).unwrap_err();
        assert!(matches!(err, LibrisError::BorrowLimitExceeded { limit: 5, .. }));

        reg.return_item("S001", "X0", now()).unwrap();
        reg.borrow_item("S001", "X5", now()).unwrap();
        assert_eq!(reg.active_borrow_count("S001"), 5);
        assert_availability_invariant(&reg);
    }

    #[test]
    fn faculty_can_hold_ten_but_not_eleven() {
        let mut reg = seeded();
        for i in 0..11 {
            reg.add_item(LibraryItem::journal(
                format!("J{i:02}"),
                format!("Annals {i}"),
                "Springer",
                2021,
                i,
                "Math",
                "Ed",
                true,
            ))
            .unwrap();
        }
        for i in 0..10 {
            reg.borrow_item("F001", &format!("J{i:02}"), now()).unwrap();
        }
        let err = reg.borrow_item("F001", "J10", now()).unwrap_err();
        assert!(matches!(err, LibrisError::BorrowLimitExceeded { limit: 10, .. }));
    }

    #[test]
    fn transaction_ids_are_sequential() {
        let mut reg = seeded();
        reg.borrow_item("S001", "B001", now()).unwrap();
        reg.borrow_item("F001", "M001", now()).unwrap();
        reg.return_item("S001", "B001", now()).unwrap();
        reg.borrow_item("S001", "B001", now()).unwrap();

        let ids: Vec<_> = reg
            .transactions()
            .iter()
            .map(|t| t.transaction_id.as_str())
            .collect();
        assert_eq!(ids, ["T1", "T2", "T3"]);
    }

    #[test]
    fn late_return_charges_the_item_rate() {
        let mut reg = seeded();
        reg.borrow_item("S001", "B001", now()).unwrap();

        // 16 days after borrowing a 14-day loan: two whole days late.
        let fine = reg
            .return_item("S001", "B001", now() + Duration::days(16))
            .unwrap();
        assert_eq!(fine, 2.0 * 0.50);
        assert!(reg.get_item("B001").unwrap().available);
        assert_availability_invariant(&reg);
    }

    #[test]
    fn return_without_active_borrow_is_an_error() {
        let mut reg = seeded();
        let err = reg.return_item("S001", "B001", now()).unwrap_err();
        assert!(matches!(err, LibrisError::NoActiveBorrow { .. }));

        // Returning twice hits the same error once the loan is settled.
        reg.borrow_item("S001", "B001", now()).unwrap();
        reg.return_item("S001", "B001", now()).unwrap();
        let err = reg.return_item("S001", "B001", now()).unwrap_err();
        assert!(matches!(err, LibrisError::NoActiveBorrow { .. }));
    }

    #[test]
    fn overdue_report_lists_only_open_late_loans() {
        let mut reg = seeded();
        reg.borrow_item("S001", "B001", now()).unwrap();
        reg.borrow_item("F001", "M001", now()).unwrap();

        // Student loan (14d) is overdue at +20d; faculty loan (30d) is not.
        let report = reg.overdue_report(now() + Duration::days(20));
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].user_id, "S001");
        assert_eq!(report[0].days_overdue, 6);

        // Settling it empties the report.
        reg.return_item("S001", "B001", now() + Duration::days(20)).unwrap();
        assert!(reg.overdue_report(now() + Duration::days(20)).is_empty());
    }

    #[test]
    fn user_activity_sums_settled_fines() {
        let mut reg = seeded();
        reg.borrow_item("S001", "B001", now()).unwrap();
        reg.return_item("S001", "B001", now() + Duration::days(16)).unwrap();
        reg.borrow_item("S001", "M001", now()).unwrap();

        let activity = reg.user_activity("S001").unwrap();
        assert_eq!(activity.total_borrowed, 2);
        assert_eq!(activity.currently_borrowed, 1);
        assert_eq!(activity.total_fines, 1.00);

        assert!(matches!(
            reg.user_activity("NOPE").unwrap_err(),
            LibrisError::UserNotFound(_)
        ));
    }

    #[test]
    fn stats_track_counts() {
        let mut reg = seeded();
        let s = reg.stats();
        assert_eq!((s.total_users, s.total_items), (2, 2));
        assert_eq!(s.available_items, 2);
        assert_eq!(s.total_transactions, 0);

        reg.borrow_item("S001", "B001", now()).unwrap();
        let s = reg.stats();
        assert_eq!(s.available_items, 1);
        assert_eq!(s.total_transactions, 1);
    }
}
