//! One loan, from checkout to settlement.
//!
//! A transaction is created by the registry when an item is borrowed and is
//! never deleted; the transaction log is append-only. The fine is fixed once,
//! at the moment the loan is first returned, and never recomputed.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Fee granularity: partial overdue days under 24 hours count as zero.
const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub user_id: String,
    pub item_id: String,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub fine_amount: f64,
}

impl Transaction {
    pub fn new(
        transaction_id: impl Into<String>,
        user_id: impl Into<String>,
        item_id: impl Into<String>,
        borrow_duration_days: i64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            user_id: user_id.into(),
            item_id: item_id.into(),
            borrow_date: now,
            due_date: now + Duration::days(borrow_duration_days),
            return_date: None,
            fine_amount: 0.0,
        }
    }

    pub fn is_returned(&self) -> bool {
        self.return_date.is_some()
    }

    /// Settle the loan. Idempotent: once returned, later calls hand back the
    /// stored fine without touching the return date.
    pub fn process_return(&mut self, late_fee_per_day: f64, now: DateTime<Utc>) -> f64 {
        if self.is_returned() {
            return self.fine_amount;
        }

        self.return_date = Some(now);
        if now > self.due_date {
            self.fine_amount = whole_days_between(self.due_date, now) as f64 * late_fee_per_day;
        }
        self.fine_amount
    }

    /// For a settled loan this is a fact about the return date; for an open
    /// one it depends on `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.return_date {
            Some(returned) => returned > self.due_date,
            None => now > self.due_date,
        }
    }

    pub fn days_overdue(&self, now: DateTime<Utc>) -> i64 {
        if !self.is_overdue(now) {
            return 0;
        }
        let end = self.return_date.unwrap_or(now);
        whole_days_between(self.due_date, end)
    }
}

/// Truncating division of elapsed seconds by 86 400, matching the fee
/// granularity. Callers guarantee `end >= start`.
fn whole_days_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_seconds() / SECONDS_PER_DAY
}
