//! Rental ledger records

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

/// An active rental of one movie by one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rental {
    pub user_id: Uuid,
    pub movie_id: i32,
    pub started_on: NaiveDate,
}

/// Outcome of closing a rental
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub started_on: NaiveDate,
    /// Amount debited from the user
    pub charge: Decimal,
    /// Balance after the debit
    pub balance: Decimal,
}
