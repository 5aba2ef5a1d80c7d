//! Rental pricing
//!
//! The first three days cost 1.0 each; every following day costs 0.5.
//! Durations below one day are billed as one day.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Days billed at the base rate
pub const BASE_RATE_DAYS: i64 = 3;
/// Daily rate for the first [`BASE_RATE_DAYS`] days
pub const BASE_DAILY_RATE: Decimal = dec!(1.0);
/// Daily rate for every day after [`BASE_RATE_DAYS`]
pub const EXTENDED_DAILY_RATE: Decimal = dec!(0.5);

/// Cost of renting a movie for `days` days
pub fn cost(days: i64) -> Decimal {
    let days = days.max(1);
    let base_days = days.min(BASE_RATE_DAYS);
    let extended_days = (days - BASE_RATE_DAYS).max(0);

    Decimal::from(base_days) * BASE_DAILY_RATE + Decimal::from(extended_days) * EXTENDED_DAILY_RATE
}

/// Whole calendar days between two dates, never less than one
pub fn elapsed_days(started_on: NaiveDate, returned_on: NaiveDate) -> i64 {
    (returned_on - started_on).num_days().max(1)
}

/// Charge for a rental started on `started_on` and returned on `returned_on`
pub fn rental_charge(started_on: NaiveDate, returned_on: NaiveDate) -> Decimal {
    cost(elapsed_days(started_on, returned_on))
}
