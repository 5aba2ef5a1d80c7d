//! Rental ledger
//!
//! Tracks which user holds which movie. Renting records the start date;
//! returning prices the rental, debits the user and forgets the record.
//! A (user, movie) pair moves between two states only:
//! not rented -> rented -> not rented.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::{
    models::{Movie, MovieSummary},
    pricing,
    repositories::{MovieStore, RentalStore},
};

/// Source of the current calendar date
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Server clock, UTC calendar date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Rejections raised by the ledger
///
/// The display strings of the first three variants are shown to clients.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Movie does not exist.")]
    MovieNotFound,

    #[error("Cannot rent same movie twice.")]
    AlreadyRented,

    #[error("This movie was not rented.")]
    NotRented,

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct RentalLedger {
    movies: Arc<dyn MovieStore>,
    rentals: Arc<dyn RentalStore>,
    clock: Arc<dyn Clock>,
}

impl RentalLedger {
    pub fn new(
        movies: Arc<dyn MovieStore>,
        rentals: Arc<dyn RentalStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            movies,
            rentals,
            clock,
        }
    }

    /// Rent a movie starting today
    pub async fn rent(&self, user_id: Uuid, movie_id: i32) -> Result<Movie, LedgerError> {
        let movie = self
            .movies
            .get(movie_id)
            .await?
            .ok_or(LedgerError::MovieNotFound)?;

        let started_on = self.clock.today();
        if !self.rentals.open(user_id, movie_id, started_on).await? {
            return Err(LedgerError::AlreadyRented);
        }

        info!(%user_id, movie_id, %started_on, "Movie rented");
        Ok(movie)
    }

    /// Return a rented movie and charge the user for the days it was held
    pub async fn return_movie(&self, user_id: Uuid, movie_id: i32) -> Result<Movie, LedgerError> {
        // A movie missing from the catalog cannot be on loan either
        let movie = self
            .movies
            .get(movie_id)
            .await?
            .ok_or(LedgerError::NotRented)?;

        let returned_on = self.clock.today();
        let charge = move |started_on: NaiveDate| pricing::rental_charge(started_on, returned_on);

        let settlement = self
            .rentals
            .close(user_id, movie_id, &charge)
            .await?
            .ok_or(LedgerError::NotRented)?;

        info!(
            %user_id,
            movie_id,
            started_on = %settlement.started_on,
            charge = %settlement.charge,
            balance = %settlement.balance,
            "Movie returned"
        );

        Ok(movie)
    }

    /// Movies the user currently holds, in the order they were rented
    pub async fn list_active(&self, user_id: Uuid) -> Result<Vec<MovieSummary>, LedgerError> {
        Ok(self.rentals.list_active(user_id).await?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        models::MovieFilter,
        repositories::{AccountStore, memory::InMemoryStore},
    };
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    /// Clock pinned to a date that tests can move forward
    pub struct FixedClock(Mutex<NaiveDate>);

    impl FixedClock {
        pub fn new(date: NaiveDate) -> Self {
            Self(Mutex::new(date))
        }

        pub fn advance(&self, days: i64) {
            let mut today = self.0.lock().unwrap();
            *today += chrono::Duration::days(days);
        }
    }

    impl Clock for FixedClock {
        fn today(&self) -> NaiveDate {
            *self.0.lock().unwrap()
        }
    }

    fn setup() -> (RentalLedger, InMemoryStore, Arc<FixedClock>) {
        let store = InMemoryStore::seeded();
        let clock = Arc::new(FixedClock::new(
            NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
        ));
        let ledger = RentalLedger::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            clock.clone(),
        );
        (ledger, store, clock)
    }

    /// Catalog whose backend is down
    struct UnavailableCatalog;

    #[async_trait]
    impl MovieStore for UnavailableCatalog {
        async fn list(&self, _filter: &MovieFilter) -> anyhow::Result<Vec<Movie>> {
            anyhow::bail!("catalog unavailable")
        }

        async fn get(&self, _id: i32) -> anyhow::Result<Option<Movie>> {
            anyhow::bail!("catalog unavailable")
        }
    }

    async fn balance(store: &InMemoryStore, user_id: Uuid) -> Decimal {
        store.balance(user_id).await.unwrap().unwrap()
    }

    fn ids(movies: &[MovieSummary]) -> Vec<i32> {
        movies.iter().map(|m| m.id).collect()
    }

    #[tokio::test]
    async fn test_rent_returns_full_movie() {
        let (ledger, store, _) = setup();
        let user = store.add_user("renter@example.com").await;

        let movie = ledger.rent(user, 2).await.unwrap();

        assert_eq!(movie.title, "Halloween");
        assert_eq!(movie.year, 1978);
        assert_eq!(movie.genre, "horror");
    }

    #[tokio::test]
    async fn test_rent_twice_is_rejected() {
        let (ledger, store, _) = setup();
        let user = store.add_user("renter@example.com").await;

        ledger.rent(user, 1).await.unwrap();
        let second = ledger.rent(user, 1).await;

        assert!(matches!(second, Err(LedgerError::AlreadyRented)));
        assert_eq!(ids(&ledger.list_active(user).await.unwrap()), vec![1]);
    }

    #[tokio::test]
    async fn test_same_movie_for_different_users() {
        let (ledger, store, _) = setup();
        let alice = store.add_user("alice@example.com").await;
        let bob = store.add_user("bob@example.com").await;

        ledger.rent(alice, 3).await.unwrap();
        ledger.rent(bob, 3).await.unwrap();

        assert_eq!(ids(&ledger.list_active(alice).await.unwrap()), vec![3]);
        assert_eq!(ids(&ledger.list_active(bob).await.unwrap()), vec![3]);
    }

    #[tokio::test]
    async fn test_rent_unknown_movie() {
        let (ledger, store, _) = setup();
        let user = store.add_user("renter@example.com").await;

        let result = ledger.rent(user, 42).await;

        assert!(matches!(result, Err(LedgerError::MovieNotFound)));
        assert!(ledger.list_active(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_return_without_rental() {
        let (ledger, store, _) = setup();
        let user = store.add_user("renter@example.com").await;

        let result = ledger.return_movie(user, 1).await;

        assert!(matches!(result, Err(LedgerError::NotRented)));
        assert_eq!(balance(&store, user).await, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_return_twice_is_rejected() {
        let (ledger, store, _) = setup();
        let user = store.add_user("renter@example.com").await;

        ledger.rent(user, 1).await.unwrap();
        ledger.return_movie(user, 1).await.unwrap();
        let second = ledger.return_movie(user, 1).await;

        assert!(matches!(second, Err(LedgerError::NotRented)));
        assert_eq!(balance(&store, user).await, dec!(-1.0));
    }

    #[tokio::test]
    async fn test_rentals_listed_in_order_and_same_day_return() {
        let (ledger, store, _) = setup();
        let user = store.add_user("renter@example.com").await;

        ledger.rent(user, 1).await.unwrap();
        ledger.rent(user, 2).await.unwrap();
        assert_eq!(ids(&ledger.list_active(user).await.unwrap()), vec![1, 2]);

        let returned = ledger.return_movie(user, 1).await.unwrap();

        assert_eq!(returned.id, 1);
        assert_eq!(balance(&store, user).await, dec!(-1.0));
        assert_eq!(ids(&ledger.list_active(user).await.unwrap()), vec![2]);
    }

    #[tokio::test]
    async fn test_six_day_rental_costs_four_and_a_half() {
        let (ledger, store, clock) = setup();
        let user = store.add_user("renter@example.com").await;

        ledger.rent(user, 3).await.unwrap();
        clock.advance(6);
        ledger.return_movie(user, 3).await.unwrap();

        assert_eq!(balance(&store, user).await, dec!(-4.5));
    }

    #[tokio::test]
    async fn test_balance_accumulates_across_returns() {
        let (ledger, store, clock) = setup();
        let user = store.add_user("renter@example.com").await;

        ledger.rent(user, 1).await.unwrap();
        ledger.rent(user, 2).await.unwrap();
        clock.advance(2);
        ledger.return_movie(user, 1).await.unwrap();
        clock.advance(2);
        ledger.return_movie(user, 2).await.unwrap();

        // 2 days (2.0) + 4 days (3.5)
        assert_eq!(balance(&store, user).await, dec!(-5.5));
        assert!(ledger.list_active(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rent_again_after_return() {
        let (ledger, store, clock) = setup();
        let user = store.add_user("renter@example.com").await;

        ledger.rent(user, 2).await.unwrap();
        ledger.return_movie(user, 2).await.unwrap();
        clock.advance(1);
        ledger.rent(user, 2).await.unwrap();

        assert_eq!(ids(&ledger.list_active(user).await.unwrap()), vec![2]);
    }

    #[tokio::test]
    async fn test_return_unknown_movie_is_not_rented() {
        let (ledger, store, _) = setup();
        let user = store.add_user("renter@example.com").await;

        let result = ledger.return_movie(user, 42).await;

        assert!(matches!(result, Err(LedgerError::NotRented)));
        assert_eq!(balance(&store, user).await, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_catalog_failure_leaves_rental_open() {
        let store = InMemoryStore::seeded();
        let clock = Arc::new(FixedClock::new(
            NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
        ));
        let ledger = RentalLedger::new(
            Arc::new(UnavailableCatalog),
            Arc::new(store.clone()),
            clock.clone(),
        );
        let user = store.add_user("renter@example.com").await;
        assert!(store.open(user, 1, clock.today()).await.unwrap());
        clock.advance(4);

        let result = ledger.return_movie(user, 1).await;

        assert!(matches!(result, Err(LedgerError::Storage(_))));
        assert_eq!(ids(&store.list_active(user).await.unwrap()), vec![1]);
        assert_eq!(balance(&store, user).await, Decimal::ZERO);
    }
}
