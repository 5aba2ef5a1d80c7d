//! Storage ports and their PostgreSQL implementations

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{Movie, MovieFilter, MovieSummary, Settlement, UserProfile};

pub mod account;
#[cfg(test)]
pub mod memory;
pub mod movie;
pub mod rental;

pub use account::AccountRepository;
pub use movie::MovieRepository;
pub use rental::RentalRepository;

/// Computes the charge for a rental from its start date
pub type ChargeFn<'a> = &'a (dyn Fn(NaiveDate) -> Decimal + Send + Sync);

/// Read-only movie catalog
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Movies matching `filter`, in insertion order
    async fn list(&self, filter: &MovieFilter) -> Result<Vec<Movie>>;

    async fn get(&self, id: i32) -> Result<Option<Movie>>;
}

/// Active rentals keyed by (user, movie)
#[async_trait]
pub trait RentalStore: Send + Sync {
    /// Record a rental. Returns `false` if the pair already has one.
    async fn open(&self, user_id: Uuid, movie_id: i32, started_on: NaiveDate) -> Result<bool>;

    /// Remove the rental and debit `charge(started_on)` from the user as one
    /// atomic step. Returns `None` if the pair has no active rental.
    async fn close(
        &self,
        user_id: Uuid,
        movie_id: i32,
        charge: ChargeFn<'_>,
    ) -> Result<Option<Settlement>>;

    /// Movies currently rented by the user, oldest rental first
    async fn list_active(&self, user_id: Uuid) -> Result<Vec<MovieSummary>>;
}

/// User balances
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Current balance, `None` for an unknown user. Debits only happen inside
    /// [`RentalStore::close`].
    async fn balance(&self, user_id: Uuid) -> Result<Option<Decimal>>;

    /// Profile including the balance, served by `/users/me` and checked by
    /// the auth middleware
    async fn profile(&self, user_id: Uuid) -> Result<Option<UserProfile>>;
}
