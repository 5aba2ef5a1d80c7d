//! Application state shared across handlers

use std::sync::Arc;

use common::token::TokenService;
use sqlx::PgPool;

use crate::{
    ledger::{Clock, RentalLedger},
    repositories::{
        AccountRepository, AccountStore, MovieRepository, MovieStore, RentalRepository,
        RentalStore,
    },
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub movies: Arc<dyn MovieStore>,
    pub accounts: Arc<dyn AccountStore>,
    pub ledger: RentalLedger,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(
        movies: Arc<dyn MovieStore>,
        rentals: Arc<dyn RentalStore>,
        accounts: Arc<dyn AccountStore>,
        clock: Arc<dyn Clock>,
        tokens: TokenService,
    ) -> Self {
        let ledger = RentalLedger::new(movies.clone(), rentals, clock);
        Self {
            movies,
            accounts,
            ledger,
            tokens,
        }
    }

    /// State backed by the PostgreSQL repositories
    pub fn with_pool(pool: PgPool, clock: Arc<dyn Clock>, tokens: TokenService) -> Self {
        Self::new(
            Arc::new(MovieRepository::new(pool.clone())),
            Arc::new(RentalRepository::new(pool.clone())),
            Arc::new(AccountRepository::new(pool)),
            clock,
            tokens,
        )
    }
}
