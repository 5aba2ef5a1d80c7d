//! In-memory store used by the unit and HTTP tests

use std::{collections::HashMap, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{AccountStore, ChargeFn, MovieStore, RentalStore};
use crate::models::{Movie, MovieFilter, MovieSummary, Rental, Settlement, UserProfile};

#[derive(Default)]
struct State {
    movies: Vec<Movie>,
    rentals: Vec<Rental>,
    accounts: HashMap<Uuid, UserProfile>,
}

/// Implements every storage port over one mutex-guarded state
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    /// Store holding the default three-movie catalog
    pub fn seeded() -> Self {
        let movies = [
            (1, "The Hitchhiker's Guide To The Galaxy", 2005, "comedy"),
            (2, "Halloween", 1978, "horror"),
            (3, "Assassin's Creed", 2016, "action"),
        ]
        .into_iter()
        .map(|(id, title, year, genre)| Movie {
            id,
            title: title.to_string(),
            year,
            genre: genre.to_string(),
        })
        .collect();

        Self::with_movies(movies)
    }

    pub fn with_movies(movies: Vec<Movie>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                movies,
                ..State::default()
            })),
        }
    }

    /// Register a user with a zero balance and return its id
    pub async fn add_user(&self, email: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().await.accounts.insert(
            id,
            UserProfile {
                id,
                email: email.to_string(),
                balance: Decimal::ZERO,
                is_active: true,
            },
        );
        id
    }

    pub async fn deactivate(&self, user_id: Uuid) {
        if let Some(account) = self.state.lock().await.accounts.get_mut(&user_id) {
            account.is_active = false;
        }
    }
}

#[async_trait]
impl MovieStore for InMemoryStore {
    async fn list(&self, filter: &MovieFilter) -> Result<Vec<Movie>> {
        let state = self.state.lock().await;
        Ok(state
            .movies
            .iter()
            .filter(|movie| filter.matches(movie))
            .cloned()
            .collect())
    }

    async fn get(&self, id: i32) -> Result<Option<Movie>> {
        let state = self.state.lock().await;
        Ok(state.movies.iter().find(|movie| movie.id == id).cloned())
    }
}

#[async_trait]
impl RentalStore for InMemoryStore {
    async fn open(&self, user_id: Uuid, movie_id: i32, started_on: NaiveDate) -> Result<bool> {
        let mut state = self.state.lock().await;
        let exists = state
            .rentals
            .iter()
            .any(|r| r.user_id == user_id && r.movie_id == movie_id);
        if exists {
            return Ok(false);
        }

        state.rentals.push(Rental {
            user_id,
            movie_id,
            started_on,
        });
        Ok(true)
    }

    async fn close(
        &self,
        user_id: Uuid,
        movie_id: i32,
        charge: ChargeFn<'_>,
    ) -> Result<Option<Settlement>> {
        let mut state = self.state.lock().await;
        let Some(position) = state
            .rentals
            .iter()
            .position(|r| r.user_id == user_id && r.movie_id == movie_id)
        else {
            return Ok(None);
        };

        if !state.accounts.contains_key(&user_id) {
            anyhow::bail!("User {} not found", user_id);
        }

        let rental = state.rentals.remove(position);
        let amount = charge(rental.started_on);
        let account = state
            .accounts
            .get_mut(&user_id)
            .ok_or_else(|| anyhow::anyhow!("User {} not found", user_id))?;
        account.balance -= amount;

        Ok(Some(Settlement {
            started_on: rental.started_on,
            charge: amount,
            balance: account.balance,
        }))
    }

    async fn list_active(&self, user_id: Uuid) -> Result<Vec<MovieSummary>> {
        let state = self.state.lock().await;
        Ok(state
            .rentals
            .iter()
            .filter(|r| r.user_id == user_id)
            .filter_map(|r| state.movies.iter().find(|m| m.id == r.movie_id))
            .map(MovieSummary::from)
            .collect())
    }
}

#[async_trait]
impl AccountStore for InMemoryStore {
    async fn balance(&self, user_id: Uuid) -> Result<Option<Decimal>> {
        let state = self.state.lock().await;
        Ok(state.accounts.get(&user_id).map(|account| account.balance))
    }

    async fn profile(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        let state = self.state.lock().await;
        Ok(state.accounts.get(&user_id).cloned())
    }
}
