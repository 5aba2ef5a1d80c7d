//! Movie catalog models

use serde::{Deserialize, Serialize};

/// Full view of a catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub year: i32,
    pub genre: String,
}

/// Short view used for a user's rental listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: i32,
    pub title: String,
}

impl From<&Movie> for MovieSummary {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
        }
    }
}

/// Query parameters for catalog listing
///
/// Filters are exact matches; absent filters match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieFilter {
    pub genre: Option<String>,
    pub year: Option<i32>,
}

impl MovieFilter {
    pub fn matches(&self, movie: &Movie) -> bool {
        self.genre.as_deref().is_none_or(|genre| movie.genre == genre)
            && self.year.is_none_or(|year| movie.year == year)
    }
}

/// Body of the rent and return requests
#[derive(Debug, Clone, Deserialize)]
pub struct RentRequest {
    pub id: i32,
}
