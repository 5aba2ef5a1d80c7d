//! API models for request and response payloads

pub mod movie;
pub mod rental;
pub mod user;

pub use movie::{Movie, MovieFilter, MovieSummary, RentRequest};
pub use rental::{Rental, Settlement};
pub use user::UserProfile;
