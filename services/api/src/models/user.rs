//! Account models

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// Profile of the authenticated user, including the rental balance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub balance: Decimal,
    pub is_active: bool,
}
