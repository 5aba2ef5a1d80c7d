//! Access token issuance and validation
//!
//! Tokens are HS256 JWTs signed with a shared secret. The auth service issues
//! them; the API service only validates them.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::error::TokenError;

/// Token configuration
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Shared secret for signing and verifying tokens
    pub secret: String,
    /// Access token lifetime in seconds (default: 1 hour)
    pub lifetime_seconds: u64,
}

impl TokenConfig {
    /// Create a new TokenConfig from environment variables
    ///
    /// # Environment Variables
    /// - `APP_SECRET`: Secret used to sign tokens (required)
    /// - `APP_TOKEN_LIFETIME`: Token lifetime in seconds (default: 3600)
    pub fn from_env() -> Result<Self, TokenError> {
        let secret = std::env::var("APP_SECRET").map_err(|_| {
            TokenError::Configuration("APP_SECRET environment variable not set".to_string())
        })?;

        let lifetime_seconds = std::env::var("APP_TOKEN_LIFETIME")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3600);

        Ok(Self {
            secret,
            lifetime_seconds,
        })
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Signs and validates access tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime_seconds: u64,
}

impl TokenService {
    pub fn new(config: &TokenConfig) -> Result<Self, TokenError> {
        if config.secret.is_empty() {
            return Err(TokenError::Configuration(
                "APP_SECRET must not be empty".to_string(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            lifetime_seconds: config.lifetime_seconds,
        })
    }

    /// Issue an access token for a user
    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        let now = unix_now()?;
        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now + self.lifetime_seconds,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Validate a token and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }

    /// Token lifetime in seconds
    pub fn lifetime_seconds(&self) -> u64 {
        self.lifetime_seconds
    }
}

fn unix_now() -> Result<u64, TokenError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| TokenError::Configuration(format!("System clock before epoch: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(&TokenConfig {
            secret: secret.to_string(),
            lifetime_seconds: 3600,
        })
        .unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let tokens = service("test-secret");
        let user_id = Uuid::new_v4();

        let token = tokens.issue(user_id).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_rejects_token_signed_with_other_secret() {
        let token = service("first-secret").issue(Uuid::new_v4()).unwrap();

        let result = service("second-secret").verify(&token);
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_rejects_expired_token() {
        let now = unix_now().unwrap();
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(service("test-secret").verify(&token).is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(service("test-secret").verify("not.a.token").is_err());
    }

    #[test]
    fn test_empty_secret_is_configuration_error() {
        let result = TokenService::new(&TokenConfig {
            secret: String::new(),
            lifetime_seconds: 60,
        });
        assert!(matches!(result, Err(TokenError::Configuration(_))));
    }
}
