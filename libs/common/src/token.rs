//! Token service for issuing and verifying identity tokens
//!
//! Tokens are HS256-signed JWTs carrying the user's email, id and username.
//! Every token expires exactly 24 hours after it was issued. Both services
//! share the signing secret, which must be configured explicitly.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// Lifetime of an issued token in seconds
pub const TOKEN_LIFETIME_SECS: u64 = 24 * 60 * 60;

/// Name of the cookie that carries the token
pub const TOKEN_COOKIE: &str = "token";

/// Token service errors
#[derive(Error, Debug)]
pub enum TokenError {
    /// Signature mismatch, malformed token or expired token
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token could not be signed
    #[error("Failed to sign token: {0}")]
    Signing(String),

    /// Missing or unusable configuration
    #[error("Token configuration error: {0}")]
    Configuration(String),
}

/// Token service configuration
#[derive(Clone)]
pub struct TokenConfig {
    /// Shared HMAC secret
    pub secret: String,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl TokenConfig {
    /// Create a new TokenConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: signing secret (required, there is no default)
    pub fn from_env() -> Result<Self, TokenError> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| {
            TokenError::Configuration("JWT_SECRET environment variable not set".to_string())
        })?;

        Self::new(secret)
    }

    /// Build a configuration from an explicit secret
    pub fn new(secret: impl Into<String>) -> Result<Self, TokenError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(TokenError::Configuration(
                "JWT_SECRET must not be empty".to_string(),
            ));
        }

        Ok(TokenConfig { secret })
    }
}

/// Identity embedded in a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    pub id: Uuid,
    pub username: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub id: Uuid,
    pub username: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Token service
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Initialize a new token service
    pub fn new(config: &TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        // Expiry is checked against an explicit clock in `verify_at`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        TokenService {
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Issue a token for an identity, valid for 24 hours from now
    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue_at(identity, now_secs()?)
    }

    /// Issue a token as if the current time were `now` (seconds since the epoch)
    pub fn issue_at(&self, identity: &Identity, now: u64) -> Result<String, TokenError> {
        let claims = Claims {
            email: identity.email.clone(),
            id: identity.id,
            username: identity.username.clone(),
            iat: now,
            exp: now + TOKEN_LIFETIME_SECS,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token and return the identity it carries
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        self.verify_at(token, now_secs()?)
    }

    /// Verify a token as if the current time were `now` (seconds since the epoch)
    pub fn verify_at(&self, token: &str, now: u64) -> Result<Identity, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| TokenError::InvalidToken)?;

        let claims = token_data.claims;
        if now >= claims.exp {
            return Err(TokenError::InvalidToken);
        }

        Ok(Identity {
            email: claims.email,
            id: claims.id,
            username: claims.username,
        })
    }
}

fn now_secs() -> Result<u64, TokenError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| TokenError::Signing(format!("Failed to get current time: {}", e)))
}
