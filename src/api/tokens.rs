//! Token issuance and verification.
//!
//! Two independent HS256 secrets sign two kinds of tokens: a short-lived
//! access token carrying `{id, role}` that authorizes individual requests,
//! and a longer-lived refresh token carrying `{id}` that can only be
//! exchanged for a new pair. Access tokens are trusted on signature alone;
//! refresh tokens must additionally match the copy stored on the user row.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;

/// Claims embedded in an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User id
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Claims embedded in a refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// User id
    pub sub: String,
    /// Unique per issuance so that two refresh tokens minted within the same
    /// second are still distinct strings (rotation depends on exact equality).
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly minted access/refresh pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Signs and verifies token pairs. Pure function of identity + clock + secrets;
/// persistence of the refresh token is the caller's concern.
#[derive(Clone)]
pub struct TokenIssuer {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(auth: &AuthConfig) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(auth.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(auth.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(auth.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(auth.refresh_secret.as_bytes()),
            access_ttl: Duration::minutes(auth.access_ttl_minutes),
            refresh_ttl: Duration::days(auth.refresh_ttl_days),
        }
    }

    /// Mint a new access/refresh pair for a user identity.
    pub fn mint_pair(
        &self,
        user_id: &str,
        role: &str,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        let now = Utc::now();

        let access_claims = AccessClaims {
            sub: user_id.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
        };
        let refresh_claims = RefreshClaims {
            sub: user_id.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + self.refresh_ttl).timestamp(),
        };

        let access = encode(&Header::default(), &access_claims, &self.access_encoding)?;
        let refresh = encode(&Header::default(), &refresh_claims, &self.refresh_encoding)?;

        Ok(TokenPair { access, refresh })
    }

    /// Verify an access token: signature and expiry only, no persisted state.
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
        let data = decode::<AccessClaims>(token, &self.access_decoding, &Validation::default())?;
        Ok(data.claims)
    }

    /// Verify a refresh token's signature and expiry. The caller must still
    /// check the token against the user's stored refresh token.
    pub fn verify_refresh(
        &self,
        token: &str,
    ) -> Result<RefreshClaims, jsonwebtoken::errors::Error> {
        let data = decode::<RefreshClaims>(token, &self.refresh_decoding, &Validation::default())?;
        Ok(data.claims)
    }
}
