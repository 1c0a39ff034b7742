//! Signed session tokens.
//!
//! Format: `hex(claims_json) "." hex(hmac_sha256(secret, hex(claims_json)))`.
//! Verification checks the MAC in constant time, then issuer, then expiry.

use crate::ports::TimeSource;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use shared_types::User;
use std::sync::Arc;
use std::time::Duration;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id
    pub sub: String,
    pub username: String,
    pub role: String,
    /// Issuer
    pub iss: String,
    /// Issued at (unix seconds)
    pub iat: u64,
    /// Expires at (unix seconds)
    pub exp: u64,
}

/// Token verification failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid token signature")]
    BadSignature,
    #[error("token issuer mismatch")]
    WrongIssuer,
    #[error("token expired")]
    Expired,
    #[error("token encoding failed: {0}")]
    Encode(String),
}

/// Issues and verifies session tokens.
pub struct TokenIssuer {
    secret: Vec<u8>,
    issuer: String,
    ttl: Duration,
    time: Arc<dyn TimeSource>,
}

impl TokenIssuer {
    pub fn new(
        secret: impl AsRef<[u8]>,
        issuer: impl Into<String>,
        ttl: Duration,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            issuer: issuer.into(),
            ttl,
            time,
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Sign a fresh token for `user`.
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let iat = self.time.now();
        let claims = TokenClaims {
            sub: user.id.clone(),
            username: user.username.clone(),
            role: user.role.clone(),
            iss: self.issuer.clone(),
            iat,
            exp: iat.saturating_add(self.ttl.as_secs()),
        };

        let json = serde_json::to_vec(&claims).map_err(|e| TokenError::Encode(e.to_string()))?;
        let payload = hex::encode(json);
        let signature = hex::encode(self.sign(payload.as_bytes())?);

        Ok(format!("{}.{}", payload, signature))
    }

    /// Check signature, issuer and expiry; return the claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let (payload, signature) = token.split_once('.').ok_or(TokenError::Malformed)?;
        let signature = hex::decode(signature).map_err(|_| TokenError::Malformed)?;

        let expected = self.sign(payload.as_bytes())?;
        if !bool::from(expected.as_slice().ct_eq(signature.as_slice())) {
            return Err(TokenError::BadSignature);
        }

        let json = hex::decode(payload).map_err(|_| TokenError::Malformed)?;
        let claims: TokenClaims =
            serde_json::from_slice(&json).map_err(|_| TokenError::Malformed)?;

        if claims.iss != self.issuer {
            return Err(TokenError::WrongIssuer);
        }
        if self.time.now() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, TokenError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| TokenError::Encode(e.to_string()))?;
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
