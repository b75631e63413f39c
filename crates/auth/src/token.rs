//! JWT issuance and verification.
//!
//! Access and refresh tokens share one claim shape; the `refresh` flag keeps
//! the two roles apart so a refresh token can never authenticate a request
//! and an access token can never mint new tokens.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};

/// Claims carried by every Bookshelf token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id of the principal.
    pub sub: i64,
    /// Expiry as seconds since the Unix epoch.
    pub exp: usize,
    /// True for refresh tokens, false for access tokens.
    pub refresh: bool,
}

/// Access/refresh pair returned by login. Field names follow the wire
/// contract of the login endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("token is invalid or expired")]
    Invalid,

    #[error("refresh token required")]
    NotRefresh,

    #[error("access token required")]
    NotAccess,

    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Issues and verifies HS256 tokens with configured lifetimes.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, access_ttl_secs: u64, refresh_ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl: Duration::seconds(access_ttl_secs as i64),
            refresh_ttl: Duration::seconds(refresh_ttl_secs as i64),
        }
    }

    /// Issue an access/refresh pair for the given user.
    pub fn issue_pair(&self, user_id: i64) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access: self.sign(user_id, self.access_ttl, false)?,
            refresh: self.sign(user_id, self.refresh_ttl, true)?,
        })
    }

    /// Verify an access token and return its claims.
    pub fn verify_access(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.verify(token)?;
        if claims.refresh {
            return Err(TokenError::NotAccess);
        }
        Ok(claims)
    }

    /// Exchange a valid refresh token for a fresh access token.
    pub fn refresh(&self, refresh_token: &str) -> Result<String, TokenError> {
        let claims = self.verify(refresh_token)?;
        if !claims.refresh {
            return Err(TokenError::NotRefresh);
        }
        self.sign(claims.sub, self.access_ttl, false)
    }

    fn sign(&self, user_id: i64, ttl: Duration, refresh: bool) -> Result<String, TokenError> {
        let exp = (OffsetDateTime::now_utc() + ttl).unix_timestamp() as usize;
        let claims = Claims {
            sub: user_id,
            exp,
            refresh,
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Signing)
    }

    fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Token lifetimes are exact; no clock-skew allowance.
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret", 900, 86_400)
    }

    #[test]
    fn issued_access_token_verifies() {
        let tokens = service();
        let pair = tokens.issue_pair(7).unwrap();

        let claims = tokens.verify_access(&pair.access).unwrap();
        assert_eq!(claims.sub, 7);
        assert!(!claims.refresh);
    }

    #[test]
    fn refresh_token_is_rejected_as_access_token() {
        let tokens = service();
        let pair = tokens.issue_pair(7).unwrap();

        assert!(matches!(
            tokens.verify_access(&pair.refresh),
            Err(TokenError::NotAccess)
        ));
    }

    #[test]
    fn access_token_cannot_be_refreshed() {
        let tokens = service();
        let pair = tokens.issue_pair(7).unwrap();

        assert!(matches!(
            tokens.refresh(&pair.access),
            Err(TokenError::NotRefresh)
        ));
    }

    #[test]
    fn refresh_yields_a_working_access_token() {
        let tokens = service();
        let pair = tokens.issue_pair(7).unwrap();

        let access = tokens.refresh(&pair.refresh).unwrap();
        let claims = tokens.verify_access(&access).unwrap();
        assert_eq!(claims.sub, 7);
    }

    #[test]
    fn expired_token_is_invalid() {
        let tokens = service();
        let stale = tokens.sign(7, Duration::seconds(-60), false).unwrap();

        assert!(matches!(
            tokens.verify_access(&stale),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn token_signed_with_another_secret_is_invalid() {
        let pair = TokenService::new("other-secret", 900, 900)
            .issue_pair(7)
            .unwrap();

        assert!(matches!(
            service().verify_access(&pair.access),
            Err(TokenError::Invalid)
        ));
    }
}
