// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Local session tokens.
//!
//! Tokens are HMAC-signed JWTs carrying the identity fields of
//! [`SessionIdentity`]. They are stateless: validity depends only on the
//! signature, the issuer and the expiry claim. Whether the subject still
//! exists is the authenticator's concern, not this module's.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::{LocalClaims, SessionIdentity};

/// Default session token lifetime (24 hours).
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Default `iss` claim for tokens minted by this service.
pub const DEFAULT_ISSUER: &str = "campus-identity";

/// Algorithms accepted on verification. Anything outside the HMAC family is
/// rejected before the signature is even looked at.
const HMAC_FAMILY: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token signing secret is not configured")]
    Config,
    #[error("token is malformed or its signature is invalid")]
    Malformed,
    #[error("token has expired")]
    Expired,
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// A freshly minted session token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and verifies local session tokens.
///
/// The signing secret is read-only after construction, so a single issuer
/// can be shared freely between request tasks.
#[derive(Clone)]
pub struct TokenIssuer {
    keys: Option<SigningKeys>,
    lifetime: TimeDelta,
    issuer: String,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("configured", &self.keys.is_some())
            .field("lifetime", &self.lifetime)
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl TokenIssuer {
    /// Create an issuer.
    ///
    /// A missing or blank secret is accepted here; every later `issue` or
    /// `verify` call then fails with [`TokenError::Config`].
    pub fn new(secret: Option<&str>, lifetime: Duration, issuer: impl Into<String>) -> Self {
        let keys = secret
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| SigningKeys {
                encoding: EncodingKey::from_secret(s.as_bytes()),
                decoding: DecodingKey::from_secret(s.as_bytes()),
            });

        Self {
            keys,
            lifetime: TimeDelta::from_std(lifetime).unwrap_or(TimeDelta::hours(24)),
            issuer: issuer.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.keys.is_some()
    }

    /// Configured token lifetime.
    pub fn lifetime(&self) -> TimeDelta {
        self.lifetime
    }

    /// Mint a token for `identity`, expiring one lifetime from now.
    pub fn issue(&self, identity: &SessionIdentity) -> Result<IssuedToken, TokenError> {
        self.issue_at(identity, Utc::now())
    }

    /// Mint a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        identity: &SessionIdentity,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let keys = self.keys.as_ref().ok_or(TokenError::Config)?;
        let expires_at = now
            .checked_add_signed(self.lifetime)
            .ok_or(TokenError::Config)?;

        let claims = LocalClaims {
            user_id: identity.user_id,
            login_id: identity.login_id.clone(),
            first_name: identity.first_name.clone(),
            middle_name: identity.middle_name.clone(),
            last_name: identity.last_name.clone(),
            email: identity.email.clone(),
            sub: identity.user_id.to_string(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify a token and return its claims unchanged.
    pub fn verify(&self, token: &str) -> Result<LocalClaims, TokenError> {
        let keys = self.keys.as_ref().ok_or(TokenError::Config)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = HMAC_FAMILY.to_vec();
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        decode::<LocalClaims>(token, &keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    const SECRET: &str = "test-signing-secret-with-some-length";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(Some(SECRET), DEFAULT_TOKEN_LIFETIME, DEFAULT_ISSUER)
    }

    fn identity() -> SessionIdentity {
        SessionIdentity {
            user_id: 42,
            login_id: "11S20001".to_string(),
            first_name: "Rina".to_string(),
            middle_name: "M".to_string(),
            last_name: "Sitorus".to_string(),
            email: "rina@students.example.ac.id".to_string(),
        }
    }

    #[test]
    fn verify_returns_issued_identity() {
        let issuer = issuer();
        let issued = issuer.issue(&identity()).unwrap();
        let claims = issuer.verify(&issued.token).unwrap();

        assert_eq!(claims.identity(), identity());
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.iss, DEFAULT_ISSUER);
        assert_eq!(claims.exp, issued.expires_at.timestamp());
    }

    #[test]
    fn lifetime_past_the_calendar_is_a_config_error() {
        // Roughly 300,000 years
        let lifetime = Duration::from_secs(300_000 * 366 * 86_400);
        let issuer = TokenIssuer::new(Some(SECRET), lifetime, DEFAULT_ISSUER);
        assert_eq!(issuer.lifetime().num_seconds(), 300_000 * 366 * 86_400);
        assert!(matches!(issuer.issue(&identity()), Err(TokenError::Config)));
    }

    #[test]
    fn expiry_is_now_plus_lifetime() {
        let issuer = TokenIssuer::new(Some(SECRET), Duration::from_secs(3600), DEFAULT_ISSUER);
        let now = Utc::now();
        let issued = issuer.issue_at(&identity(), now).unwrap();
        assert_eq!(issued.expires_at, now + TimeDelta::hours(1));
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = issuer();
        let long_ago = Utc::now() - TimeDelta::hours(25);
        let issued = issuer.issue_at(&identity(), long_ago).unwrap();

        assert_eq!(issuer.verify(&issued.token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn token_from_other_secret_is_malformed() {
        let other = TokenIssuer::new(Some("another-secret"), DEFAULT_TOKEN_LIFETIME, DEFAULT_ISSUER);
        let issued = other.issue(&identity()).unwrap();
        assert_eq!(issuer().verify(&issued.token).unwrap_err(), TokenError::Malformed);

        // Signature is checked before expiry.
        let expired = other
            .issue_at(&identity(), Utc::now() - TimeDelta::hours(48))
            .unwrap();
        assert_eq!(issuer().verify(&expired.token).unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn foreign_issuer_is_malformed() {
        let foreign = TokenIssuer::new(Some(SECRET), DEFAULT_TOKEN_LIFETIME, "someone-else");
        let issued = foreign.issue(&identity()).unwrap();
        assert_eq!(issuer().verify(&issued.token).unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn non_hmac_algorithm_is_malformed() {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
        let claims = URL_SAFE_NO_PAD.encode(
            r#"{"user_id":42,"sub":"42","iss":"campus-identity","iat":0,"nbf":0,"exp":9999999999}"#,
        );
        let token = format!("{header}.{claims}.c2lnbmF0dXJl");
        assert_eq!(issuer().verify(&token).unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(issuer().verify("not-a-jwt").unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn missing_secret_is_config_error() {
        let issuer = TokenIssuer::new(None, DEFAULT_TOKEN_LIFETIME, DEFAULT_ISSUER);
        assert!(!issuer.is_configured());
        assert_eq!(issuer.issue(&identity()).unwrap_err(), TokenError::Config);
        assert_eq!(issuer.verify("a.b.c").unwrap_err(), TokenError::Config);

        let blank = TokenIssuer::new(Some("   "), DEFAULT_TOKEN_LIFETIME, DEFAULT_ISSUER);
        assert!(!blank.is_configured());
    }
}
