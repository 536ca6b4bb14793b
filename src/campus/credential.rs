// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The cached campus service credential.

use chrono::{DateTime, TimeDelta, Utc};

use crate::auth::campus_token::{expiry_claim, unverified_claims};

/// A credential this close to its expiry is treated as stale.
pub const SAFETY_MARGIN: TimeDelta = TimeDelta::seconds(30);

/// Lifetime assumed when the token carries no readable expiry.
pub const FALLBACK_LIFETIME: TimeDelta = TimeDelta::minutes(30);

/// What the campus login endpoint handed out.
#[derive(Clone)]
pub struct CampusLogin {
    pub token: String,
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for CampusLogin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CampusLogin")
            .field("token", &redact(&self.token))
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish()
    }
}

/// Access token, refresh token and expiry, replaced as one unit.
#[derive(Clone)]
pub struct UpstreamCredential {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl UpstreamCredential {
    /// Build a credential from a login, reading the expiry from the token.
    pub fn from_login(login: CampusLogin, now: DateTime<Utc>) -> Self {
        let expires_at = token_expiry(&login.token).unwrap_or(now + FALLBACK_LIFETIME);
        Self {
            access_token: login.token,
            refresh_token: login.refresh_token,
            expires_at,
        }
    }

    pub fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        self.access_token.is_empty() || now + SAFETY_MARGIN >= self.expires_at
    }
}

impl std::fmt::Debug for UpstreamCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamCredential")
            .field("access_token", &redact(&self.access_token))
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Expiry claim of a campus token, if it has a readable one.
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let claims = unverified_claims(token).ok()?;
    let exp = expiry_claim(&claims).ok()??;
    DateTime::from_timestamp(exp, 0)
}

/// First few characters of a token, for logs.
pub fn redact(token: &str) -> String {
    let prefix: String = token.chars().take(8).collect();
    format!("{prefix}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::campus_token::test_tokens::campus_token;

    fn login(token: String) -> CampusLogin {
        CampusLogin {
            token,
            refresh_token: Some("refresh".to_string()),
        }
    }

    #[test]
    fn expiry_comes_from_token() {
        let now = Utc::now();
        let exp = now.timestamp() + 3600;
        let credential = UpstreamCredential::from_login(
            login(campus_token(&format!(r#"{{"uid":1,"exp":{exp}}}"#))),
            now,
        );
        assert_eq!(credential.expires_at.timestamp(), exp);
        assert!(!credential.is_stale_at(now));
    }

    #[test]
    fn undecodable_token_gets_fallback_lifetime() {
        let now = Utc::now();
        let credential = UpstreamCredential::from_login(login("opaque-service-token".to_string()), now);
        assert_eq!(credential.expires_at, now + FALLBACK_LIFETIME);

        let no_exp = UpstreamCredential::from_login(login(campus_token(r#"{"uid":1}"#)), now);
        assert_eq!(no_exp.expires_at, now + FALLBACK_LIFETIME);
    }

    #[test]
    fn stale_within_safety_margin() {
        let now = Utc::now();
        let credential = UpstreamCredential {
            access_token: "token".to_string(),
            refresh_token: None,
            expires_at: now + TimeDelta::seconds(29),
        };
        assert!(credential.is_stale_at(now));

        let fresh = UpstreamCredential {
            expires_at: now + TimeDelta::seconds(31),
            ..credential.clone()
        };
        assert!(!fresh.is_stale_at(now));

        let empty = UpstreamCredential {
            access_token: String::new(),
            ..fresh
        };
        assert!(empty.is_stale_at(now));
    }

    #[test]
    fn debug_output_redacts_token() {
        let credential = UpstreamCredential {
            access_token: "eyJhbGciOiJIUzI1NiJ9.secret-part".to_string(),
            refresh_token: None,
            expires_at: Utc::now(),
        };
        let rendered = format!("{credential:?}");
        assert!(!rendered.contains("secret-part"));
    }
}
