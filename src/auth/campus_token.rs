// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Campus-issued token validation.
//!
//! The campus identity system signs its tokens with a key this service does
//! not hold. Tokens are therefore decoded without signature verification and
//! trusted at face value: only their shape, the numeric `uid` claim and the
//! expiry are checked. The result is an [`UpstreamIdentity`], which carries
//! the campus user id and nothing that could be mistaken for a store-backed
//! account.

use serde_json::{Map, Value};

use super::claims::UpstreamIdentity;

/// Claim carrying the campus user id.
pub const USER_ID_CLAIM: &str = "uid";

/// Standard expiry claim (seconds since the epoch).
pub const EXPIRY_CLAIM: &str = "exp";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CampusTokenError {
    #[error("campus token is invalid")]
    Invalid,
    #[error("campus token has expired")]
    Expired,
}

/// Decode the claim set of a JWT without verifying its signature.
pub fn unverified_claims(token: &str) -> Result<Map<String, Value>, CampusTokenError> {
    jsonwebtoken::dangerous::insecure_decode::<Map<String, Value>>(token)
        .map(|data| data.claims)
        .map_err(|_| CampusTokenError::Invalid)
}

/// Interpret a claim value as a non-negative integer.
///
/// The campus system has been seen emitting ids as JSON integers, as
/// integral floats (`42.0`) and as numeric strings (`"42"`).
pub fn decode_numeric(value: &Value) -> Result<u64, CampusTokenError> {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                return Ok(v);
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
                    Ok(f as u64)
                }
                _ => Err(CampusTokenError::Invalid),
            }
        }
        Value::String(s) => s.trim().parse::<u64>().map_err(|_| CampusTokenError::Invalid),
        _ => Err(CampusTokenError::Invalid),
    }
}

/// Read the expiry claim, if the token carries one.
pub fn expiry_claim(claims: &Map<String, Value>) -> Result<Option<i64>, CampusTokenError> {
    match claims.get(EXPIRY_CLAIM) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => {
            let exp = decode_numeric(value)?;
            i64::try_from(exp).map(Some).map_err(|_| CampusTokenError::Invalid)
        }
    }
}

/// Validate a campus token against the clock `now` (Unix seconds).
pub fn validate_campus_token(token: &str, now: i64) -> Result<UpstreamIdentity, CampusTokenError> {
    let claims = unverified_claims(token)?;

    let upstream_user_id = claims
        .get(USER_ID_CLAIM)
        .ok_or(CampusTokenError::Invalid)
        .and_then(decode_numeric)?;
    if upstream_user_id == 0 {
        return Err(CampusTokenError::Invalid);
    }

    let expires_at = expiry_claim(&claims)?;
    if let Some(exp) = expires_at {
        if exp < now {
            return Err(CampusTokenError::Expired);
        }
    }

    Ok(UpstreamIdentity {
        upstream_user_id,
        expires_at,
    })
}
