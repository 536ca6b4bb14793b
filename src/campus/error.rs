// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Campus integration errors.

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Service-account login failed (transport, status, `result: false`,
    /// empty token, or no account configured)
    #[error("Campus login failed: {0}")]
    Auth(String),

    /// The API still answered 401 after a fresh credential was obtained
    #[error("Campus API rejected the service credential")]
    Unauthorized,

    /// Transport failure or timeout
    #[error("Campus API unavailable: {0}")]
    Unavailable(String),

    /// Non-success status other than 401
    #[error("Campus API returned status {0}")]
    Status(u16),

    #[error("Campus API response was invalid: {0}")]
    InvalidResponse(String),

    #[error("{0} not found in the campus system")]
    NotFound(String),
}

impl UpstreamError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, UpstreamError::NotFound(_))
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Unavailable("request timed out".to_string())
        } else if e.is_decode() {
            UpstreamError::InvalidResponse(e.to_string())
        } else {
            UpstreamError::Unavailable(e.to_string())
        }
    }
}
