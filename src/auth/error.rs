// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! Two layers live here. [`StrategyError`] is what a single validation
//! strategy reports internally; it keeps the precise cause for logging.
//! [`AuthError`] is what leaves the service: once every strategy for a route
//! has failed, the caller only ever sees [`AuthError::InvalidOrExpiredToken`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::campus_token::CampusTokenError;
use super::token::TokenError;
use crate::storage::StoreError;

/// Authentication error returned to HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("Authorization header is missing")]
    MissingAuthHeader,
    /// Header is not exactly `Bearer <token>`, or the token is implausibly short
    #[error("Invalid authorization header format (expected 'Bearer <token>')")]
    InvalidAuthHeader,
    /// Every validation strategy for the route failed
    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,
    /// Login id / password pair was rejected
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// Refresh token unknown, already used, or expired
    #[error("Invalid refresh token")]
    InvalidRefreshToken,
    /// Handler requires a locally registered account
    #[error("This endpoint requires a locally registered account")]
    LocalAccountRequired,
    /// Authenticated, but the role is not sufficient
    #[error("Insufficient permissions for this operation")]
    InsufficientPermissions,
    /// Internal failure; the message is logged, never rendered
    #[error("Internal authentication error")]
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::InvalidOrExpiredToken => "invalid_token",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::InvalidRefreshToken => "invalid_refresh_token",
            AuthError::LocalAccountRequired => "local_account_required",
            AuthError::InsufficientPermissions => "insufficient_permissions",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::InvalidOrExpiredToken
            | AuthError::InvalidCredentials
            | AuthError::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
            AuthError::LocalAccountRequired | AuthError::InsufficientPermissions => {
                StatusCode::FORBIDDEN
            }
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Internal(detail) = &self {
            tracing::error!(error = %detail, "authentication failed internally");
        }
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}

/// Why a single validation strategy rejected a token.
///
/// Never rendered to clients.
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    #[error("local token rejected: {0}")]
    LocalToken(#[from] TokenError),
    #[error("campus token rejected: {0}")]
    CampusToken(#[from] CampusTokenError),
    #[error("user {0} not found")]
    UserNotFound(u64),
    #[error("credential store failed: {0}")]
    Store(#[from] StoreError),
}
