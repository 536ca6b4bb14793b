// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. Campus directory records are
//! returned as-is from `campus::models`.
//!
//! ## Model Categories
//!
//! - **Sessions**: login, refresh, logout and the issued token pair
//! - **Identity**: the caller's profile as seen by `/auth/me`
//! - **Lookups**: query parameters of the campus directory routes

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::{IdentityOrigin, Role};
use crate::storage::UserRecord;

// =============================================================================
// Session Models
// =============================================================================

/// Login with a student NIM or staff NIP.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub login_id: String,
    pub password: String,
}

/// Admin login by email.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `/auth/refresh` and `/auth/logout`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Access and refresh token issued together.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    /// Always `Bearer`
    pub token_type: String,
}

/// Public view of a local account. Never includes the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: u64,
    pub login_id: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
}

impl From<&UserRecord> for UserProfile {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            login_id: user.login_id.clone(),
            first_name: user.first_name.clone(),
            middle_name: user.middle_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Successful login or refresh.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub user: UserProfile,
    pub tokens: TokenPair,
    pub user_type: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// Identity Models
// =============================================================================

/// Response of `/auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    pub origin: IdentityOrigin,
    /// Present for store-backed identities
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    /// Present for campus identities
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_user_id: Option<u64>,
}

// =============================================================================
// Lookup Models
// =============================================================================

/// Campus user id; defaults to the caller's own campus id.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct UserIdQuery {
    pub user_id: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct NimQuery {
    pub nim: String,
}
