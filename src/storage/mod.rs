// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Credential Storage
//!
//! Local user records and server-side tokens.
//!
//! The authenticator and the session endpoints only talk to the traits
//! defined here. [`InMemoryStore`] is the implementation the server runs
//! with; everything it holds is lost on restart.
//!
//! ## Token rows
//!
//! ```text
//! value (unique) -> { id, user_id, kind, expires_at, created_at }
//! ```
//!
//! - A value is unique across all outstanding rows.
//! - `take` reads and deletes a row in one step, so a refresh token can be
//!   used at most once.
//! - Expired rows are removed either on access or by the sweeper.

pub mod memory;
pub mod sweeper;

pub use memory::InMemoryStore;
pub use sweeper::RefreshTokenSweeper;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Role;

/// Storage error types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),
    /// Entity already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    /// Token existed but was past its expiry; the row has been deleted
    #[error("Expired: {0}")]
    Expired(String),
    /// Backend failure
    #[error("Storage backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A locally registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    /// Student NIM or staff NIP
    pub login_id: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
}

/// What a server-side token row is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Refresh,
    Verification,
    PasswordReset,
}

/// A persisted token row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub id: Uuid,
    pub user_id: u64,
    pub value: String,
    pub kind: TokenKind,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl StoredToken {
    pub fn new(user_id: u64, value: impl Into<String>, kind: TokenKind, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            value: value.into(),
            kind,
            expires_at,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Lookup contract for local user records.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_user_by_id(&self, id: u64) -> StoreResult<Option<UserRecord>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;

    /// Find a user by student NIM or staff NIP.
    async fn find_user_by_login_id(&self, login_id: &str) -> StoreResult<Option<UserRecord>>;

    /// Insert a user. An `id` of 0 asks the store to allocate one.
    async fn insert_user(&self, user: UserRecord) -> StoreResult<UserRecord>;
}

/// Server-side token rows (refresh, verification, password reset).
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Persist a new row. Fails with `AlreadyExists` on a duplicate value.
    async fn create(&self, token: StoredToken) -> StoreResult<()>;

    /// Atomically read and delete the row holding `value`.
    ///
    /// Fails with `NotFound` if no row of `kind` holds the value, and with
    /// `Expired` (after deleting it) if the row is past its expiry.
    async fn take(&self, value: &str, kind: TokenKind) -> StoreResult<StoredToken>;

    /// Delete every row owned by `user_id`, returning how many went.
    async fn delete_all_for_user(&self, user_id: u64) -> StoreResult<usize>;

    /// Delete every row expired at `now`, returning how many went.
    async fn delete_expired(&self, now: DateTime<Utc>) -> StoreResult<usize>;
}
