// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Upstream Credential Manager
//!
//! Owns the single service credential used for every campus API call.
//!
//! ## Refresh
//!
//! ```text
//! Empty ──login──► Valid ──(within 30s of expiry, or 401)──► login ──► Valid
//! ```
//!
//! - Readers take the read lock and copy the token out.
//! - A stale or missing credential is replaced under the write lock. The
//!   writer re-checks after acquiring it, so callers that queued up behind
//!   a refresh reuse its result instead of logging in again.
//! - A 401 discards the credential, forces one login and retries the call
//!   once. A second 401 is returned as [`UpstreamError::Unauthorized`].
//!
//! The credential lives in memory only and is re-acquired after a restart.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};
use utoipa::ToSchema;

use super::credential::{CampusLogin, UpstreamCredential};
use super::error::UpstreamError;

/// Performs the service-account login against the campus system.
#[async_trait]
pub trait CampusAuthenticator: Send + Sync {
    async fn login(&self) -> Result<CampusLogin, UpstreamError>;
}

/// Result of one attempt at an authenticated campus call.
#[derive(Debug)]
pub enum CallOutcome<T> {
    Done(T),
    /// The campus API answered 401
    Rejected,
}

/// Point-in-time view of the cached credential. Never contains the token.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CredentialStatus {
    pub cached: bool,
    pub stale: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub has_refresh_token: bool,
    pub refreshing: bool,
    /// Logins performed since startup
    pub logins: u64,
}

pub struct UpstreamCredentialManager {
    authenticator: Arc<dyn CampusAuthenticator>,
    cached: RwLock<Option<UpstreamCredential>>,
    logins: AtomicU64,
}

impl UpstreamCredentialManager {
    pub fn new(authenticator: Arc<dyn CampusAuthenticator>) -> Self {
        Self {
            authenticator,
            cached: RwLock::new(None),
            logins: AtomicU64::new(0),
        }
    }

    /// A currently valid bearer token, logging in first if needed.
    pub async fn bearer(&self) -> Result<String, UpstreamError> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = fresh_token(cached.as_ref()) {
                return Ok(token);
            }
        }

        let mut cached = self.cached.write().await;
        if let Some(token) = fresh_token(cached.as_ref()) {
            return Ok(token);
        }

        let credential = self.login().await?;
        let token = credential.access_token.clone();
        *cached = Some(credential);
        Ok(token)
    }

    /// Replace a credential the campus API has just rejected.
    ///
    /// If another task already swapped in a different valid credential,
    /// that one is returned without logging in again.
    pub async fn force_refresh(&self, rejected: &str) -> Result<String, UpstreamError> {
        let mut cached = self.cached.write().await;
        if let Some(current) = cached.as_ref() {
            if current.access_token != rejected && !current.is_stale_at(Utc::now()) {
                return Ok(current.access_token.clone());
            }
        }

        *cached = None;
        let credential = self.login().await?;
        let token = credential.access_token.clone();
        *cached = Some(credential);
        Ok(token)
    }

    /// Acquire a credential ahead of the first request. Failures are logged.
    pub async fn prewarm(&self) {
        match self.bearer().await {
            Ok(_) => info!("Campus credential pre-fetched"),
            Err(e) => warn!(error = %e, "Initial campus credential fetch failed"),
        }
    }

    /// Snapshot of the cache without waiting on an in-flight login.
    pub fn status(&self) -> CredentialStatus {
        let logins = self.logins.load(Ordering::Relaxed);
        let Ok(cached) = self.cached.try_read() else {
            return CredentialStatus {
                cached: false,
                stale: true,
                expires_at: None,
                has_refresh_token: false,
                refreshing: true,
                logins,
            };
        };

        CredentialStatus {
            cached: cached.is_some(),
            stale: cached.as_ref().is_none_or(|c| c.is_stale_at(Utc::now())),
            expires_at: cached.as_ref().map(|c| c.expires_at),
            has_refresh_token: cached.as_ref().is_some_and(|c| c.refresh_token.is_some()),
            refreshing: false,
            logins,
        }
    }

    /// Run `op` with a valid bearer token, retrying once after a 401.
    pub async fn call<T, F, Fut>(&self, op: F) -> Result<T, UpstreamError>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<CallOutcome<T>, UpstreamError>>,
    {
        let token = self.bearer().await?;
        match op(token.clone()).await? {
            CallOutcome::Done(value) => Ok(value),
            CallOutcome::Rejected => {
                warn!("Campus API rejected the cached credential, refreshing");
                let fresh = self.force_refresh(&token).await?;
                match op(fresh).await? {
                    CallOutcome::Done(value) => Ok(value),
                    CallOutcome::Rejected => Err(UpstreamError::Unauthorized),
                }
            }
        }
    }

    async fn login(&self) -> Result<UpstreamCredential, UpstreamError> {
        let login = self.authenticator.login().await?;
        if login.token.trim().is_empty() {
            return Err(UpstreamError::Auth("empty token received".to_string()));
        }

        let credential = UpstreamCredential::from_login(login, Utc::now());
        self.logins.fetch_add(1, Ordering::Relaxed);
        info!(expires_at = %credential.expires_at, "Obtained campus credential");
        Ok(credential)
    }
}

fn fresh_token(credential: Option<&UpstreamCredential>) -> Option<String> {
    credential
        .filter(|c| !c.is_stale_at(Utc::now()))
        .map(|c| c.access_token.clone())
}
