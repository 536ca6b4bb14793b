// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Expired Token Sweeper
//!
//! Background task that periodically deletes token rows whose expiry has
//! passed. `take` already refuses expired rows, so the sweep only keeps the
//! table from growing with tokens nobody ever came back for.
//!
//! ## Shutdown
//!
//! Stops when its `tokio_util::sync::CancellationToken` is cancelled.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::RefreshTokenStore;

/// Default interval between sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

pub struct RefreshTokenSweeper {
    store: Arc<dyn RefreshTokenStore>,
    interval: Duration,
}

impl RefreshTokenSweeper {
    pub fn new(store: Arc<dyn RefreshTokenStore>) -> Self {
        Self {
            store,
            interval: DEFAULT_SWEEP_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Run the sweep loop until the cancellation token is triggered.
    ///
    /// ```rust,ignore
    /// tokio::spawn(sweeper.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.interval.as_secs(),
            "Refresh token sweeper starting"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {},
                _ = shutdown.cancelled() => {
                    info!("Refresh token sweeper shutting down");
                    return;
                }
            }

            self.sweep().await;
        }
    }

    /// Delete every expired row once. Returns how many were removed.
    pub async fn sweep(&self) -> usize {
        match self.store.delete_expired(Utc::now()).await {
            Ok(0) => {
                debug!("Refresh token sweep: nothing expired");
                0
            }
            Ok(removed) => {
                info!(removed, "Refresh token sweep: deleted expired tokens");
                removed
            }
            Err(e) => {
                warn!(error = %e, "Refresh token sweep failed");
                0
            }
        }
    }
}
