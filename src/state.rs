// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;

use crate::auth::{Authenticator, TokenIssuer};
use crate::campus::{
    http_client, CampusGateway, HttpCampusAuthenticator, UpstreamCredentialManager, UpstreamError,
};
use crate::config::AppConfig;
use crate::storage::{CredentialStore, InMemoryStore, RefreshTokenStore};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn CredentialStore>,
    pub refresh_tokens: Arc<dyn RefreshTokenStore>,
    pub tokens: Arc<TokenIssuer>,
    pub authenticator: Authenticator,
    pub campus: CampusGateway,
    pub refresh_token_lifetime: TimeDelta,
}

impl AppState {
    pub fn new(
        store: Arc<InMemoryStore>,
        tokens: Arc<TokenIssuer>,
        campus: CampusGateway,
        refresh_token_lifetime: Duration,
    ) -> Self {
        let users: Arc<dyn CredentialStore> = store.clone();
        Self {
            authenticator: Authenticator::new(tokens.clone(), users.clone()),
            users,
            refresh_tokens: store,
            tokens,
            campus,
            refresh_token_lifetime: TimeDelta::from_std(refresh_token_lifetime)
                .unwrap_or_else(|_| TimeDelta::days(7)),
        }
    }

    /// Wire the token issuer and campus gateway from configuration.
    pub fn from_config(config: &AppConfig, store: Arc<InMemoryStore>) -> Result<Self, UpstreamError> {
        let tokens = Arc::new(TokenIssuer::new(
            config.jwt_secret.as_deref(),
            config.jwt_expiry,
            config.jwt_issuer.clone(),
        ));

        let http = http_client(config.campus.timeout)?;
        let campus_login = HttpCampusAuthenticator::new(
            http.clone(),
            config.campus.auth_url.clone(),
            config.campus.username.clone(),
            config.campus.password.clone(),
        );
        let credentials = Arc::new(UpstreamCredentialManager::new(Arc::new(campus_login)));
        let campus = CampusGateway::new(http, config.campus.api_base_url.clone(), credentials);

        Ok(Self::new(store, tokens, campus, config.refresh_token_expiry))
    }

    pub fn credentials(&self) -> &Arc<UpstreamCredentialManager> {
        self.campus.credentials()
    }
}
