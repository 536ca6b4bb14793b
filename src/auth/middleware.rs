// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request authentication middleware.
//!
//! Every router subtree that needs authentication is wrapped with
//! [`authenticate`] through [`with_route_class`]. The layer carries the
//! subtree's [`RouteClass`]; the [`Authenticator`] turns that class into an
//! ordered list of strategies and tries them one after the other until one
//! accepts the bearer token.
//!
//! ```rust,ignore
//! let students = with_route_class(
//!     Router::new().route("/by-nim", get(by_nim)),
//!     &authenticator,
//!     RouteClass::IdentityFlexible,
//! );
//! ```
//!
//! On success a [`ResolvedIdentity`] is inserted into the request extensions,
//! where the extractors in `extractor.rs` pick it up. Whatever the individual
//! strategies reported, a request that no strategy accepts is rejected with
//! the same generic 401.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use chrono::Utc;
use tracing::{debug, error};

use super::campus_token::validate_campus_token;
use super::claims::{LocalIdentity, ResolvedIdentity, UpstreamIdentity};
use super::error::{AuthError, StrategyError};
use super::route_class::{RouteClass, Strategy};
use super::token::TokenIssuer;
use crate::storage::CredentialStore;

/// Shortest token worth handing to a validator.
pub const MIN_TOKEN_LENGTH: usize = 20;

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The header must be exactly two space-separated parts with the literal
/// scheme `Bearer`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if token.len() >= MIN_TOKEN_LENGTH => Ok(token),
        _ => Err(AuthError::InvalidAuthHeader),
    }
}

/// Resolves request identities from bearer tokens.
#[derive(Clone)]
pub struct Authenticator {
    tokens: Arc<TokenIssuer>,
    users: Arc<dyn CredentialStore>,
}

impl Authenticator {
    pub fn new(tokens: Arc<TokenIssuer>, users: Arc<dyn CredentialStore>) -> Self {
        Self { tokens, users }
    }

    /// Authenticate a request of the given class.
    ///
    /// Returns `Ok(None)` for public routes. Header problems are reported
    /// as such; once a token has been extracted, any failure is
    /// [`AuthError::InvalidOrExpiredToken`].
    pub async fn resolve(
        &self,
        class: RouteClass,
        headers: &HeaderMap,
    ) -> Result<Option<ResolvedIdentity>, AuthError> {
        if !class.requires_auth() {
            return Ok(None);
        }

        let token = bearer_token(headers)?;

        for &strategy in class.strategies() {
            match self.attempt(strategy, token).await {
                Ok(identity) => {
                    debug!(
                        ?class,
                        ?strategy,
                        origin = ?identity.origin(),
                        "request authenticated"
                    );
                    return Ok(Some(identity));
                }
                Err(StrategyError::Store(e)) => {
                    error!(?strategy, error = %e, "credential store failed during authentication");
                }
                Err(e) => {
                    debug!(?strategy, reason = %e, "strategy rejected token");
                }
            }
        }

        Err(AuthError::InvalidOrExpiredToken)
    }

    /// Run a single strategy against a token.
    pub async fn attempt(
        &self,
        strategy: Strategy,
        token: &str,
    ) -> Result<ResolvedIdentity, StrategyError> {
        match strategy {
            Strategy::Local => self.validate_local(token).await.map(ResolvedIdentity::Local),
            Strategy::Upstream => self.validate_upstream(token).map(ResolvedIdentity::Upstream),
        }
    }

    async fn validate_local(&self, token: &str) -> Result<LocalIdentity, StrategyError> {
        let claims = self.tokens.verify(token)?;

        match self.users.find_user_by_id(claims.user_id).await? {
            Some(user) if user.active => Ok(LocalIdentity::from_user(&user)),
            _ => Err(StrategyError::UserNotFound(claims.user_id)),
        }
    }

    fn validate_upstream(&self, token: &str) -> Result<UpstreamIdentity, StrategyError> {
        Ok(validate_campus_token(token, Utc::now().timestamp())?)
    }
}

/// Middleware state: the authenticator plus the class of the subtree.
#[derive(Clone)]
pub struct RouteGuard {
    authenticator: Authenticator,
    class: RouteClass,
}

impl RouteGuard {
    pub fn new(authenticator: Authenticator, class: RouteClass) -> Self {
        Self {
            authenticator,
            class,
        }
    }
}

/// Authentication middleware function.
pub async fn authenticate(
    State(guard): State<RouteGuard>,
    mut request: Request,
    next: Next,
) -> Response {
    match guard
        .authenticator
        .resolve(guard.class, request.headers())
        .await
    {
        Ok(Some(identity)) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Ok(None) => next.run(request).await,
        Err(e) => e.into_response(),
    }
}

/// Tag every route of `router` with `class`.
///
/// Uses `route_layer`, so unmatched paths still fall through to a 404
/// instead of a 401.
pub fn with_route_class<S>(
    router: Router<S>,
    authenticator: &Authenticator,
    class: RouteClass,
) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if !class.requires_auth() {
        return router;
    }
    router.route_layer(middleware::from_fn_with_state(
        RouteGuard::new(authenticator.clone(), class),
        authenticate,
    ))
}
