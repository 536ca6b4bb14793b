// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for authenticated identities.
//!
//! The middleware does the actual authentication; these extractors only read
//! the [`ResolvedIdentity`] it left in the request extensions and apply the
//! handler's requirements on top:
//!
//! ```rust,ignore
//! async fn me(Auth(identity): Auth) -> impl IntoResponse { /* local or upstream */ }
//! async fn profile(LocalAuth(user): LocalAuth) -> impl IntoResponse { /* store-backed */ }
//! async fn status(AdminOnly(admin): AdminOnly) -> impl IntoResponse { /* admin role */ }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::claims::{LocalIdentity, ResolvedIdentity};
use super::error::AuthError;
use super::roles::Role;

/// Any authenticated identity, local or upstream.
///
/// Rejects with 401 when the route was not authenticated at all, which only
/// happens if the handler is mounted on a public subtree by mistake.
pub struct Auth(pub ResolvedIdentity);

impl<S: Send + Sync> FromRequestParts<S> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ResolvedIdentity>()
            .cloned()
            .map(Auth)
            .ok_or(AuthError::MissingAuthHeader)
    }
}

/// A store-backed identity. Upstream identities are refused with 403.
pub struct LocalAuth(pub LocalIdentity);

impl<S: Send + Sync> FromRequestParts<S> for LocalAuth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Auth::from_request_parts(parts, state).await? {
            Auth(ResolvedIdentity::Local(identity)) => Ok(LocalAuth(identity)),
            Auth(ResolvedIdentity::Upstream(_)) => Err(AuthError::LocalAccountRequired),
        }
    }
}

/// Extractor that requires admin role.
pub struct AdminOnly(pub LocalIdentity);

impl<S: Send + Sync> FromRequestParts<S> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let LocalAuth(identity) = LocalAuth::from_request_parts(parts, state).await?;

        if !identity.role.has_privilege(Role::Admin) {
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(AdminOnly(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::UpstreamIdentity;
    use axum::http::Request;

    fn parts_with(identity: Option<ResolvedIdentity>) -> Parts {
        let mut parts = Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0;
        if let Some(identity) = identity {
            parts.extensions.insert(identity);
        }
        parts
    }

    fn local(role: Role) -> ResolvedIdentity {
        ResolvedIdentity::Local(LocalIdentity {
            user_id: 42,
            role,
            email: "someone@example.ac.id".to_string(),
            first_name: "Some".to_string(),
            middle_name: String::new(),
            last_name: "One".to_string(),
        })
    }

    fn upstream() -> ResolvedIdentity {
        ResolvedIdentity::Upstream(UpstreamIdentity {
            upstream_user_id: 9001,
            expires_at: None,
        })
    }

    #[tokio::test]
    async fn auth_requires_identity() {
        let mut parts = parts_with(None);
        let result = Auth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn auth_accepts_either_origin() {
        let mut parts = parts_with(Some(upstream()));
        let Auth(identity) = Auth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(identity.upstream_user_id(), Some(9001));

        let mut parts = parts_with(Some(local(Role::Student)));
        let Auth(identity) = Auth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(identity.local_user_id(), Some(42));
    }

    #[tokio::test]
    async fn local_auth_refuses_upstream_identity() {
        let mut parts = parts_with(Some(upstream()));
        let result = LocalAuth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::LocalAccountRequired)));
    }

    #[tokio::test]
    async fn admin_only_rejects_non_admin() {
        let mut parts = parts_with(Some(local(Role::Lecturer)));
        let result = AdminOnly::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::InsufficientPermissions)));

        let mut parts = parts_with(Some(local(Role::Admin)));
        assert!(AdminOnly::from_request_parts(&mut parts, &()).await.is_ok());
    }
}
