// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin-only operational endpoints.

use axum::{extract::State, Json};
use tracing::info;

use crate::{auth::AdminOnly, campus::CredentialStatus, state::AppState};

/// State of the shared campus service credential.
///
/// Reports whether a credential is cached and when it expires. The token
/// itself is never returned.
#[utoipa::path(
    get,
    path = "/api/v1/admin/campus/credential",
    tag = "Admin",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Credential status", body = CredentialStatus),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn campus_credential(
    State(state): State<AppState>,
    AdminOnly(admin): AdminOnly,
) -> Json<CredentialStatus> {
    info!(admin_id = admin.user_id, "Admin inspected campus credential");
    Json(state.credentials().status())
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{upstream_token, TestApp, ADMIN_ID};
    use axum::http::{Method, StatusCode};

    const PATH: &str = "/api/v1/admin/campus/credential";

    #[tokio::test]
    async fn admin_sees_status_without_token() {
        let app = TestApp::spawn().await;
        app.state.credentials().prewarm().await;
        let token = app.local_token(ADMIN_ID).await;

        let (status, body) = app.request(Method::GET, PATH, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cached"], true);
        assert_eq!(body["stale"], false);
        assert_eq!(body["has_refresh_token"], true);
        assert_eq!(body["logins"], 1);
        assert!(!body.to_string().contains("eyJ"));
    }

    #[tokio::test]
    async fn students_are_forbidden() {
        let app = TestApp::spawn().await;
        let token = app.local_token(42).await;

        let (status, body) = app.request(Method::GET, PATH, Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error_code"], "insufficient_permissions");
    }

    #[tokio::test]
    async fn upstream_callers_need_a_local_account() {
        let app = TestApp::spawn().await;
        let token = upstream_token(1);

        let (status, body) = app.request(Method::GET, PATH, Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error_code"], "local_account_required");
    }
}
