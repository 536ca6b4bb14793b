// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Liveness report.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always "ok" while the process serves requests.
    pub status: String,
    /// Whether a campus service credential is currently cached.
    pub campus_credential_cached: bool,
    /// Whether local session tokens can be issued.
    pub session_tokens_configured: bool,
}

/// Health check endpoint handler.
///
/// Never contacts the campus system; a cold credential cache is not an error.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is running", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = state.credentials().status();
    Json(HealthResponse {
        status: "ok".to_string(),
        campus_credential_cached: status.cached,
        session_tokens_configured: state.tokens.is_configured(),
    })
}
