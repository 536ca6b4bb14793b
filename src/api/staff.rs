// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Teaching assistant and lecturer lookups.

use axum::{
    extract::{Query, State},
    Json,
};

use super::lookup_user_id;
use crate::{
    auth::Auth,
    campus::models::{CampusEmployee, CampusLecturer},
    error::ApiError,
    models::UserIdQuery,
    state::AppState,
};

/// Employee record of the calling teaching assistant.
#[utoipa::path(
    get,
    path = "/api/v1/assistants/me",
    tag = "Staff",
    params(UserIdQuery),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Employee directory entry", body = CampusEmployee),
        (status = 400, description = "No user id given"),
        (status = 404, description = "No such employee"),
        (status = 502, description = "Campus system unavailable")
    )
)]
pub async fn current_assistant(
    State(state): State<AppState>,
    Auth(identity): Auth,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<CampusEmployee>, ApiError> {
    let user_id = lookup_user_id(&identity, query.user_id)?;
    Ok(Json(state.campus.employee_by_user_id(user_id).await?))
}

/// Lecturer record by campus user id.
#[utoipa::path(
    get,
    path = "/api/v1/lecturers/by-user-id",
    tag = "Staff",
    params(UserIdQuery),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Lecturer directory entry", body = CampusLecturer),
        (status = 400, description = "No user id given"),
        (status = 404, description = "No such lecturer"),
        (status = 502, description = "Campus system unavailable")
    )
)]
pub async fn lecturer_by_user_id(
    State(state): State<AppState>,
    Auth(identity): Auth,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<CampusLecturer>, ApiError> {
    let user_id = lookup_user_id(&identity, query.user_id)?;
    Ok(Json(state.campus.lecturer_by_user_id(user_id).await?))
}
