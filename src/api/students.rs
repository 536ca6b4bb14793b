// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Student directory lookups, proxied to the campus system.
//!
//! These routes accept both local and campus tokens. A campus caller may omit
//! `user_id` to look up its own record.

use axum::{
    extract::{Query, State},
    Json,
};

use super::lookup_user_id;
use crate::{
    auth::Auth,
    campus::models::{CampusStudent, CampusStudentDetail, StudentComplete},
    error::ApiError,
    models::{NimQuery, UserIdQuery},
    state::AppState,
};

/// The caller's own student record.
#[utoipa::path(
    get,
    path = "/api/v1/students",
    tag = "Students",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Student directory entry", body = CampusStudent),
        (status = 400, description = "Caller has no campus user id"),
        (status = 404, description = "No such student"),
        (status = 502, description = "Campus system unavailable")
    )
)]
pub async fn current_student(
    State(state): State<AppState>,
    Auth(identity): Auth,
) -> Result<Json<CampusStudent>, ApiError> {
    let user_id = lookup_user_id(&identity, None)?;
    Ok(Json(state.campus.student_by_user_id(user_id).await?))
}

/// Student directory entry by campus user id.
#[utoipa::path(
    get,
    path = "/api/v1/students/by-user-id",
    tag = "Students",
    params(UserIdQuery),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Student directory entry", body = CampusStudent),
        (status = 400, description = "No user id given"),
        (status = 404, description = "No such student"),
        (status = 502, description = "Campus system unavailable")
    )
)]
pub async fn student_by_user_id(
    State(state): State<AppState>,
    Auth(identity): Auth,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<CampusStudent>, ApiError> {
    let user_id = lookup_user_id(&identity, query.user_id)?;
    Ok(Json(state.campus.student_by_user_id(user_id).await?))
}

/// Detailed student profile by NIM.
#[utoipa::path(
    get,
    path = "/api/v1/students/by-nim",
    tag = "Students",
    params(NimQuery),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Student profile", body = CampusStudentDetail),
        (status = 400, description = "Empty NIM"),
        (status = 404, description = "No such student"),
        (status = 502, description = "Campus system unavailable")
    )
)]
pub async fn student_by_nim(
    State(state): State<AppState>,
    Query(query): Query<NimQuery>,
) -> Result<Json<CampusStudentDetail>, ApiError> {
    let nim = query.nim.trim();
    if nim.is_empty() {
        return Err(ApiError::bad_request("nim must not be empty"));
    }
    Ok(Json(state.campus.student_detail_by_nim(nim).await?))
}

/// Directory entry and detailed profile in one response.
#[utoipa::path(
    get,
    path = "/api/v1/students/complete",
    tag = "Students",
    params(UserIdQuery),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Complete student record", body = StudentComplete),
        (status = 400, description = "No user id given"),
        (status = 404, description = "No such student"),
        (status = 502, description = "Campus system unavailable")
    )
)]
pub async fn student_complete(
    State(state): State<AppState>,
    Auth(identity): Auth,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<StudentComplete>, ApiError> {
    let user_id = lookup_user_id(&identity, query.user_id)?;
    Ok(Json(state.campus.student_complete(user_id).await?))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{upstream_token, TestApp};
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn upstream_caller_gets_own_record() {
        let app = TestApp::spawn().await;
        let token = upstream_token(9001);

        let (status, body) = app.request(Method::GET, "/api/v1/students", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["nim"], "11S20001");
        assert_eq!(body["user_id"], 9001);
    }

    #[tokio::test]
    async fn local_caller_must_name_a_user() {
        let app = TestApp::spawn().await;
        let token = app.local_token(42).await;

        let (status, _) = app
            .request(Method::GET, "/api/v1/students/by-user-id", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app
            .request(Method::GET, "/api/v1/students/by-user-id?user_id=9001", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["nama"], "Rina Sitorus");
    }

    #[tokio::test]
    async fn by_nim_returns_detail_or_404() {
        let app = TestApp::spawn().await;
        let token = upstream_token(9001);

        let (status, body) = app
            .request(Method::GET, "/api/v1/students/by-nim?nim=11S20001", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["dosen_wali"], "Pak Budi");

        let (status, body) = app
            .request(Method::GET, "/api/v1/students/by-nim?nim=00000000", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Student with NIM 00000000 not found");
    }

    #[tokio::test]
    async fn complete_combines_both_records() {
        let app = TestApp::spawn().await;
        let token = upstream_token(9001);

        let (status, body) = app
            .request(Method::GET, "/api/v1/students/complete", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["basic_info"]["nim"], "11S20001");
        assert_eq!(body["details"]["asrama"], "Pniel");
        assert_eq!(app.campus.logins(), 1);
    }

    #[tokio::test]
    async fn campus_outage_is_502_without_detail() {
        let app = TestApp::spawn_with_campus_password("wrong").await;
        let token = upstream_token(9001);

        let (status, body) = app.request(Method::GET, "/api/v1/students", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "Campus information system is unavailable");
    }
}
