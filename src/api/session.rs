// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session endpoints: login, refresh, logout and `me`.
//!
//! A session is an access token signed by [`crate::auth::TokenIssuer`] plus an
//! opaque refresh token kept in the
//! [`crate::storage::RefreshTokenStore`]. Refresh tokens are
//! single-use: `/auth/refresh` takes the row and issues a whole new pair.

use axum::{extract::State, Json};
use chrono::Utc;
use ring::rand::{SecureRandom, SystemRandom};
use tracing::{info, warn};

use crate::{
    auth::{password::verify_password, Auth, AuthError, ResolvedIdentity, Role, SessionIdentity},
    error::ApiError,
    models::{
        AdminLoginRequest, LoginRequest, MeResponse, MessageResponse, RefreshRequest,
        SessionResponse, TokenPair, UserProfile,
    },
    state::AppState,
    storage::{StoreError, StoredToken, TokenKind, UserRecord},
};

const REFRESH_TOKEN_BYTES: usize = 32;

fn generate_refresh_token() -> Result<String, AuthError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| AuthError::Internal("system RNG unavailable".to_string()))?;
    Ok(hex::encode(bytes))
}

/// Issue an access token and a fresh refresh token for `user`.
async fn open_session(state: &AppState, user: &UserRecord) -> Result<SessionResponse, ApiError> {
    let access = state
        .tokens
        .issue(&SessionIdentity::from(user))
        .map_err(|e| AuthError::Internal(format!("access token: {e}")))?;

    let refresh_value = generate_refresh_token()?;
    let expires_at = Utc::now()
        .checked_add_signed(state.refresh_token_lifetime)
        .ok_or_else(|| AuthError::Internal("refresh token expiry out of range".to_string()))?;
    state
        .refresh_tokens
        .create(StoredToken::new(user.id, refresh_value.clone(), TokenKind::Refresh, expires_at))
        .await?;

    Ok(SessionResponse {
        user: UserProfile::from(user),
        tokens: TokenPair {
            access_token: access.token,
            refresh_token: refresh_value,
            expires_in: state.tokens.lifetime().num_seconds(),
            token_type: "Bearer".to_string(),
        },
        user_type: user.role,
    })
}

fn check_password(user: Option<UserRecord>, password: &str) -> Result<UserRecord, AuthError> {
    match user {
        Some(user) if user.active && verify_password(password, &user.password_hash) => Ok(user),
        _ => Err(AuthError::InvalidCredentials),
    }
}

/// Log in with a student NIM or staff NIP.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session opened", body = SessionResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let found = state.users.find_user_by_login_id(request.login_id.trim()).await?;
    let user = check_password(found, &request.password).inspect_err(|_| {
        info!(login_id = %request.login_id, "Login rejected");
    })?;

    let session = open_session(&state, &user).await?;
    info!(user_id = user.id, role = %user.role, "User logged in");
    Ok(Json(session))
}

/// Log in as an administrator.
#[utoipa::path(
    post,
    path = "/api/v1/auth/admin/login",
    tag = "Auth",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Session opened", body = SessionResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn admin_login(
    State(state): State<AppState>,
    Json(request): Json<AdminLoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let found = state.users.find_user_by_email(request.email.trim()).await?;
    let user = check_password(found, &request.password)?;
    if user.role != Role::Admin {
        warn!(user_id = user.id, "Non-admin account attempted admin login");
        return Err(AuthError::InvalidCredentials.into());
    }

    let session = open_session(&state, &user).await?;
    info!(user_id = user.id, "Admin logged in");
    Ok(Json(session))
}

/// Exchange a refresh token for a new token pair.
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "Auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair", body = SessionResponse),
        (status = 401, description = "Refresh token unknown, used or expired")
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let row = match state
        .refresh_tokens
        .take(&request.refresh_token, TokenKind::Refresh)
        .await
    {
        Ok(row) => row,
        Err(StoreError::NotFound(_) | StoreError::Expired(_)) => {
            return Err(AuthError::InvalidRefreshToken.into())
        }
        Err(e) => return Err(e.into()),
    };

    let user = match state.users.find_user_by_id(row.user_id).await? {
        Some(user) if user.active => user,
        _ => {
            let revoked = state.refresh_tokens.delete_all_for_user(row.user_id).await?;
            warn!(user_id = row.user_id, revoked, "Refresh attempted for unavailable account");
            return Err(AuthError::InvalidRefreshToken.into());
        }
    };

    Ok(Json(open_session(&state, &user).await?))
}

/// Revoke a refresh token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Refresh token unknown")
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    match state
        .refresh_tokens
        .take(&request.refresh_token, TokenKind::Refresh)
        .await
    {
        Ok(row) => {
            info!(user_id = row.user_id, "User logged out");
            Ok(Json(MessageResponse {
                message: "Logged out".to_string(),
            }))
        }
        Err(StoreError::NotFound(_) | StoreError::Expired(_)) => {
            Err(AuthError::InvalidRefreshToken.into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Describe the authenticated caller.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Caller identity", body = MeResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn me(
    State(state): State<AppState>,
    Auth(identity): Auth,
) -> Result<Json<MeResponse>, ApiError> {
    let user = match &identity {
        ResolvedIdentity::Local(local) => {
            let record = state
                .users
                .find_user_by_id(local.user_id)
                .await?
                .ok_or(AuthError::InvalidOrExpiredToken)?;
            Some(UserProfile::from(&record))
        }
        ResolvedIdentity::Upstream(_) => None,
    };

    Ok(Json(MeResponse {
        origin: identity.origin(),
        user,
        upstream_user_id: identity.upstream_user_id(),
    }))
}
