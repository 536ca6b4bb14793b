// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and resolved request identities.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::Role;
use crate::storage::UserRecord;

/// Identity fields embedded into a locally-issued session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: u64,
    /// Student NIM or staff NIP
    pub login_id: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<&UserRecord> for SessionIdentity {
    fn from(user: &UserRecord) -> Self {
        Self {
            user_id: user.id,
            login_id: user.login_id.clone(),
            first_name: user.first_name.clone(),
            middle_name: user.middle_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Claims carried by a local session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalClaims {
    pub user_id: u64,
    #[serde(default)]
    pub login_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub middle_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    /// Subject (stringified user id)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Not before timestamp
    pub nbf: i64,
    /// Expiration timestamp
    pub exp: i64,
}

impl LocalClaims {
    pub fn identity(&self) -> SessionIdentity {
        SessionIdentity {
            user_id: self.user_id,
            login_id: self.login_id.clone(),
            first_name: self.first_name.clone(),
            middle_name: self.middle_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Where a request identity was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum IdentityOrigin {
    /// Locally-issued token, confirmed against the credential store
    Local,
    /// Campus-issued token, trusted at face value
    Upstream,
}

/// A store-backed identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LocalIdentity {
    pub user_id: u64,
    pub role: Role,
    pub email: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
}

impl LocalIdentity {
    pub fn from_user(user: &UserRecord) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            middle_name: user.middle_name.clone(),
            last_name: user.last_name.clone(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// An identity vouched for only by the campus system.
///
/// Carries the campus user id and nothing else; full profile data has to be
/// fetched through the campus gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct UpstreamIdentity {
    pub upstream_user_id: u64,
    /// Token expiry (Unix seconds), when the token carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

/// Identity attached to a request by the authentication middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedIdentity {
    Local(LocalIdentity),
    Upstream(UpstreamIdentity),
}

impl ResolvedIdentity {
    pub fn origin(&self) -> IdentityOrigin {
        match self {
            ResolvedIdentity::Local(_) => IdentityOrigin::Local,
            ResolvedIdentity::Upstream(_) => IdentityOrigin::Upstream,
        }
    }

    pub fn local_user_id(&self) -> Option<u64> {
        match self {
            ResolvedIdentity::Local(identity) => Some(identity.user_id),
            ResolvedIdentity::Upstream(_) => None,
        }
    }

    pub fn upstream_user_id(&self) -> Option<u64> {
        match self {
            ResolvedIdentity::Local(_) => None,
            ResolvedIdentity::Upstream(identity) => Some(identity.upstream_user_id),
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            ResolvedIdentity::Local(identity) => Some(identity.role),
            ResolvedIdentity::Upstream(_) => None,
        }
    }

    /// Check if the identity has the required role.
    ///
    /// Upstream identities carry no role and never pass.
    pub fn has_role(&self, required: Role) -> bool {
        self.role().is_some_and(|role| role.has_privilege(required))
    }
}
