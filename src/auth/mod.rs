// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Requests are authenticated by one of two authorities.
//!
//! ## Auth Flow
//!
//! 1. The client sends `Authorization: Bearer <token>`
//! 2. The middleware looks at the route class the subtree was registered with:
//!    - `Public`: no authentication
//!    - `IdentityFlexible` (students, assistants): campus token first, then local
//!    - `Protected`: local token first, then campus
//! 3. Strategies:
//!    - **Local**: HS256 token minted by this service, then the subject is
//!      looked up in the credential store (must exist and be active)
//!    - **Upstream**: campus token decoded *without* signature verification;
//!      yields only the numeric campus user id
//! 4. The first strategy that accepts the token wins. The resulting
//!    [`ResolvedIdentity`] goes into the request extensions.
//!
//! ## Security
//!
//! - Local tokens are verified with zero clock leeway
//! - Failures are never distinguished to the client: every exhausted
//!   request gets the same "Invalid or expired token"
//! - An upstream identity can never pass [`LocalAuth`] or [`AdminOnly`]

pub mod campus_token;
pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod roles;
pub mod route_class;
pub mod token;

pub use claims::{IdentityOrigin, LocalIdentity, ResolvedIdentity, SessionIdentity, UpstreamIdentity};
pub use error::AuthError;
pub use extractor::{AdminOnly, Auth, LocalAuth};
pub use middleware::{with_route_class, Authenticator};
pub use roles::Role;
pub use route_class::RouteClass;
pub use token::{IssuedToken, TokenError, TokenIssuer};
