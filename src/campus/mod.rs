// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Campus information system integration.
//!
//! - [`UpstreamCredentialManager`] keeps the service credential fresh
//! - [`CampusGateway`] performs the directory lookups with it
//! - [`HttpCampusAuthenticator`] is the service-account login the manager
//!   calls when it needs a new credential

pub mod credential;
pub mod error;
pub mod gateway;
pub mod manager;
pub mod models;

pub use credential::{CampusLogin, UpstreamCredential};
pub use error::UpstreamError;
pub use gateway::{http_client, CampusGateway, HttpCampusAuthenticator};
pub use manager::{CallOutcome, CampusAuthenticator, CredentialStatus, UpstreamCredentialManager};
