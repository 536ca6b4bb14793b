// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Campus Identity Server - dual-authority authentication backend
//!
//! Requests are authenticated either with session tokens issued here or with
//! tokens issued by the campus information system. Profile lookups are proxied
//! to the campus system with a shared service credential.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token issuing, route classes and the authentication middleware
//! - `campus` - Campus API client and service credential manager
//! - `storage` - Local users and refresh tokens

pub mod api;
pub mod auth;
pub mod campus;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
