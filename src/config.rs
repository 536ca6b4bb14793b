// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read from the environment once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | HMAC secret for local session tokens | Required to issue or verify tokens |
//! | `JWT_EXPIRY` | Session token lifetime | `24h` |
//! | `JWT_ISSUER` | `iss` claim of session tokens | `campus-identity` |
//! | `REFRESH_TOKEN_EXPIRY` | Refresh token lifetime | `168h` |
//! | `REFRESH_SWEEP_INTERVAL` | Interval between expired-token sweeps | `1h` |
//! | `CAMPUS_AUTH_URL` | Campus service-account login endpoint | `https://cis-dev.del.ac.id/api/jwt-api/do-auth` |
//! | `CAMPUS_API_BASE_URL` | Campus API base URL | `https://cis.del.ac.id/api` |
//! | `CAMPUS_USERNAME` | Campus service-account username | Required for campus lookups |
//! | `CAMPUS_PASSWORD` | Campus service-account password | Required for campus lookups |
//! | `CAMPUS_TIMEOUT` | Timeout for campus HTTP calls | `30s` |
//! | `ALLOWED_ORIGINS` | Comma-separated CORS origins | any origin |
//! | `ADMIN_EMAIL` / `ADMIN_PASSWORD` | Seed admin account | Optional |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM certificate and key; HTTPS when both set | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//!
//! Durations use `humantime` syntax (`90s`, `30m`, `24h`, `7days`).

use std::time::Duration;

use crate::auth::token::{DEFAULT_ISSUER, DEFAULT_TOKEN_LIFETIME};
use crate::campus::gateway::DEFAULT_TIMEOUT;
use crate::storage::sweeper::DEFAULT_SWEEP_INTERVAL;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_EXPIRY_ENV: &str = "JWT_EXPIRY";
pub const JWT_ISSUER_ENV: &str = "JWT_ISSUER";
pub const REFRESH_TOKEN_EXPIRY_ENV: &str = "REFRESH_TOKEN_EXPIRY";
pub const REFRESH_SWEEP_INTERVAL_ENV: &str = "REFRESH_SWEEP_INTERVAL";
pub const CAMPUS_AUTH_URL_ENV: &str = "CAMPUS_AUTH_URL";
pub const CAMPUS_API_BASE_URL_ENV: &str = "CAMPUS_API_BASE_URL";
pub const CAMPUS_USERNAME_ENV: &str = "CAMPUS_USERNAME";
pub const CAMPUS_PASSWORD_ENV: &str = "CAMPUS_PASSWORD";
pub const CAMPUS_TIMEOUT_ENV: &str = "CAMPUS_TIMEOUT";
pub const ALLOWED_ORIGINS_ENV: &str = "ALLOWED_ORIGINS";
pub const ADMIN_EMAIL_ENV: &str = "ADMIN_EMAIL";
pub const ADMIN_PASSWORD_ENV: &str = "ADMIN_PASSWORD";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CAMPUS_AUTH_URL: &str = "https://cis-dev.del.ac.id/api/jwt-api/do-auth";
const DEFAULT_CAMPUS_API_BASE_URL: &str = "https://cis.del.ac.id/api";

/// Default refresh token lifetime (7 days).
pub const DEFAULT_REFRESH_TOKEN_LIFETIME: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is not a valid duration: {source}")]
    Duration {
        name: &'static str,
        source: humantime::DurationError,
    },
    #[error("{name} is not a valid {expected}: {value}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("{0} and {1} must be set together")]
    Incomplete(&'static str, &'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Clone)]
pub struct CampusSettings {
    pub auth_url: String,
    pub api_base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
}

impl std::fmt::Debug for CampusSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CampusSettings")
            .field("auth_url", &self.auth_url)
            .field("api_base_url", &self.api_base_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct TlsPaths {
    pub cert_path: String,
    pub key_path: String,
}

#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: Option<String>,
    pub jwt_expiry: Duration,
    pub jwt_issuer: String,
    pub refresh_token_expiry: Duration,
    pub refresh_sweep_interval: Duration,
    pub campus: CampusSettings,
    pub allowed_origins: Vec<String>,
    pub admin_seed: Option<AdminSeed>,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret_set", &self.jwt_secret.is_some())
            .field("jwt_expiry", &self.jwt_expiry)
            .field("jwt_issuer", &self.jwt_issuer)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .field("refresh_sweep_interval", &self.refresh_sweep_interval)
            .field("campus", &self.campus)
            .field("allowed_origins", &self.allowed_origins)
            .field("admin_seed", &self.admin_seed.as_ref().map(|s| &s.email))
            .field("tls", &self.tls)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get(PORT_ENV) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: PORT_ENV,
                expected: "port number",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let duration = |name: &'static str, default: Duration| -> Result<Duration, ConfigError> {
            match get(name) {
                Some(raw) => humantime::parse_duration(&raw)
                    .map_err(|source| ConfigError::Duration { name, source }),
                None => Ok(default),
            }
        };

        let admin_seed = match (get(ADMIN_EMAIL_ENV), get(ADMIN_PASSWORD_ENV)) {
            (Some(email), Some(password)) => Some(AdminSeed { email, password }),
            (None, None) => None,
            _ => return Err(ConfigError::Incomplete(ADMIN_EMAIL_ENV, ADMIN_PASSWORD_ENV)),
        };

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert_path), Some(key_path)) => Some(TlsPaths {
                cert_path,
                key_path,
            }),
            (None, None) => None,
            _ => return Err(ConfigError::Incomplete(TLS_CERT_PATH_ENV, TLS_KEY_PATH_ENV)),
        };

        let log_format = match get(LOG_FORMAT_ENV).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    expected: "log format (json or pretty)",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            jwt_secret: get(JWT_SECRET_ENV),
            jwt_expiry: duration(JWT_EXPIRY_ENV, DEFAULT_TOKEN_LIFETIME)?,
            jwt_issuer: get(JWT_ISSUER_ENV).unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
            refresh_token_expiry: duration(REFRESH_TOKEN_EXPIRY_ENV, DEFAULT_REFRESH_TOKEN_LIFETIME)?,
            refresh_sweep_interval: duration(REFRESH_SWEEP_INTERVAL_ENV, DEFAULT_SWEEP_INTERVAL)?,
            campus: CampusSettings {
                auth_url: get(CAMPUS_AUTH_URL_ENV).unwrap_or_else(|| DEFAULT_CAMPUS_AUTH_URL.to_string()),
                api_base_url: get(CAMPUS_API_BASE_URL_ENV)
                    .unwrap_or_else(|| DEFAULT_CAMPUS_API_BASE_URL.to_string()),
                username: get(CAMPUS_USERNAME_ENV),
                password: get(CAMPUS_PASSWORD_ENV),
                timeout: duration(CAMPUS_TIMEOUT_ENV, DEFAULT_TIMEOUT)?,
            },
            allowed_origins: get(ALLOWED_ORIGINS_ENV)
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            admin_seed,
            tls,
            log_format,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
