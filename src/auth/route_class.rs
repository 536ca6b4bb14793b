// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Route classes and the strategy order each one implies.

use serde::Serialize;

/// How a token may be validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Locally-issued session token, confirmed against the credential store
    Local,
    /// Campus-issued token, decoded without signature verification
    Upstream,
}

/// Authentication class of a router subtree.
///
/// Attached when routes are registered; the authenticator reads it as data
/// instead of inspecting the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteClass {
    /// No authentication at all
    Public,
    /// Student and assistant routes; their clients log in through the campus
    /// system, so campus tokens are tried first
    IdentityFlexible,
    /// Everything else; local tokens first, campus tokens as a fallback
    Protected,
}

impl RouteClass {
    /// Strategies to attempt, in order. Empty for public routes.
    pub fn strategies(&self) -> &'static [Strategy] {
        match self {
            RouteClass::Public => &[],
            RouteClass::IdentityFlexible => &[Strategy::Upstream, Strategy::Local],
            RouteClass::Protected => &[Strategy::Local, Strategy::Upstream],
        }
    }

    pub fn requires_auth(&self) -> bool {
        !matches!(self, RouteClass::Public)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_has_no_strategies() {
        assert!(RouteClass::Public.strategies().is_empty());
        assert!(!RouteClass::Public.requires_auth());
    }

    #[test]
    fn flexible_tries_upstream_first() {
        assert_eq!(
            RouteClass::IdentityFlexible.strategies(),
            &[Strategy::Upstream, Strategy::Local]
        );
    }

    #[test]
    fn protected_tries_local_first() {
        assert_eq!(
            RouteClass::Protected.strategies(),
            &[Strategy::Local, Strategy::Upstream]
        );
        assert!(RouteClass::Protected.requires_auth());
    }
}
