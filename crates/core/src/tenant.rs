// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tenant identifiers and the path sanitizer (§3, §4.1).
//!
//! A tenant string is opaque to everything above this module; the only
//! thing derived from it is a container-name fragment. Sanitization is a
//! pure function: lowercase, map `_` to `-`, collapse anything outside
//! `[a-z0-9.-]` to `-`. It never removes characters, so it is never empty
//! for non-empty input, and it is idempotent by construction (the output
//! alphabet is a subset of its own domain).

use serde::{Deserialize, Serialize};

const ORG_PREFIX: &str = "org-";

/// An opaque tenant identifier, distinguishing user-scoped from
/// organization-scoped tenants by the `org-` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(String);

impl TenantId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_org_scoped(&self) -> bool {
        self.0.starts_with(ORG_PREFIX)
    }

    /// Container name this tenant's databases live under.
    ///
    /// `"user-<sanitized>-duckdb"` for user-scoped tenants,
    /// `"<sanitized>-duckdb"` for organization-scoped ones.
    pub fn container_name(&self) -> String {
        let fragment = sanitize(&self.0);
        if self.is_org_scoped() {
            format!("{fragment}-duckdb")
        } else {
            format!("user-{fragment}-duckdb")
        }
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Derive a lowercase, object-store-safe container fragment from a raw
/// tenant string. Idempotent; never empty for non-empty input.
pub fn sanitize(tenant: &str) -> String {
    tenant
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            '_' => '-',
            c if c.is_ascii_alphanumeric() || c == '.' || c == '-' => c,
            _ => '-',
        })
        .collect()
}

#[cfg(test)]
#[path = "tenant_tests.rs"]
mod tests;
