// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server-side identifier wrapping (§4.5): table/view identifiers the
//! caller supplies are namespaced per-tenant within a shared database
//! file, and direct object-store analytics resolve against an
//! "effective" container that defaults to the tenant's own.

use adb_core::sanitize;

/// `"user_<tenant>_<name>"`, sanitized so the wrapped identifier stays
/// a legal SQL identifier regardless of what the tenant string
/// contains.
pub fn wrap_table_name(tenant: &str, name: &str) -> String {
    format!("user_{}_{}", sanitize(tenant).replace('-', "_"), name)
}

/// Prefix used to filter engine-reported tables/views back down to
/// this tenant's own.
pub fn tenant_prefix(tenant: &str) -> String {
    format!("user_{}_", sanitize(tenant).replace('-', "_"))
}

/// Strips a tenant's wrapping prefix from an engine-reported name,
/// returning the original caller-facing name.
pub fn unwrap_table_name<'a>(tenant: &str, wrapped: &'a str) -> &'a str {
    wrapped.strip_prefix(&tenant_prefix(tenant)).unwrap_or(wrapped)
}

/// Effective-container rule (§4.5): if the caller-supplied container
/// does not already start with `user-` and the tenant is not
/// `org-`-prefixed, rewrite it to `"user-<sanitized(tenant)>-<original>"`.
pub fn effective_container(tenant: &str, container: &str) -> String {
    if container.starts_with("user-") || tenant.starts_with("org-") {
        container.to_string()
    } else {
        format!("user-{}-{}", sanitize(tenant), container)
    }
}

#[cfg(test)]
#[path = "wrap_tests.rs"]
mod tests;
