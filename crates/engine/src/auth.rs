// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Auth Gate (§4.5, §4.7): every handler starts here. Failures
//! short-circuit as *permission denied* before any Handle is touched.

use adb_core::{Error, Result};

/// Validates a tenant identifier. Empty or whitespace-only tenants are
/// rejected; everything else is accepted — tenant strings are opaque
/// above the sanitizer (§3, §4.1), and the Handle Store itself is the
/// component that derives a container name from one.
pub fn validate_tenant(tenant: &str) -> Result<()> {
    if tenant.trim().is_empty() {
        return Err(Error::PermissionDenied("missing tenant identifier".to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
