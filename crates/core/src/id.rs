// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ID allocation helpers.
//!
//! The Handle Store needs a nanosecond-timestamped suffix to make every
//! materialized local file unique (§3, §4.3 step 3); `PrepareStatement`
//! needs an opaque identifier of the form `"stmt_<tenant>_<nanos>"`
//! (§4.5) with no backing cache. Both are thin wrappers over the
//! system clock plus a short random tag so collisions within the same
//! nanosecond are still vanishingly unlikely.

use std::time::{SystemTime, UNIX_EPOCH};

fn now_nanos() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos()
}

/// `"<nanos>-<4-char-tag>"`, suitable for appending to a scratch filename.
pub fn object_key_suffix() -> String {
    format!("{}-{}", now_nanos(), nanoid::nanoid!(4))
}

/// `"stmt_<tenant>_<nanos>"` — allocation only, no cache (§4.5, §9 Open
/// Question 2).
pub fn prepared_statement_id(tenant: &str) -> String {
    format!("stmt_{tenant}_{}", now_nanos())
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
