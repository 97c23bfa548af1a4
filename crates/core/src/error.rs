// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy (§7). Every crate above `adb-core` funnels its errors
//! through this enum so the daemon can place each on the right channel:
//! auth/identifier errors short-circuit before any Handle is touched,
//! engine errors are reported in-body with `success=false`, and
//! transport-level errors propagate as-is.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("internal error: {0}")]
    Internal(String),

    /// Engine execution failed; reported in-body with `success=false`,
    /// the handle remains open and untouched (§4.7).
    #[error("engine error: {0}")]
    Engine(String),
}

impl Error {
    pub fn wire_status(&self) -> Status {
        match self {
            Error::PermissionDenied(_) => Status::PermissionDenied,
            Error::InvalidArgument(_) => Status::InvalidArgument,
            Error::Internal(_) => Status::Internal,
            Error::Engine(_) => Status::Internal,
        }
    }
}

/// Wire-level status, independent of transport status (§7 table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Status {
    Ok,
    PermissionDenied,
    InvalidArgument,
    Internal,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
