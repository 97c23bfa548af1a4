// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request Handlers and Auth Gate (§4.5, §4.7): the thin adapters that
//! turn `adb-wire` requests into Handle Store lookups and engine calls.
//!
//! Every handler method takes and returns plain values and an
//! `adb_wire::Response` — there is no separate transport-error channel
//! above this crate (§7's auth/identifier/engine-error taxonomy
//! collapses into the single `Response` envelope). `adb-daemon` only
//! has to frame and write what these methods return.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod auth;
pub mod handlers;
pub mod wrap;

pub use handlers::{Handlers, ImportSession};
