// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Row/value wire encoding (§4.6): a tagged sum so every source runtime
//! type from the embedded engine collapses onto one of seven variants.

use serde::{Deserialize, Serialize};

/// One cell of a result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Value {
    Null,
    Int(i64),
    Double(f64),
    Bool(bool),
    Bytes(Vec<u8>),
    String(String),
    /// Milliseconds since the Unix epoch — the "protocol timestamp" of
    /// §4.6.
    Timestamp(i64),
}

impl Value {
    /// Default column type name unless the engine provides a richer
    /// mapping (§4.6: "VARCHAR" unless overridden).
    pub const DEFAULT_COLUMN_TYPE: &'static str = "VARCHAR";
}

/// A result column: name plus (optionally engine-supplied) type name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub type_name: String,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), type_name: Value::DEFAULT_COLUMN_TYPE.to_string() }
    }

    pub fn with_type(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self { name: name.into(), type_name: type_name.into() }
    }
}

/// One decoded result row.
pub type Row = Vec<Value>;

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
