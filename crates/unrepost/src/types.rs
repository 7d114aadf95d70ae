//! Opaque platform token types.
//!
//! The remote service hands out two kinds of tokens the core never
//! interprets: the per-user `secUid` and the pagination cursor. Both are
//! newtypes so they cannot be mixed up with usernames or video ids.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The platform's opaque internal identifier for a user.
///
/// Distinct from the human-readable username; obtained via user lookup and
/// required by the repost list endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecUid(String);

impl SecUid {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SecUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An opaque pagination token.
///
/// The server returns it either as a string or as an integer offset; both are
/// normalized to their string form. The core only threads cursors through and
/// compares them, never interprets them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// The cursor for the first page.
    pub fn start() -> Self {
        Self("0".to_string())
    }

    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Normalize a JSON cursor field (string or number) into a cursor.
    /// Returns `None` for any other shape, letting the caller keep its
    /// current cursor.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
