//! Migration script naming rules.
//!
//! A script is identified by its path relative to the migrations directory,
//! e.g. `scripts/20240101120000000000_create_users.sql`. The 20-digit prefix is
//! a fixed-width timestamp, so lexical (byte-wise) order of the identifiers is
//! also the order in which the scripts were created and must be applied.

use crate::error::{CoreError, CoreResult};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Number of digits in the timestamp prefix.
pub const TIMESTAMP_WIDTH: usize = 20;

static SCRIPT_NAME_RE: OnceLock<Regex> = OnceLock::new();

/// Compiled naming pattern (built once, reused).
///
/// `scripts/` must start the string or follow a `/`, so both bare identifiers
/// and discovered paths such as `migrations/scripts/...` are accepted.
fn script_name_regex() -> &'static Regex {
    SCRIPT_NAME_RE.get_or_init(|| {
        // `\d` would also accept non-ASCII digits, which sort after every
        // ASCII timestamp
        Regex::new(&format!(r"(?:^|/)scripts/([0-9]{{{TIMESTAMP_WIDTH}}})_(\S+)\.sql$"))
            .expect("valid regex literal")
    })
}

/// Check whether `name` has the lexical shape of a migration script.
///
/// Only the shape is checked: the timestamp digits are never interpreted.
pub fn is_valid_name(name: &str) -> bool {
    script_name_regex().is_match(name)
}

/// Strongly-typed, validated migration script identifier.
///
/// Ordering is the ordering of the underlying string, which is the order in
/// which scripts are applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScriptName(String);

impl ScriptName {
    /// Validate `name` and wrap it.
    pub fn parse(name: impl Into<String>) -> CoreResult<Self> {
        let name = name.into();
        if is_valid_name(&name) {
            Ok(Self(name))
        } else {
            Err(CoreError::InvalidScriptName { name })
        }
    }

    /// The 20-digit timestamp prefix.
    pub fn timestamp(&self) -> &str {
        self.capture(1)
    }

    /// The descriptive part between the underscore and `.sql`.
    pub fn description(&self) -> &str {
        self.capture(2)
    }

    fn capture(&self, group: usize) -> &str {
        // Construction guarantees the pattern matches.
        script_name_regex()
            .captures(&self.0)
            .and_then(|caps| caps.get(group))
            .map(|m| m.as_str())
            .unwrap_or_default()
    }

    /// Return the underlying name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScriptName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ScriptName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ScriptName {
    type Error = CoreError;

    fn try_from(s: String) -> CoreResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for ScriptName {
    type Error = CoreError;

    fn try_from(s: &str) -> CoreResult<Self> {
        Self::parse(s)
    }
}

impl PartialEq<str> for ScriptName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ScriptName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
#[path = "script_name_test.rs"]
mod tests;
