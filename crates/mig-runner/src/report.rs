//! Outcome types for a migration run and for a read-only plan.

use serde::Serialize;
use std::fmt;

/// Why a run stopped before reaching the end of the script list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HaltReason {
    /// Scripts could not be enumerated; nothing was applied
    Discovery { message: String },
    /// The resume point could not be read; nothing was applied
    MetadataRead { message: String },
    /// A script name does not match the naming rules
    InvalidName { script: String },
    /// A script file could not be read
    Unreadable { script: String, message: String },
    /// A script failed and its transaction was rolled back
    Execution { script: String, message: String },
}

impl HaltReason {
    /// The script the run stopped at, if the halt is tied to one.
    pub fn script(&self) -> Option<&str> {
        match self {
            HaltReason::Discovery { .. } | HaltReason::MetadataRead { .. } => None,
            HaltReason::InvalidName { script }
            | HaltReason::Unreadable { script, .. }
            | HaltReason::Execution { script, .. } => Some(script),
        }
    }
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaltReason::Discovery { message } => {
                write!(f, "could not discover migration scripts: {message}")
            }
            HaltReason::MetadataRead { message } => {
                write!(f, "could not read migration metadata: {message}")
            }
            HaltReason::InvalidName { script } => {
                write!(f, "invalid file name format for file: {script}")
            }
            HaltReason::Unreadable { script, message } => {
                write!(f, "could not read {script}: {message}")
            }
            HaltReason::Execution { script, message } => {
                write!(f, "migration {script} failed and was rolled back: {message}")
            }
        }
    }
}

/// Result of [`crate::Migrator::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Scripts committed during this run, in order
    pub applied: Vec<String>,
    /// Scripts at or before the resume point
    pub skipped: usize,
    /// Applied scripts whose bookkeeping row could not be written; a later
    /// run may apply them again
    pub unrecorded: Vec<String>,
    /// Set when the run stopped early
    pub halt: Option<HaltReason>,
}

impl MigrationReport {
    /// Number of scripts applied.
    pub fn count(&self) -> usize {
        self.applied.len()
    }

    /// The last script applied, if any.
    pub fn last_completed(&self) -> Option<&str> {
        self.applied.last().map(String::as_str)
    }

    /// No halt and every applied script recorded.
    pub fn is_clean(&self) -> bool {
        self.halt.is_none() && self.unrecorded.is_empty()
    }

    /// One-line summary of what was applied.
    pub fn summary(&self) -> String {
        match self.last_completed() {
            Some(last) => format!(
                "{} migrations completed. Last completed: {}",
                self.count(),
                last
            ),
            None => "No migrations performed".to_string(),
        }
    }
}

/// Where a discovered script stands relative to the resume point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptState {
    /// At or before the last recorded script
    Applied,
    /// Would be applied by the next run
    Pending,
    /// Name fails the naming rules; the run stops here
    InvalidName,
    /// After an invalid name, so never reached
    Blocked,
}

impl fmt::Display for ScriptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptState::Applied => write!(f, "applied"),
            ScriptState::Pending => write!(f, "pending"),
            ScriptState::InvalidName => write!(f, "invalid name"),
            ScriptState::Blocked => write!(f, "blocked"),
        }
    }
}

/// One discovered script in a [`MigrationPlan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanEntry {
    pub script: String,
    pub state: ScriptState,
}

/// Result of [`crate::Migrator::plan`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationPlan {
    /// Resume point read from the bookkeeping table
    pub last_applied: Option<String>,
    /// Every discovered script in application order
    pub entries: Vec<PlanEntry>,
}

impl MigrationPlan {
    fn with_state(&self, state: ScriptState) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |e| e.state == state)
            .map(|e| e.script.as_str())
    }

    /// Scripts the next run would apply, in order.
    pub fn pending(&self) -> Vec<&str> {
        self.with_state(ScriptState::Pending).collect()
    }

    /// The first script with an invalid name, if any.
    pub fn invalid_name(&self) -> Option<&str> {
        self.with_state(ScriptState::InvalidName).next()
    }

    /// Count of scripts in `state`.
    pub fn count(&self, state: ScriptState) -> usize {
        self.with_state(state).count()
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
