//! Pending-task records for the completion checker.

use serde::{Deserialize, Serialize};

/// Which predicate flagged outstanding work.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PendingTaskKind {
    /// The compile log mentions errors.
    CompileError,
    /// Temp or backup files sit in the workspace.
    CodeModification,
    /// An `.mq5` file changed inside the testing window.
    Testing,
}

impl PendingTaskKind {
    pub fn description(&self) -> &'static str {
        match self {
            PendingTaskKind::CompileError => "compile errors need fixing",
            PendingTaskKind::CodeModification => "unfinished code modifications",
            PendingTaskKind::Testing => "changes need test verification",
        }
    }
}

/// Outstanding work found by a completion check. Recomputed every call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingTask {
    pub kind: PendingTaskKind,
    pub description: String,
}

impl From<PendingTaskKind> for PendingTask {
    fn from(kind: PendingTaskKind) -> Self {
        Self {
            kind,
            description: kind.description().to_string(),
        }
    }
}

/// Result of a completion check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CompletionReport {
    /// All clear: the agent is on standby.
    Standby {
        task_type: String,
        summary: Vec<String>,
        next_steps: Vec<String>,
    },

    /// Work remains.
    Remaining {
        task_type: String,
        tasks: Vec<PendingTask>,
    },
}

impl CompletionReport {
    pub fn is_standby(&self) -> bool {
        matches!(self, CompletionReport::Standby { .. })
    }
}
