//! Event context handed to hooks by the host.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Host event that can trigger a hook.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HookTrigger {
    /// An editor saved a file.
    FileSaved,

    /// The agent picked up a task.
    TaskStarted,

    /// The agent finished a task.
    TaskCompleted,
}

impl HookTrigger {
    /// Wire name used by the host.
    pub fn as_str(&self) -> &'static str {
        match self {
            HookTrigger::FileSaved => "file_saved",
            HookTrigger::TaskStarted => "task_started",
            HookTrigger::TaskCompleted => "task_completed",
        }
    }
}

impl std::fmt::Display for HookTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HookTrigger {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "file_saved" => Ok(HookTrigger::FileSaved),
            "task_started" => Ok(HookTrigger::TaskStarted),
            "task_completed" => Ok(HookTrigger::TaskCompleted),
            other => Err(format!("unknown hook trigger: {other}")),
        }
    }
}

/// Free-form completion details supplied with `task_completed`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionDetails {
    /// What was done.
    #[serde(default)]
    pub summary: Vec<String>,

    /// Suggested follow-ups.
    #[serde(default, alias = "nextSteps")]
    pub next_steps: Vec<String>,
}

/// Per-event record created by the host. Read-only to hooks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventContext {
    /// Which event fired.
    pub event: HookTrigger,

    /// Path of the saved file, as reported by the host.
    #[serde(default, alias = "filePath")]
    pub file_path: Option<String>,

    /// Bare file name of the saved file.
    #[serde(default, alias = "fileName")]
    pub file_name: Option<String>,

    /// Task label for task events.
    #[serde(default, alias = "taskType")]
    pub task_type: Option<String>,

    /// Task status, usually `completed`.
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub details: CompletionDetails,
}

impl EventContext {
    /// Context for a saved file. `file_name` is the path as given, so that
    /// the compiler is invoked with the same relative path the host saw.
    pub fn file_saved(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            event: HookTrigger::FileSaved,
            file_name: Some(path.clone()),
            file_path: Some(path),
            task_type: None,
            status: None,
            details: CompletionDetails::default(),
        }
    }

    /// Context for a task that just started.
    pub fn task_started(task_type: impl Into<String>) -> Self {
        Self {
            event: HookTrigger::TaskStarted,
            file_path: None,
            file_name: None,
            task_type: Some(task_type.into()),
            status: Some("started".to_string()),
            details: CompletionDetails::default(),
        }
    }

    /// Context for a completed task with its summary and next steps.
    pub fn task_completed(
        task_type: impl Into<String>,
        summary: Vec<String>,
        next_steps: Vec<String>,
    ) -> Self {
        Self {
            event: HookTrigger::TaskCompleted,
            file_path: None,
            file_name: None,
            task_type: Some(task_type.into()),
            status: Some("completed".to_string()),
            details: CompletionDetails {
                summary,
                next_steps,
            },
        }
    }

    pub fn code_modification_completed(summary: Vec<String>, next_steps: Vec<String>) -> Self {
        Self::task_completed("code modification", summary, next_steps)
    }

    pub fn compile_check_completed(summary: Vec<String>, next_steps: Vec<String>) -> Self {
        Self::task_completed("compile check", summary, next_steps)
    }

    pub fn testing_completed(summary: Vec<String>, next_steps: Vec<String>) -> Self {
        Self::task_completed("testing", summary, next_steps)
    }

    pub fn general_completed(
        task_type: impl Into<String>,
        summary: Vec<String>,
        next_steps: Vec<String>,
    ) -> Self {
        Self::task_completed(task_type, summary, next_steps)
    }

    /// Name used for glob matching: `file_name`, falling back to the last
    /// component of `file_path`.
    pub fn match_name(&self) -> Option<&str> {
        if let Some(name) = self.file_name.as_deref() {
            return Some(name);
        }
        self.file_path
            .as_deref()
            .and_then(|p| Path::new(p).file_name())
            .and_then(|n| n.to_str())
    }

    /// Task label, or a placeholder when the host did not send one.
    pub fn task_label(&self) -> &str {
        self.task_type.as_deref().unwrap_or("unspecified task")
    }

    /// Check that the fields required by `event` are present.
    pub fn validate(&self) -> crate::Result<()> {
        if self.event == HookTrigger::FileSaved && self.match_name().is_none() {
            return Err(crate::HookError::InvalidContext(
                "file_saved event without file_name or file_path".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_parse_and_display() {
        for trigger in [
            HookTrigger::FileSaved,
            HookTrigger::TaskStarted,
            HookTrigger::TaskCompleted,
        ] {
            let parsed: HookTrigger = trigger.as_str().parse().expect("parse");
            assert_eq!(parsed, trigger);
        }
        assert!("file_deleted".parse::<HookTrigger>().is_err());
    }

    #[test]
    fn test_context_accepts_host_camel_case() {
        let json = r#"{
            "event": "file_saved",
            "filePath": "./Grids Zero - 1.01.mq5",
            "fileName": "Grids Zero - 1.01.mq5"
        }"#;
        let ctx: EventContext = serde_json::from_str(json).expect("deserialize");
        assert_eq!(ctx.file_name.as_deref(), Some("Grids Zero - 1.01.mq5"));
        assert_eq!(ctx.file_path.as_deref(), Some("./Grids Zero - 1.01.mq5"));
        assert!(ctx.details.summary.is_empty());
    }

    #[test]
    fn test_match_name_falls_back_to_path() {
        let ctx = EventContext {
            file_name: None,
            file_path: Some("Experts/Grid.mq5".to_string()),
            ..EventContext::file_saved("x")
        };
        assert_eq!(ctx.match_name(), Some("Grid.mq5"));
    }

    #[test]
    fn test_validate_rejects_file_event_without_file() {
        let ctx = EventContext {
            file_name: None,
            file_path: None,
            ..EventContext::file_saved("x")
        };
        assert!(ctx.validate().is_err());
        assert!(EventContext::task_started("build").validate().is_ok());
    }

    #[test]
    fn test_completion_presets() {
        let ctx = EventContext::testing_completed(vec!["ran backtest".into()], vec![]);
        assert_eq!(ctx.event, HookTrigger::TaskCompleted);
        assert_eq!(ctx.task_label(), "testing");
        assert_eq!(ctx.status.as_deref(), Some("completed"));
        assert_eq!(ctx.details.summary, vec!["ran backtest".to_string()]);
    }
}
