//! Task-completion checker.
//!
//! Recomputed on every call from three file-system predicates; nothing is
//! persisted between calls. A predicate whose I/O fails counts as false.
//!
//! The testing predicate flags any `.mq5` file modified inside the window
//! and has no way to mark a file as tested, so the same file is flagged on
//! every check until the window passes.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::config::{CompletionConfig, HooksConfig};
use crate::domain::context::EventContext;
use crate::domain::task::{CompletionReport, PendingTask, PendingTaskKind};
use crate::hook_log::HookLog;
use crate::obs;

/// Checks whether the agent can go on standby.
#[derive(Debug, Clone)]
pub struct TaskCompletionChecker {
    workspace_dir: PathBuf,
    compile_log: PathBuf,
    status_log: HookLog,
    config: CompletionConfig,
}

impl TaskCompletionChecker {
    pub fn new(
        workspace_dir: impl Into<PathBuf>,
        compile_log: impl Into<PathBuf>,
        status_log: HookLog,
        config: CompletionConfig,
    ) -> Self {
        Self {
            workspace_dir: workspace_dir.into(),
            compile_log: compile_log.into(),
            status_log,
            config,
        }
    }

    /// Build a checker from the hook configuration.
    pub fn from_config(config: &HooksConfig) -> Self {
        Self::new(
            config.workspace_dir.clone(),
            config.compile_log_path(),
            HookLog::agent_status(config.status_log_path()),
            config.completion.clone(),
        )
    }

    pub fn workspace_dir(&self) -> &Path {
        &self.workspace_dir
    }

    /// Evaluate all predicates, in fixed order.
    pub async fn check_pending(&self, now: SystemTime) -> Vec<PendingTask> {
        let mut tasks = Vec::new();

        if self.has_compile_errors().await {
            tasks.push(PendingTaskKind::CompileError.into());
        }
        if self.has_unfinished_modifications().await {
            tasks.push(PendingTaskKind::CodeModification.into());
        }
        if self.has_testing_requirements(now).await {
            tasks.push(PendingTaskKind::Testing.into());
        }

        tasks
    }

    /// Produce the completion report for `ctx`. On standby an entry is
    /// appended to the agent status log.
    pub async fn evaluate(&self, ctx: &EventContext, now: SystemTime) -> CompletionReport {
        let task_type = ctx.task_label().to_string();
        let tasks = self.check_pending(now).await;

        if !tasks.is_empty() {
            return CompletionReport::Remaining { task_type, tasks };
        }

        obs::emit_agent_standby(&task_type);
        self.status_log
            .append("standby - all tasks completed")
            .await;

        CompletionReport::Standby {
            task_type,
            summary: ctx.details.summary.clone(),
            next_steps: ctx.details.next_steps.clone(),
        }
    }

    async fn has_compile_errors(&self) -> bool {
        let Ok(bytes) = tokio::fs::read(&self.compile_log).await else {
            return false;
        };
        let content = String::from_utf8_lossy(&bytes);
        self.config
            .error_keywords
            .iter()
            .any(|keyword| content.contains(keyword.as_str()))
    }

    async fn has_unfinished_modifications(&self) -> bool {
        let Ok(names) = self.file_names().await else {
            return false;
        };
        names.iter().any(|name| self.is_temp_name(name))
    }

    async fn has_testing_requirements(&self, now: SystemTime) -> bool {
        let Ok(names) = self.file_names().await else {
            return false;
        };
        let window = Duration::from_secs(self.config.testing_window_mins * 60);

        for name in names.iter().filter(|n| n.ends_with(".mq5")) {
            let Ok(meta) = tokio::fs::metadata(self.workspace_dir.join(name)).await else {
                return false;
            };
            let Ok(modified) = meta.modified() else {
                return false;
            };
            // Future mtimes count as "just modified".
            let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
            if age < window {
                return true;
            }
        }
        false
    }

    fn is_temp_name(&self, name: &str) -> bool {
        self.config.temp_suffixes.iter().any(|s| name.ends_with(s.as_str()))
            || self.config.temp_infixes.iter().any(|s| name.contains(s.as_str()))
    }

    async fn file_names(&self) -> std::io::Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.workspace_dir).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }
}
