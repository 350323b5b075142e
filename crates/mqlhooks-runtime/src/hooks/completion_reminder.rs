//! Standby check on task completion.

use async_trait::async_trait;
use mqlhooks_core::{
    CompletionReport, EventContext, Hook, HookConfig, HookOutcome, HookTrigger, HooksConfig,
    TaskCompletionChecker,
};
use std::time::SystemTime;
use tracing::info;

pub const NAME: &str = "Task Completion Reminder";

pub struct TaskCompletionReminder {
    config: HookConfig,
    checker: TaskCompletionChecker,
}

impl TaskCompletionReminder {
    pub fn new(settings: &HooksConfig) -> Self {
        let config = HookConfig::new(
            NAME,
            "Report standby or the work still outstanding when a task completes",
            &[HookTrigger::TaskCompleted],
        )
        .enabled(settings.hooks.task_completion_reminder);

        Self {
            config,
            checker: TaskCompletionChecker::from_config(settings),
        }
    }
}

#[async_trait]
impl Hook for TaskCompletionReminder {
    fn config(&self) -> &HookConfig {
        &self.config
    }

    async fn execute(&self, ctx: &EventContext) -> HookOutcome {
        let report = self.checker.evaluate(ctx, SystemTime::now()).await;
        if let CompletionReport::Remaining { task_type, tasks } = &report {
            for task in tasks {
                info!(task_type = %task_type, kind = ?task.kind, "{}", task.description);
            }
        }
        HookOutcome::Completion(report)
    }
}
