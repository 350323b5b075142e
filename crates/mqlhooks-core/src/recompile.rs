//! Delayed recompilation after an auto-fix.
//!
//! The recompile runs on its own tokio task. The hook returns the handle
//! without awaiting it; the host may [`RecompileHandle::wait`] for the
//! outcome or drop the handle and rely on the hook log.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// How the recompile went.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecompileOutcome {
    Succeeded,
    StillFailing { exit_code: i32 },
    Errored { error: String },
}

/// Final report of a delayed recompile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecompileReport {
    pub target: String,
    pub outcome: RecompileOutcome,
}

impl RecompileReport {
    pub fn succeeded(&self) -> bool {
        self.outcome == RecompileOutcome::Succeeded
    }
}

/// Handle to a scheduled recompile.
pub struct RecompileHandle {
    target: String,
    task: JoinHandle<RecompileReport>,
}

impl RecompileHandle {
    /// Run `job` on a new task after `delay`.
    pub fn schedule<F>(target: impl Into<String>, delay: Duration, job: F) -> Self
    where
        F: Future<Output = RecompileReport> + Send + 'static,
    {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            job.await
        });
        Self {
            target: target.into(),
            task,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the recompile to finish.
    pub async fn wait(self) -> RecompileReport {
        match self.task.await {
            Ok(report) => report,
            Err(e) => RecompileReport {
                target: self.target,
                outcome: RecompileOutcome::Errored {
                    error: e.to_string(),
                },
            },
        }
    }
}

impl std::fmt::Debug for RecompileHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecompileHandle")
            .field("target", &self.target)
            .field("finished", &self.task.is_finished())
            .finish()
    }
}
