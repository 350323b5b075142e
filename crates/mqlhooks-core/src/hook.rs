//! Hook contract and host-side dispatch.
//!
//! Every hook exports a [`HookConfig`] record and an async
//! [`Hook::execute`]. The [`HookRegistry`] plays the host: it filters on the
//! `enabled` flag, the trigger and the file pattern before invoking a hook.
//! Hooks never return errors; failures surface as [`HookOutcome::Failed`].

use async_trait::async_trait;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::Instrument;

use crate::domain::analysis::ErrorAnalysis;
use crate::domain::compile::CompileResult;
use crate::domain::context::{EventContext, HookTrigger};
use crate::domain::error::{HookError, Result};
use crate::domain::task::CompletionReport;
use crate::obs;
use crate::recompile::RecompileHandle;
use crate::version_fix::{FixOutcome, VersionFix};

/// Configuration record exported by each hook.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HookConfig {
    pub name: String,
    pub description: String,
    pub triggers: Vec<HookTrigger>,

    /// Glob patterns matched against the file name. Empty matches all.
    #[serde(default)]
    pub file_patterns: Vec<String>,

    pub enabled: bool,
}

impl HookConfig {
    pub fn new(name: &str, description: &str, triggers: &[HookTrigger]) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            triggers: triggers.to_vec(),
            file_patterns: Vec::new(),
            enabled: true,
        }
    }

    pub fn with_patterns(mut self, patterns: &[&str]) -> Self {
        self.file_patterns = patterns.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// One version fix attempt made by a compile hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixAttempt {
    pub fix: VersionFix,
    pub outcome: std::result::Result<FixOutcome, String>,
}

/// What a compile hook did.
#[derive(Debug)]
pub struct CompileReport {
    /// File handed to the compiler.
    pub target: String,
    pub result: CompileResult,

    /// Present when the compile log was analyzed.
    pub analysis: Option<ErrorAnalysis>,

    /// Compiler stdout lines mentioning errors.
    pub error_summary: Vec<String>,
    pub fixes: Vec<FixAttempt>,

    /// Recompiles scheduled after successful fixes.
    pub recompiles: Vec<RecompileHandle>,
}

impl CompileReport {
    pub fn new(target: impl Into<String>, result: CompileResult) -> Self {
        Self {
            target: target.into(),
            result,
            analysis: None,
            error_summary: Vec::new(),
            fixes: Vec::new(),
            recompiles: Vec::new(),
        }
    }
}

/// Result of one hook invocation.
#[derive(Debug)]
pub enum HookOutcome {
    /// The hook filtered itself out.
    Skipped { reason: String },
    Compiled(CompileReport),
    Completion(CompletionReport),
    Spoke { utterance: String },
    /// An unexpected error was caught at the top of `execute`.
    Failed { error: String },
}

impl HookOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        HookOutcome::Skipped {
            reason: reason.into(),
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            HookOutcome::Skipped { .. } => "skipped",
            HookOutcome::Compiled(report) if report.result.success => "compiled",
            HookOutcome::Compiled(_) => "compile_failed",
            HookOutcome::Completion(report) if report.is_standby() => "standby",
            HookOutcome::Completion(_) => "tasks_remaining",
            HookOutcome::Spoke { .. } => "spoke",
            HookOutcome::Failed { .. } => "failed",
        }
    }
}

/// An event handler invoked by the host.
#[async_trait]
pub trait Hook: Send + Sync {
    fn config(&self) -> &HookConfig;

    async fn execute(&self, ctx: &EventContext) -> HookOutcome;
}

struct Registered {
    hook: Box<dyn Hook>,
    patterns: Option<GlobSet>,
}

impl Registered {
    fn accepts(&self, ctx: &EventContext) -> bool {
        let config = self.hook.config();
        if !config.enabled || !config.triggers.contains(&ctx.event) {
            return false;
        }
        match (&self.patterns, ctx.match_name()) {
            (None, _) => true,
            (Some(set), Some(name)) => set.is_match(name),
            (Some(_), None) => false,
        }
    }
}

/// Host-side hook table.
#[derive(Default)]
pub struct HookRegistry {
    hooks: Vec<Registered>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook, compiling its file patterns.
    pub fn register(&mut self, hook: Box<dyn Hook>) -> Result<()> {
        let patterns = compile_patterns(&hook.config().file_patterns)?;
        self.hooks.push(Registered { hook, patterns });
        Ok(())
    }

    /// Builder-style [`HookRegistry::register`].
    pub fn with(mut self, hook: Box<dyn Hook>) -> Result<Self> {
        self.register(hook)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Configuration records of all registered hooks, in order.
    pub fn configs(&self) -> Vec<&HookConfig> {
        self.hooks.iter().map(|r| r.hook.config()).collect()
    }

    /// Names of the hooks that would run for `ctx`.
    pub fn matching(&self, ctx: &EventContext) -> Vec<&str> {
        self.hooks
            .iter()
            .filter(|r| r.accepts(ctx))
            .map(|r| r.hook.config().name.as_str())
            .collect()
    }

    /// Run every matching hook in registration order.
    pub async fn dispatch(&self, ctx: &EventContext) -> Result<Vec<(String, HookOutcome)>> {
        ctx.validate()?;

        let mut outcomes = Vec::new();
        for registered in self.hooks.iter().filter(|r| r.accepts(ctx)) {
            let name = registered.hook.config().name.clone();
            let start = Instant::now();
            obs::emit_hook_dispatched(&name, ctx.event.as_str());

            let outcome = registered
                .hook
                .execute(ctx)
                .instrument(obs::invocation_span(&name))
                .await;

            obs::emit_hook_finished(&name, outcome.label(), start.elapsed().as_millis() as u64);
            outcomes.push((name, outcome));
        }
        Ok(outcomes)
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| HookError::Pattern(format!("{pattern}: {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map(Some)
        .map_err(|e| HookError::Pattern(e.to_string()))
}
