//! Auto compile check for `.mq5` files.
//!
//! Compiles on save. On failure the compile log is analyzed and every
//! invalid version declaration is rewritten, followed by a delayed
//! recompile whose handle is returned in the report.

use async_trait::async_trait;
use mqlhooks_core::hook::{CompileReport, FixAttempt};
use mqlhooks_core::recompile::{RecompileHandle, RecompileOutcome, RecompileReport};
use mqlhooks_core::{
    analyze_compile_log, apply_version_fix, obs, EventContext, FixOutcome, Hook, HookConfig,
    HookLog, HookOutcome, HookTrigger, HooksConfig, Result, VersionFix,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::runner::CompilerBackend;
use crate::target::{CompileTarget, SourceKind};

pub const NAME: &str = "Auto Compile Check";

pub struct AutoCompileCheck {
    config: HookConfig,
    compiler: Arc<dyn CompilerBackend>,
    log: HookLog,
    compile_log: PathBuf,
    workspace_dir: PathBuf,
    recompile_delay: Duration,
}

impl AutoCompileCheck {
    pub fn new(settings: &HooksConfig, compiler: Arc<dyn CompilerBackend>) -> Self {
        let config = HookConfig::new(
            NAME,
            "Compile .mq5 files on save and auto-fix invalid version declarations",
            &[HookTrigger::FileSaved],
        )
        .with_patterns(&["*.mq5"])
        .enabled(settings.hooks.auto_compile_check);

        Self {
            config,
            compiler,
            log: HookLog::hook(settings.hook_log_path()),
            compile_log: settings.compile_log_path(),
            workspace_dir: settings.workspace_dir.clone(),
            recompile_delay: Duration::from_millis(settings.compiler.recompile_delay_ms),
        }
    }

    async fn check(&self, target: &CompileTarget) -> Result<CompileReport> {
        let file = target.target.as_str();
        info!(file, "compiling");

        let result = self.compiler.compile(file).await?;
        obs::emit_compile_finished(file, result.success, result.exit_code, result.duration_ms);

        let mut report = CompileReport::new(file, result);
        if report.result.success {
            self.log.append(&format!("SUCCESS: {file} compiled")).await;
            return Ok(report);
        }

        self.log.append(&format!("ERROR: {file} compile failed")).await;
        self.analyze(&mut report).await;
        Ok(report)
    }

    async fn analyze(&self, report: &mut CompileReport) {
        let file = report.target.clone();
        // The compiler may emit non-UTF-8 file names; decode lossily.
        let text = match tokio::fs::read(&self.compile_log).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!(file = %file, error = %e, "cannot read compile log");
                self.log
                    .append(&format!("ERROR: cannot analyze compile errors - {e}"))
                    .await;
                return;
            }
        };

        let analysis = analyze_compile_log(&text);
        for (error, suggestion) in analysis.errors.iter().zip(&analysis.suggestions) {
            warn!(file = %file, line = %error.raw_line, suggestion = %suggestion, "{}", error.message);
        }

        for old in analysis.version_fixes() {
            let fix = VersionFix::for_invalid(old);
            let attempt = self.fix_version(&file, fix).await;
            if matches!(attempt.outcome, Ok(FixOutcome::Applied { .. })) {
                report.recompiles.push(self.schedule_recompile(&file));
            }
            report.fixes.push(attempt);
        }

        self.log
            .append(&format!("ERROR ANALYSIS for {file}:"))
            .await;
        self.log
            .append(&format!("Errors found: {}", analysis.errors.len()))
            .await;
        self.log
            .append(&format!("Auto-fixable: {}", analysis.auto_fixable))
            .await;

        report.analysis = Some(analysis);
    }

    async fn fix_version(&self, file: &str, fix: VersionFix) -> FixAttempt {
        info!(file, old = %fix.old, new = %fix.new, "invalid version format");

        // Rewriting to the same value would recompile into the same error.
        if fix.is_noop() {
            let message = format!("version {} cannot be normalized", fix.old);
            self.log
                .append(&format!("WARNING: {message} in {file}"))
                .await;
            return FixAttempt {
                fix,
                outcome: Err(message),
            };
        }

        let path = self.workspace_dir.join(file);
        let outcome = match apply_version_fix(&path, &fix).await {
            Ok(FixOutcome::Applied { line }) => {
                obs::emit_autofix_applied(file, &fix.old, &fix.new);
                self.log
                    .append(&format!(
                        "AUTO-FIX: version fixed {} → {} in {file}",
                        fix.old, fix.new
                    ))
                    .await;
                Ok(FixOutcome::Applied { line })
            }
            Ok(FixOutcome::DeclarationNotFound) => {
                self.log
                    .append(&format!("WARNING: version declaration not found in {file}"))
                    .await;
                Ok(FixOutcome::DeclarationNotFound)
            }
            Err(e) => {
                self.log
                    .append(&format!("ERROR: applying version fix failed - {e}"))
                    .await;
                Err(e.to_string())
            }
        };
        FixAttempt { fix, outcome }
    }

    fn schedule_recompile(&self, file: &str) -> RecompileHandle {
        let compiler = self.compiler.clone();
        let log = self.log.clone();
        let target = file.to_string();

        let job = {
            let target = target.clone();
            async move {
                let outcome = match compiler.compile(&target).await {
                    Ok(result) if result.success => {
                        log.append(&format!("SUCCESS: recompiled after fix - {target}"))
                            .await;
                        RecompileOutcome::Succeeded
                    }
                    Ok(result) => {
                        log.append(&format!(
                            "WARNING: recompile after fix still failing - {target}"
                        ))
                        .await;
                        RecompileOutcome::StillFailing {
                            exit_code: result.exit_code,
                        }
                    }
                    Err(e) => {
                        log.append(&format!("ERROR: recompile after fix failed - {e}"))
                            .await;
                        RecompileOutcome::Errored {
                            error: e.to_string(),
                        }
                    }
                };
                let report = RecompileReport { target, outcome };
                obs::emit_recompile_finished(&report.target, report.succeeded());
                report
            }
        };

        RecompileHandle::schedule(target, self.recompile_delay, job)
    }
}

#[async_trait]
impl Hook for AutoCompileCheck {
    fn config(&self) -> &HookConfig {
        &self.config
    }

    async fn execute(&self, ctx: &EventContext) -> HookOutcome {
        let Some(target) = ctx
            .match_name()
            .and_then(|name| CompileTarget::resolve(name, &[SourceKind::Mq5], ""))
        else {
            return HookOutcome::skipped("not an .mq5 file");
        };

        match self.check(&target).await {
            Ok(report) => HookOutcome::Compiled(report),
            Err(e) => {
                obs::emit_hook_fatal(NAME, &e);
                self.log
                    .append(&format!("FATAL ERROR: compile check failed - {e}"))
                    .await;
                HookOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}
