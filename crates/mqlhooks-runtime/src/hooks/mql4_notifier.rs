//! Spoken compile result for MQL4 sources and includes.

use async_trait::async_trait;
use mqlhooks_core::config::SpeechConfig;
use mqlhooks_core::hook::CompileReport;
use mqlhooks_core::{obs, EventContext, Hook, HookConfig, HookLog, HookOutcome, HookTrigger, HooksConfig};
use std::sync::Arc;
use tracing::{info, warn};

use crate::runner::CompilerBackend;
use crate::speech::Speaker;
use crate::target::{CompileTarget, SourceKind};

pub const NAME: &str = "MQL4 Compile Notifier";

const ACCEPTS: &[SourceKind] = &[SourceKind::Mq4, SourceKind::Mqh];

pub struct Mql4CompileNotifier {
    config: HookConfig,
    compiler: Arc<dyn CompilerBackend>,
    speaker: Arc<dyn Speaker>,
    log: HookLog,
    companion_main: String,
    phrases: SpeechConfig,
}

impl Mql4CompileNotifier {
    pub fn new(
        settings: &HooksConfig,
        compiler: Arc<dyn CompilerBackend>,
        speaker: Arc<dyn Speaker>,
    ) -> Self {
        let config = HookConfig::new(
            NAME,
            "Compile .mq4/.mqh files on save and announce the result",
            &[HookTrigger::FileSaved],
        )
        .with_patterns(&["*.mq4", "*.mqh"])
        .enabled(settings.hooks.mql4_compile_notifier);

        Self {
            config,
            compiler,
            speaker,
            log: HookLog::hook(settings.hook_log_path()),
            companion_main: settings.mql4.companion_main.clone(),
            phrases: settings.speech.clone(),
        }
    }
}

#[async_trait]
impl Hook for Mql4CompileNotifier {
    fn config(&self) -> &HookConfig {
        &self.config
    }

    async fn execute(&self, ctx: &EventContext) -> HookOutcome {
        let Some(target) = ctx
            .match_name()
            .and_then(|name| CompileTarget::resolve(name, ACCEPTS, &self.companion_main))
        else {
            return HookOutcome::skipped("not an .mq4 or .mqh file");
        };
        if target.is_redirected() {
            info!(saved = %target.saved, compile = %target.target, "include saved, compiling main file");
        }

        let result = match self.compiler.compile(&target.target).await {
            Ok(result) => result,
            Err(e) => {
                obs::emit_hook_fatal(NAME, &e);
                self.log
                    .append(&format!("FATAL ERROR: MQL4 compile failed - {e}"))
                    .await;
                return HookOutcome::Failed {
                    error: e.to_string(),
                };
            }
        };
        obs::emit_compile_finished(
            &target.target,
            result.success,
            result.exit_code,
            result.duration_ms,
        );

        let mut report = CompileReport::new(target.target.clone(), result);
        if report.result.success {
            self.speaker.speak(&self.phrases.compile_ok_phrase).await;
            self.log
                .append(&format!("SUCCESS: {} compiled", report.target))
                .await;
        } else {
            self.speaker.speak(&self.phrases.compile_failed_phrase).await;
            report.error_summary = report
                .result
                .error_lines()
                .into_iter()
                .map(str::to_string)
                .collect();

            self.log
                .append(&format!("ERROR: {} compile failed", report.target))
                .await;
            for line in &report.error_summary {
                warn!(file = %report.target, "{line}");
                self.log.append(&format!("ERROR SUMMARY: {line}")).await;
            }
        }

        HookOutcome::Compiled(report)
    }
}
