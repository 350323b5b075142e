//! MQL Hooks Core Library
//!
//! Domain logic for the editor/agent hooks of an MQL4/MQL5 workflow:
//! - compile log analysis against a fixed rule table
//! - the MQL5 Market version-format auto-fix
//! - the task-completion checker
//! - the hook contract, host-side registry and append-only hook logs
//!
//! Subprocess collaborators (compiler script, speech utility) live in
//! `mqlhooks-runtime`.

pub mod analyzer;
pub mod completion;
pub mod config;
pub mod domain;
pub mod hook;
pub mod hook_log;
pub mod obs;
pub mod recompile;
pub mod telemetry;
pub mod version_fix;

pub use analyzer::{analyze_compile_log, rules, ErrorRule};
pub use completion::TaskCompletionChecker;
pub use config::{
    CompilerConfig, CompletionConfig, HookToggles, HooksConfig, Mql4Config, SpeechConfig,
};
pub use domain::{
    CompileResult, CompletionDetails, CompletionReport, ErrorAnalysis, ErrorKind, EventContext,
    FixDescriptor, FixKind, HookError, HookTrigger, MatchedError, PendingTask, PendingTaskKind,
    Result,
};
pub use hook::{CompileReport, FixAttempt, Hook, HookConfig, HookOutcome, HookRegistry};
pub use hook_log::HookLog;
pub use recompile::{RecompileHandle, RecompileOutcome, RecompileReport};
pub use telemetry::init_tracing;
pub use version_fix::{apply_version_fix, normalize_version, FixOutcome, VersionFix};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
