//! MQL Hooks Runtime
//!
//! Process-facing side of the hooks:
//! - runs the external compiler script and the speech utility
//! - maps saved files to compile targets
//! - implements the stock hooks on top of `mqlhooks-core`

pub mod fakes;
pub mod hooks;
pub mod runner;
pub mod speech;
pub mod target;

// Re-export key types
pub use hooks::{
    default_registry, stock_registry, stock_registry_with_voice, AutoCompileCheck,
    Mql4CompileNotifier, TaskCompletionReminder, VoiceNotifier, VoiceReminder,
};
pub use runner::{CompilerBackend, ScriptCompiler};
pub use speech::{SayCommand, Speaker};
pub use target::{CompileTarget, SourceKind};
