//! Domain models for MQL hooks.
//!
//! All records are ephemeral and live for a single hook invocation:
//! - `EventContext`: what the host sends to a hook
//! - `CompileResult`: one compiler invocation
//! - `ErrorAnalysis`: what the log analyzer found
//! - `PendingTask` / `CompletionReport`: the completion checker's verdict

pub mod analysis;
pub mod compile;
pub mod context;
pub mod error;
pub mod task;

pub use analysis::{ErrorAnalysis, ErrorKind, FixDescriptor, FixKind, MatchedError};
pub use compile::CompileResult;
pub use context::{CompletionDetails, EventContext, HookTrigger};
pub use error::{HookError, Result};
pub use task::{CompletionReport, PendingTask, PendingTaskKind};
