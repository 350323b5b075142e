//! Structured observability for hook invocations.
//!
//! This module provides:
//! - an invocation-scoped span tagged with the hook name and a fresh id
//! - emission functions for key lifecycle events: dispatch, compile, auto-fix,
//!   recompile, standby
//!
//! Events are emitted at `info!` level (filter with `RUST_LOG`).

use tracing::info;
use uuid::Uuid;

/// Span covering one hook invocation.
///
/// Attach it to the hook future with `tracing::Instrument::instrument`.
pub fn invocation_span(hook: &str) -> tracing::Span {
    let invocation_id = Uuid::new_v4();
    tracing::info_span!("mqlhooks.hook", hook = %hook, invocation_id = %invocation_id)
}

/// Emit event: hook selected for an event.
pub fn emit_hook_dispatched(hook: &str, event: &str) {
    info!(event = "hook.dispatched", hook = %hook, trigger = %event);
}

/// Emit event: hook returned with the given outcome label.
pub fn emit_hook_finished(hook: &str, outcome: &str, duration_ms: u64) {
    info!(
        event = "hook.finished",
        hook = %hook,
        outcome = %outcome,
        duration_ms = duration_ms,
    );
}

/// Emit event: compiler finished.
pub fn emit_compile_finished(target: &str, success: bool, exit_code: i32, duration_ms: u64) {
    info!(
        event = "compile.finished",
        file = %target,
        success = success,
        exit_code = exit_code,
        duration_ms = duration_ms,
    );
}

/// Emit event: version auto-fix written to disk.
pub fn emit_autofix_applied(file: &str, old: &str, new: &str) {
    info!(event = "autofix.applied", file = %file, old = %old, new = %new);
}

/// Emit event: delayed recompile finished.
pub fn emit_recompile_finished(target: &str, success: bool) {
    info!(event = "recompile.finished", file = %target, success = success);
}

/// Emit event: agent entered standby.
pub fn emit_agent_standby(task_type: &str) {
    info!(event = "agent.standby", task_type = %task_type);
}

/// Emit event: a hook swallowed a fatal error (error level).
pub fn emit_hook_fatal(hook: &str, error: &dyn std::fmt::Display) {
    tracing::error!(event = "hook.fatal", hook = %hook, error = %error);
}
