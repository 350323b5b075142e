//! Append-only flat logs written by hooks.
//!
//! One UTF-8 line per entry: `[<RFC 3339 UTC timestamp>] <TAG>: <message>`.
//! Writes are not guarded against concurrent writers. A failed write is
//! reported through tracing and otherwise ignored.

use chrono::{SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Tag used by the compile hooks.
pub const HOOK_TAG: &str = "HOOK";

/// Tag used by the completion reminder.
pub const AGENT_STATUS_TAG: &str = "AGENT STATUS";

/// An append-only log file.
#[derive(Debug, Clone)]
pub struct HookLog {
    path: PathBuf,
    tag: &'static str,
}

impl HookLog {
    pub fn new(path: impl Into<PathBuf>, tag: &'static str) -> Self {
        Self {
            path: path.into(),
            tag,
        }
    }

    /// `auto-compile-hook.log` style log.
    pub fn hook(path: impl Into<PathBuf>) -> Self {
        Self::new(path, HOOK_TAG)
    }

    /// `agent-status.log` style log.
    pub fn agent_status(path: impl Into<PathBuf>) -> Self {
        Self::new(path, AGENT_STATUS_TAG)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format one entry without writing it.
    pub fn format_entry(&self, message: &str) -> String {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        format!("[{timestamp}] {}: {message}\n", self.tag)
    }

    /// Append one entry, reporting any I/O error to the caller.
    pub async fn try_append(&self, message: &str) -> std::io::Result<()> {
        let entry = self.format_entry(message);
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(entry.as_bytes()).await?;
        file.flush().await
    }

    /// Append one entry; failures are logged and swallowed.
    pub async fn append(&self, message: &str) {
        if let Err(e) = self.try_append(message).await {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "failed to write hook log entry"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_writes_tagged_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = HookLog::hook(dir.path().join("auto-compile-hook.log"));

        log.append("SUCCESS: Grid.mq5 compiled").await;
        log.append("ERROR: Other.mq5 compile failed").await;

        let content = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("] HOOK: SUCCESS: Grid.mq5 compiled"));
        assert!(lines[1].contains("HOOK: ERROR: Other.mq5"));
    }

    #[tokio::test]
    async fn test_agent_status_tag() {
        let dir = tempfile::tempdir().unwrap();
        let log = HookLog::agent_status(dir.path().join("agent-status.log"));
        log.append("standby").await;
        let content = std::fs::read_to_string(log.path()).unwrap();
        assert!(content.contains("] AGENT STATUS: standby\n"));
    }

    #[tokio::test]
    async fn test_append_to_missing_dir_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let log = HookLog::hook(dir.path().join("missing").join("hook.log"));
        log.append("lost").await;
        assert!(log.try_append("lost").await.is_err());
    }

    #[test]
    fn test_entry_timestamp_is_rfc3339() {
        let log = HookLog::hook("unused.log");
        let entry = log.format_entry("x");
        let ts = &entry[1..entry.find(']').unwrap()];
        assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
        assert!(ts.ends_with('Z'));
    }
}
