//! Compiler invocation records.

use serde::{Deserialize, Serialize};

/// Result of one compiler invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompileResult {
    /// Whether the compiler exited with status 0.
    pub success: bool,

    /// Exit code (-1 when killed by a signal).
    pub exit_code: i32,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,

    /// Failure description when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Duration in milliseconds.
    pub duration_ms: u64,
}

impl CompileResult {
    /// A passing result with the given stdout.
    pub fn passed(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
            error_message: None,
            duration_ms: 0,
        }
    }

    /// A failing result with the given exit code and stdout.
    pub fn failed(exit_code: i32, stdout: impl Into<String>) -> Self {
        Self {
            success: false,
            exit_code,
            stdout: stdout.into(),
            stderr: String::new(),
            error_message: Some(format!("compiler exited with code {exit_code}")),
            duration_ms: 0,
        }
    }

    /// Lines of stdout that mention `error`, case-insensitively.
    pub fn error_lines(&self) -> Vec<&str> {
        self.stdout
            .lines()
            .filter(|line| line.to_lowercase().contains("error"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_lines_case_insensitive() {
        let result = CompileResult::failed(
            1,
            "compiling Grids.mq4\nGrids.mq4(12,3) : ERROR 256: undeclared\n0 warnings\nResult: 1 errors",
        );
        let lines = result.error_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("ERROR 256"));
    }

    #[test]
    fn test_passed_has_no_error_message() {
        let result = CompileResult::passed("ok");
        assert!(result.success);
        assert!(result.error_message.is_none());
        assert!(result.error_lines().is_empty());
    }
}
