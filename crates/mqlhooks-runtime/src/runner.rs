//! Compiler invocation.

use async_trait::async_trait;
use mqlhooks_core::config::CompilerConfig;
use mqlhooks_core::{CompileResult, HookError, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Something that can compile one MQL source file.
#[async_trait]
pub trait CompilerBackend: Send + Sync {
    /// Compile `target`. A non-zero exit is `Ok` with `success == false`;
    /// `Err` means the compiler could not be run at all.
    async fn compile(&self, target: &str) -> Result<CompileResult>;
}

/// Runs the external compiler script: `<program> <target>`.
#[derive(Debug, Clone)]
pub struct ScriptCompiler {
    program: String,
    working_dir: PathBuf,
    timeout_secs: u64,
}

impl ScriptCompiler {
    pub fn new(program: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            working_dir: working_dir.into(),
            timeout_secs: 0,
        }
    }

    pub fn from_config(config: &CompilerConfig, working_dir: &Path) -> Self {
        Self::new(config.program.clone(), working_dir).with_timeout(config.timeout_secs)
    }

    /// Kill the compiler after `secs` seconds (0 = never).
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl CompilerBackend for ScriptCompiler {
    async fn compile(&self, target: &str) -> Result<CompileResult> {
        let start = Instant::now();

        let child = Command::new(&self.program)
            .arg(target)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| HookError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let output = if self.timeout_secs > 0 {
            tokio::time::timeout(
                Duration::from_secs(self.timeout_secs),
                child.wait_with_output(),
            )
            .await
            .map_err(|_| HookError::Timeout {
                program: self.program.clone(),
                secs: self.timeout_secs,
            })??
        } else {
            child.wait_with_output().await?
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        let exit_code = output.status.code().unwrap_or(-1);
        let success = output.status.success();

        Ok(CompileResult {
            success,
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            error_message: (!success)
                .then(|| format!("{} {} exited with code {}", self.program, target, exit_code)),
            duration_ms,
        })
    }
}
