//! Spoken notifications.

use async_trait::async_trait;
use mqlhooks_core::config::SpeechConfig;
use std::process::Stdio;
use tokio::process::Command;

/// Text-to-speech sink. Speaking never fails from the caller's view.
#[async_trait]
pub trait Speaker: Send + Sync {
    async fn speak(&self, utterance: &str);
}

/// Runs `<program> [-r <rate>] <utterance>` without waiting for it.
#[derive(Debug, Clone)]
pub struct SayCommand {
    program: String,
    rate: Option<u32>,
}

impl SayCommand {
    pub fn new(program: impl Into<String>, rate: u32) -> Self {
        Self {
            program: program.into(),
            rate: Some(rate),
        }
    }

    /// A speech script that takes only the utterance.
    pub fn script(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            rate: None,
        }
    }

    pub fn from_config(config: &SpeechConfig) -> Self {
        Self::new(config.program.clone(), config.rate)
    }

    fn command(&self, utterance: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        if let Some(rate) = self.rate {
            cmd.arg("-r").arg(rate.to_string());
        }
        cmd.arg(utterance)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

#[async_trait]
impl Speaker for SayCommand {
    async fn speak(&self, utterance: &str) {
        // The child is detached; tokio reaps it in the background.
        match self.command(utterance).spawn() {
            Ok(_child) => tracing::debug!(program = %self.program, utterance, "speaking"),
            Err(e) => tracing::debug!(program = %self.program, error = %e, "speech unavailable"),
        }
    }
}
