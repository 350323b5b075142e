//! In-memory fakes for the subprocess collaborators (testing only)
//!
//! Provides `FakeCompiler` and `RecordingSpeaker`, which satisfy the
//! `CompilerBackend` and `Speaker` contracts without spawning processes.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use mqlhooks_core::{CompileResult, HookError, Result};

use crate::runner::CompilerBackend;
use crate::speech::Speaker;

// ---------------------------------------------------------------------------
// FakeCompiler
// ---------------------------------------------------------------------------

enum Scripted {
    Result {
        result: CompileResult,
        log: Option<String>,
    },
    SpawnError,
}

/// Compiler returning scripted results in order, then passing forever.
///
/// When a compile log path is set, scripted log text is written there the
/// way the real compiler script writes `compile.log`.
#[derive(Default)]
pub struct FakeCompiler {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<String>>,
    compile_log: Option<PathBuf>,
}

impl FakeCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write scripted log text to `path`.
    pub fn with_compile_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.compile_log = Some(path.into());
        self
    }

    /// Queue a successful compile.
    pub fn then_pass(self) -> Self {
        self.push(Scripted::Result {
            result: CompileResult::passed("0 errors, 0 warnings"),
            log: None,
        })
    }

    /// Queue a failed compile that leaves `log` in the compile log.
    pub fn then_fail(self, log: &str) -> Self {
        self.push(Scripted::Result {
            result: CompileResult::failed(1, log),
            log: Some(log.to_string()),
        })
    }

    /// Queue a compiler that cannot be started.
    pub fn then_spawn_error(self) -> Self {
        self.push(Scripted::SpawnError)
    }

    fn push(self, entry: Scripted) -> Self {
        self.script.lock().unwrap().push_back(entry);
        self
    }

    /// Targets compiled so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompilerBackend for FakeCompiler {
    async fn compile(&self, target: &str) -> Result<CompileResult> {
        self.calls.lock().unwrap().push(target.to_string());
        let next = self.script.lock().unwrap().pop_front();

        match next {
            None => Ok(CompileResult::passed("0 errors, 0 warnings")),
            Some(Scripted::SpawnError) => Err(HookError::Spawn {
                program: "fake-compiler".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not installed"),
            }),
            Some(Scripted::Result { result, log }) => {
                if let (Some(path), Some(log)) = (&self.compile_log, log) {
                    tokio::fs::write(path, log).await?;
                }
                Ok(result)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingSpeaker
// ---------------------------------------------------------------------------

/// Speaker that records utterances instead of speaking them.
#[derive(Debug, Default)]
pub struct RecordingSpeaker {
    utterances: Mutex<Vec<String>>,
}

impl RecordingSpeaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn utterances(&self) -> Vec<String> {
        self.utterances.lock().unwrap().clone()
    }
}

#[async_trait]
impl Speaker for RecordingSpeaker {
    async fn speak(&self, utterance: &str) {
        self.utterances.lock().unwrap().push(utterance.to_string());
    }
}
