//! Hook configuration.
//!
//! Defaults reproduce the stock hook set. Values can come from a JSON file
//! ([`HooksConfig::load`]) and from `MQLHOOKS_*` environment variables
//! ([`HooksConfig::apply_env`]); CLI flags are applied on top by the binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::error::{HookError, Result};

/// External compiler script settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CompilerConfig {
    /// Compiler executable, invoked with the target file as its only argument.
    pub program: String,

    /// Per-invocation timeout in seconds (0 = wait forever).
    pub timeout_secs: u64,

    /// Delay before the recompile that follows an auto-fix.
    pub recompile_delay_ms: u64,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: "./compile.sh".to_string(),
            timeout_secs: 0,
            recompile_delay_ms: 2000,
        }
    }
}

/// Text-to-speech settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SpeechConfig {
    pub program: String,
    /// Words per minute, passed as `-r <rate>`.
    pub rate: u32,
    pub started_phrase: String,
    pub completed_phrase: String,
    pub compile_ok_phrase: String,
    pub compile_failed_phrase: String,
    /// Workspace script the voice notifier runs as `<script> <utterance>`.
    /// `None` routes it through `program` like the other hooks.
    pub voice_script: Option<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            program: "say".to_string(),
            rate: 220,
            started_phrase: "Task started".to_string(),
            completed_phrase: "Task complete, standing by".to_string(),
            compile_ok_phrase: "Compile succeeded, ex4 file updated".to_string(),
            compile_failed_phrase: "Compile failed, please check the code".to_string(),
            voice_script: Some("./speech.sh".to_string()),
        }
    }
}

/// MQL4 notifier settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Mql4Config {
    /// Main file compiled when an `.mqh` include is saved.
    pub companion_main: String,
}

impl Default for Mql4Config {
    fn default() -> Self {
        Self {
            companion_main: "Grids 2.3/Grids 2.3.mq4".to_string(),
        }
    }
}

/// Completion checker settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CompletionConfig {
    /// `.mq5` files modified within this many minutes need testing.
    pub testing_window_mins: u64,

    /// Substrings in the compile log that mean errors remain.
    pub error_keywords: Vec<String>,

    /// File name suffixes that mark temp/backup files.
    pub temp_suffixes: Vec<String>,

    /// File name substrings that mark backup files.
    pub temp_infixes: Vec<String>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            testing_window_mins: 30,
            error_keywords: vec![
                "error".to_string(),
                "錯誤".to_string(),
                "failed".to_string(),
                "失敗".to_string(),
            ],
            temp_suffixes: vec![".tmp".to_string(), ".backup".to_string()],
            temp_infixes: vec![".backup.".to_string()],
        }
    }
}

/// Per-hook enable flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HookToggles {
    pub auto_compile_check: bool,
    pub mql4_compile_notifier: bool,
    pub task_completion_reminder: bool,
    pub voice_notifier: bool,
    pub voice_reminder: bool,
}

impl Default for HookToggles {
    fn default() -> Self {
        Self {
            auto_compile_check: true,
            mql4_compile_notifier: true,
            task_completion_reminder: true,
            voice_notifier: false,
            voice_reminder: true,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HooksConfig {
    /// Directory the compiler runs in and relative paths resolve against.
    pub workspace_dir: PathBuf,
    pub compile_log: PathBuf,
    pub hook_log: PathBuf,
    pub status_log: PathBuf,
    pub compiler: CompilerConfig,
    pub speech: SpeechConfig,
    pub mql4: Mql4Config,
    pub completion: CompletionConfig,
    pub hooks: HookToggles,
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            workspace_dir: PathBuf::from("."),
            compile_log: PathBuf::from("compile.log"),
            hook_log: PathBuf::from("auto-compile-hook.log"),
            status_log: PathBuf::from("agent-status.log"),
            compiler: CompilerConfig::default(),
            speech: SpeechConfig::default(),
            mql4: Mql4Config::default(),
            completion: CompletionConfig::default(),
            hooks: HookToggles::default(),
        }
    }
}

impl HooksConfig {
    /// Defaults with `MQLHOOKS_*` overrides applied.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load a JSON config file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| HookError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Apply `MQLHOOKS_*` environment overrides in place.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(dir) = var("MQLHOOKS_WORKSPACE") {
            self.workspace_dir = PathBuf::from(dir);
        }
        if let Some(program) = var("MQLHOOKS_COMPILER") {
            self.compiler.program = program;
        }
        if let Some(program) = var("MQLHOOKS_SPEECH") {
            self.speech.program = program;
        }
        if let Some(script) = var("MQLHOOKS_VOICE_SCRIPT") {
            self.speech.voice_script = (!script.is_empty()).then_some(script);
        }
        if let Some(main) = var("MQLHOOKS_COMPANION") {
            self.mql4.companion_main = main;
        }
        if let Some(ms) = var("MQLHOOKS_RECOMPILE_DELAY_MS") {
            self.compiler.recompile_delay_ms = parse_number("MQLHOOKS_RECOMPILE_DELAY_MS", &ms)?;
        }
        if let Some(mins) = var("MQLHOOKS_TESTING_WINDOW_MINS") {
            self.completion.testing_window_mins =
                parse_number("MQLHOOKS_TESTING_WINDOW_MINS", &mins)?;
        }
        Ok(())
    }

    /// Resolve a possibly relative path against the workspace.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_dir.join(path)
        }
    }

    pub fn compile_log_path(&self) -> PathBuf {
        self.resolve(&self.compile_log)
    }

    pub fn hook_log_path(&self) -> PathBuf {
        self.resolve(&self.hook_log)
    }

    pub fn status_log_path(&self) -> PathBuf {
        self.resolve(&self.status_log)
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| HookError::Config(format!("{key} must be a non-negative integer, got {value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_stock_hooks() {
        let config = HooksConfig::default();
        assert_eq!(config.compiler.program, "./compile.sh");
        assert_eq!(config.compiler.recompile_delay_ms, 2000);
        assert_eq!(config.speech.rate, 220);
        assert_eq!(config.speech.voice_script.as_deref(), Some("./speech.sh"));
        assert_eq!(config.completion.testing_window_mins, 30);
        assert!(config.hooks.auto_compile_check);
        assert!(!config.hooks.voice_notifier);
        assert_eq!(config.compile_log_path(), PathBuf::from("./compile.log"));
    }

    #[test]
    fn test_load_partial_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hooks.json");
        std::fs::write(
            &path,
            r#"{ "compiler": { "program": "./build.sh" }, "hooks": { "voice_notifier": true } }"#,
        )
        .unwrap();

        let config = HooksConfig::load(&path).unwrap();
        assert_eq!(config.compiler.program, "./build.sh");
        assert_eq!(config.compiler.recompile_delay_ms, 2000);
        assert!(config.hooks.voice_notifier);
        assert!(config.hooks.voice_reminder);
    }

    #[test]
    fn test_load_missing_file() {
        let err = HooksConfig::load(Path::new("/nonexistent/hooks.json")).unwrap_err();
        assert!(matches!(err, HookError::ReadFile { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("MQLHOOKS_WORKSPACE", "/work"),
            ("MQLHOOKS_COMPILER", "/opt/mql/compile"),
            ("MQLHOOKS_RECOMPILE_DELAY_MS", "50"),
            ("MQLHOOKS_TESTING_WINDOW_MINS", "5"),
            ("MQLHOOKS_VOICE_SCRIPT", ""),
        ]
        .into_iter()
        .collect();

        let mut config = HooksConfig::default();
        config
            .apply_vars(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.workspace_dir, PathBuf::from("/work"));
        assert_eq!(config.compiler.program, "/opt/mql/compile");
        assert_eq!(config.compiler.recompile_delay_ms, 50);
        assert_eq!(config.completion.testing_window_mins, 5);
        assert!(config.speech.voice_script.is_none());
        assert_eq!(config.hook_log_path(), PathBuf::from("/work/auto-compile-hook.log"));
    }

    #[test]
    fn test_env_rejects_bad_number() {
        let mut config = HooksConfig::default();
        let err = config
            .apply_vars(|k| (k == "MQLHOOKS_RECOMPILE_DELAY_MS").then(|| "soon".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("MQLHOOKS_RECOMPILE_DELAY_MS"));
    }
}
