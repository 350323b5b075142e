//! The stock hook set.

pub mod auto_compile;
pub mod completion_reminder;
pub mod mql4_notifier;
pub mod voice;

use mqlhooks_core::{HookRegistry, HooksConfig, Result};
use std::path::Path;
use std::sync::Arc;

use crate::runner::{CompilerBackend, ScriptCompiler};
use crate::speech::{SayCommand, Speaker};

pub use auto_compile::AutoCompileCheck;
pub use completion_reminder::TaskCompletionReminder;
pub use mql4_notifier::Mql4CompileNotifier;
pub use voice::{VoiceNotifier, VoiceReminder};

/// Register every stock hook, wired to the given collaborators.
///
/// Disabled hooks are still registered so they show up in listings; the
/// registry skips them on dispatch.
pub fn stock_registry(
    settings: &HooksConfig,
    compiler: Arc<dyn CompilerBackend>,
    speaker: Arc<dyn Speaker>,
) -> Result<HookRegistry> {
    stock_registry_with_voice(settings, compiler, speaker.clone(), speaker)
}

/// [`stock_registry`] with a separate speaker for the voice notifier.
pub fn stock_registry_with_voice(
    settings: &HooksConfig,
    compiler: Arc<dyn CompilerBackend>,
    speaker: Arc<dyn Speaker>,
    voice: Arc<dyn Speaker>,
) -> Result<HookRegistry> {
    HookRegistry::new()
        .with(Box::new(AutoCompileCheck::new(settings, compiler.clone())))?
        .with(Box::new(Mql4CompileNotifier::new(
            settings,
            compiler,
            speaker.clone(),
        )))?
        .with(Box::new(TaskCompletionReminder::new(settings)))?
        .with(Box::new(VoiceNotifier::new(settings, voice)))?
        .with(Box::new(VoiceReminder::new(settings, speaker)))
}

/// [`stock_registry`] with the real compiler script and speech command.
pub fn default_registry(settings: &HooksConfig) -> Result<HookRegistry> {
    let compiler = ScriptCompiler::from_config(&settings.compiler, &settings.workspace_dir);
    let speaker: Arc<dyn Speaker> = Arc::new(SayCommand::from_config(&settings.speech));
    let voice: Arc<dyn Speaker> = match &settings.speech.voice_script {
        Some(script) => Arc::new(SayCommand::script(
            settings.resolve(Path::new(script)).to_string_lossy(),
        )),
        None => speaker.clone(),
    };
    stock_registry_with_voice(settings, Arc::new(compiler), speaker, voice)
}
