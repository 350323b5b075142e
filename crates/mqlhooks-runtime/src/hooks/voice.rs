//! Spoken task start/completion notifications.

use async_trait::async_trait;
use mqlhooks_core::{EventContext, Hook, HookConfig, HookOutcome, HookTrigger, HooksConfig};
use std::sync::Arc;

use crate::speech::Speaker;

pub const NOTIFIER_NAME: &str = "Voice Notifier";
pub const REMINDER_NAME: &str = "Voice Completion Reminder";

/// Speaks on both task start and task completion. Off by default.
pub struct VoiceNotifier {
    config: HookConfig,
    speaker: Arc<dyn Speaker>,
    started: String,
    completed: String,
}

impl VoiceNotifier {
    pub fn new(settings: &HooksConfig, speaker: Arc<dyn Speaker>) -> Self {
        let config = HookConfig::new(
            NOTIFIER_NAME,
            "Announce task start and completion",
            &[HookTrigger::TaskStarted, HookTrigger::TaskCompleted],
        )
        .enabled(settings.hooks.voice_notifier);

        Self {
            config,
            speaker,
            started: settings.speech.started_phrase.clone(),
            completed: settings.speech.completed_phrase.clone(),
        }
    }
}

#[async_trait]
impl Hook for VoiceNotifier {
    fn config(&self) -> &HookConfig {
        &self.config
    }

    async fn execute(&self, ctx: &EventContext) -> HookOutcome {
        let utterance = match ctx.event {
            HookTrigger::TaskStarted => &self.started,
            _ => &self.completed,
        };
        self.speaker.speak(utterance).await;
        HookOutcome::Spoke {
            utterance: utterance.clone(),
        }
    }
}

/// Speaks the completion phrase when a task reports completion.
pub struct VoiceReminder {
    config: HookConfig,
    speaker: Arc<dyn Speaker>,
    completed: String,
}

impl VoiceReminder {
    pub fn new(settings: &HooksConfig, speaker: Arc<dyn Speaker>) -> Self {
        let config = HookConfig::new(
            REMINDER_NAME,
            "Announce task completion",
            &[HookTrigger::TaskCompleted],
        )
        .enabled(settings.hooks.voice_reminder);

        Self {
            config,
            speaker,
            completed: settings.speech.completed_phrase.clone(),
        }
    }
}

#[async_trait]
impl Hook for VoiceReminder {
    fn config(&self) -> &HookConfig {
        &self.config
    }

    async fn execute(&self, ctx: &EventContext) -> HookOutcome {
        if ctx.status.as_deref() != Some("completed") && ctx.task_type.is_none() {
            return HookOutcome::skipped("task not completed");
        }
        self.speaker.speak(&self.completed).await;
        HookOutcome::Spoke {
            utterance: self.completed.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::RecordingSpeaker;

    fn enabled_settings() -> HooksConfig {
        let mut settings = HooksConfig::default();
        settings.hooks.voice_notifier = true;
        settings
    }

    #[tokio::test]
    async fn test_notifier_picks_phrase_by_event() {
        let speaker = Arc::new(RecordingSpeaker::new());
        let hook = VoiceNotifier::new(&enabled_settings(), speaker.clone());
        assert!(hook.config().enabled);

        hook.execute(&EventContext::task_started("build")).await;
        hook.execute(&EventContext::task_completed("build", vec![], vec![]))
            .await;

        assert_eq!(
            speaker.utterances(),
            vec!["Task started", "Task complete, standing by"]
        );
    }

    #[test]
    fn test_notifier_disabled_by_default() {
        let hook = VoiceNotifier::new(&HooksConfig::default(), Arc::new(RecordingSpeaker::new()));
        assert!(!hook.config().enabled);
    }

    #[tokio::test]
    async fn test_reminder_requires_completed_status_or_task_type() {
        let speaker = Arc::new(RecordingSpeaker::new());
        let hook = VoiceReminder::new(&HooksConfig::default(), speaker.clone());

        let bare = EventContext {
            task_type: None,
            status: Some("aborted".to_string()),
            ..EventContext::task_completed("x", vec![], vec![])
        };
        assert!(matches!(hook.execute(&bare).await, HookOutcome::Skipped { .. }));

        let status_only = EventContext {
            task_type: None,
            ..EventContext::task_completed("x", vec![], vec![])
        };
        assert!(matches!(
            hook.execute(&status_only).await,
            HookOutcome::Spoke { .. }
        ));

        let typed = EventContext {
            status: None,
            ..EventContext::task_completed("testing", vec![], vec![])
        };
        hook.execute(&typed).await;

        assert_eq!(speaker.utterances().len(), 2);
    }
}
