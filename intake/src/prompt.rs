//! User prompt capability (confirm / alert).
//!
//! The host supplies blocking confirmation and notification dialogs; tests use
//! [`ScriptedPrompt`] to answer them deterministically.

use std::collections::VecDeque;
use std::sync::Mutex;

/// Confirmation gate and notification sink.
pub trait UserPrompt {
    /// Ask a yes/no question. `false` means the user declined.
    fn confirm(&self, message: &str) -> bool;

    /// Show a notification.
    fn alert(&self, message: &str);
}

/// Prompt with scripted answers for tests.
///
/// Answers are consumed in order; once the script runs out, the default
/// answer is used. Every message shown is recorded.
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<bool>>,
    default_answer: bool,
    confirmations: Mutex<Vec<String>>,
    alerts: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    /// Create a prompt that answers `default_answer` to every question.
    pub fn new(default_answer: bool) -> Self {
        Self {
            answers: Mutex::new(VecDeque::new()),
            default_answer,
            confirmations: Mutex::new(Vec::new()),
            alerts: Mutex::new(Vec::new()),
        }
    }

    /// Always says yes.
    pub fn accepting() -> Self {
        Self::new(true)
    }

    /// Always says no.
    pub fn declining() -> Self {
        Self::new(false)
    }

    /// Queue answers ahead of the default.
    pub fn with_answers(self, answers: impl IntoIterator<Item = bool>) -> Self {
        if let Ok(mut queue) = self.answers.lock() {
            queue.extend(answers);
        }
        self
    }

    /// Questions asked so far.
    pub fn confirmations(&self) -> Vec<String> {
        self.confirmations
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Notifications shown so far.
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

impl Default for ScriptedPrompt {
    fn default() -> Self {
        Self::accepting()
    }
}

impl UserPrompt for ScriptedPrompt {
    fn confirm(&self, message: &str) -> bool {
        if let Ok(mut asked) = self.confirmations.lock() {
            asked.push(message.to_string());
        }
        self.answers
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or(self.default_answer)
    }

    fn alert(&self, message: &str) {
        if let Ok(mut shown) = self.alerts.lock() {
            shown.push(message.to_string());
        }
    }
}

impl<P: UserPrompt + ?Sized> UserPrompt for std::sync::Arc<P> {
    fn confirm(&self, message: &str) -> bool {
        (**self).confirm(message)
    }

    fn alert(&self, message: &str) {
        (**self).alert(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_then_default() {
        let prompt = ScriptedPrompt::declining().with_answers([true, true]);

        assert!(prompt.confirm("first"));
        assert!(prompt.confirm("second"));
        assert!(!prompt.confirm("third"));
        assert_eq!(prompt.confirmations().len(), 3);
    }

    #[test]
    fn test_alerts_recorded() {
        let prompt = ScriptedPrompt::default();
        prompt.alert("saved");
        assert_eq!(prompt.alerts(), vec!["saved".to_string()]);
    }
}
