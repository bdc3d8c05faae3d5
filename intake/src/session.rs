//! IntakeSession - event router for the application form.
//!
//! Routes host events (input, change, add/remove co-founder, timer ticks,
//! submit) through the word monitor, the group manager and the persistence
//! controller.

use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::cofounder::{CofounderManager, RemoveOutcome};
use crate::config::IntakeConfig;
use crate::error::IntakeError;
use crate::form::{Control, ControlKind, FormState};
use crate::persistence::{PersistTrigger, PersistenceController};
use crate::prompt::UserPrompt;
use crate::snapshot::{self, FormSnapshot, RestoreSummary};
use crate::store::KeyValueStore;
use crate::validation::{ConstraintValidator, FormValidator, ValidityReport};
use crate::word_limit::{WordCount, WordLimitMonitor};

/// Notification shown after a successful submission.
pub const SUBMITTED_MESSAGE: &str = "Application submitted successfully! Your data has been saved.";

/// Question asked before clearing a submitted form.
pub const CLEAR_CONFIRMATION: &str = "Would you like to clear the form for a new application?";

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Constraints failed; nothing was written
    Invalid(ValidityReport),
    /// Submitted record written
    Submitted { cleared: bool },
}

/// One application form and everything attached to it.
pub struct IntakeSession {
    config: IntakeConfig,
    form: FormState,
    cofounders: CofounderManager,
    persistence: PersistenceController,
    words: WordLimitMonitor,
    prompt: Box<dyn UserPrompt>,
    validator: Box<dyn FormValidator>,
    clock: Box<dyn Clock>,
}

impl IntakeSession {
    /// Create a session over the static form controls.
    pub fn new(
        config: IntakeConfig,
        form: FormState,
        store: Box<dyn KeyValueStore>,
        prompt: Box<dyn UserPrompt>,
    ) -> Self {
        let persistence = PersistenceController::new(store, &config);
        let words = WordLimitMonitor::new(&config.word_limits);
        Self {
            config,
            form,
            cofounders: CofounderManager::new(),
            persistence,
            words,
            prompt,
            validator: Box::new(ConstraintValidator),
            clock: Box::new(SystemClock),
        }
    }

    /// Use a different time source.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use a different validity check.
    pub fn with_validator(mut self, validator: Box<dyn FormValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn cofounders(&self) -> &CofounderManager {
        &self.cofounders
    }

    /// Word counter display for a tracked field.
    pub fn word_count(&self, field_id: &str) -> Option<&WordCount> {
        self.words.get(field_id)
    }

    pub fn word_limits(&self) -> &WordLimitMonitor {
        &self.words
    }

    /// Whether the "saved" acknowledgment is showing.
    pub fn save_indicator_visible(&self) -> bool {
        self.persistence.indicator_visible(self.clock.now_ms())
    }

    /// Earliest pending debounced write (ms since epoch).
    pub fn next_deadline(&self) -> Option<u64> {
        self.persistence.next_deadline()
    }

    /// Value of a static or co-founder control.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.all_controls()
            .into_iter()
            .find(|c| c.name == name)
            .map(|c| c.value.as_str())
    }

    /// Initialize word counters, then restore any saved form.
    ///
    /// Returns what was restored, or `None` when nothing usable was saved.
    pub fn start(&mut self) -> Option<RestoreSummary> {
        self.words.refresh_all(&self.form);
        let summary = self.load_and_apply();
        info!(
            restored = summary.is_some(),
            cofounders = self.cofounders.len(),
            "Intake session started"
        );
        summary
    }

    /// Restore the live record into the form, then save once if any
    /// co-founder groups were rebuilt.
    pub fn load_and_apply(&mut self) -> Option<RestoreSummary> {
        let snapshot = self.persistence.load()?;
        let summary = snapshot::deserialize(&snapshot, &mut self.form, &mut self.cofounders);
        debug!(
            applied = summary.applied,
            skipped = summary.skipped,
            groups = summary.groups,
            "Restored saved form"
        );
        self.words.refresh_all(&self.form);
        // Rebuilt groups count as a change, like a user add.
        if summary.groups > 0 {
            if let Err(e) = self.save() {
                warn!(error = %e, "Could not save restored form");
            }
        }
        Some(summary)
    }

    /// Capture the current form.
    pub fn snapshot(&self) -> FormSnapshot {
        snapshot::serialize(&self.form, &self.cofounders, self.clock.now())
    }

    /// Write the whole form now.
    pub fn save(&mut self) -> Result<(), IntakeError> {
        let snapshot = self.snapshot();
        self.persistence.write(&snapshot, self.clock.now_ms())
    }

    /// Keystroke-level edit of a value-bearing control.
    pub fn input(&mut self, name: &str, value: &str) -> Result<(), IntakeError> {
        let control = self
            .control_mut(name)
            .ok_or_else(|| IntakeError::UnknownField(name.to_string()))?;
        if control.kind.is_checkable() || control.kind == ControlKind::File {
            return Err(IntakeError::NotEditable {
                name: name.to_string(),
                operation: "text input",
            });
        }
        control.value = value.to_string();
        let kind = control.kind;
        let id = control.id.clone();

        self.words.refresh(&id, &self.form);
        self.route(name, kind)
    }

    /// Change event on a text-like control (e.g. on blur): write now.
    pub fn commit(&mut self, name: &str) -> Result<(), IntakeError> {
        if self.control_mut(name).is_none() {
            return Err(IntakeError::UnknownField(name.to_string()));
        }
        self.persistence.cancel(name);
        self.save()
    }

    /// Toggle a checkbox.
    pub fn set_checked(&mut self, name: &str, checked: bool) -> Result<(), IntakeError> {
        let control = self
            .form
            .get_mut(name)
            .ok_or_else(|| IntakeError::UnknownField(name.to_string()))?;
        if control.kind != ControlKind::Checkbox {
            return Err(IntakeError::NotEditable {
                name: name.to_string(),
                operation: "checked state",
            });
        }
        control.checked = checked;
        self.route(name, ControlKind::Checkbox)
    }

    /// Select a radio option.
    pub fn select_radio(&mut self, name: &str, value: &str) -> Result<(), IntakeError> {
        if !self.form.select_radio(name, value) {
            return Err(IntakeError::UnknownField(format!("{}={}", name, value)));
        }
        self.route(name, ControlKind::Radio)
    }

    /// Append a co-founder group and save.
    pub fn add_cofounder(&mut self) -> Result<u32, IntakeError> {
        let ordinal = self.cofounders.add_group(None);
        self.save()?;
        Ok(ordinal)
    }

    /// Remove a co-founder group after confirmation and save.
    pub fn remove_cofounder(&mut self, ordinal: u32) -> Result<RemoveOutcome, IntakeError> {
        let outcome = self.cofounders.remove_group(ordinal, self.prompt.as_ref());
        if outcome == RemoveOutcome::Removed {
            self.save()?;
        }
        Ok(outcome)
    }

    /// Fire debounced writes whose window has elapsed. Returns the number of
    /// writes performed.
    pub fn tick(&mut self) -> Result<usize, IntakeError> {
        let due = self.persistence.take_due(self.clock.now_ms());
        for source in &due {
            debug!(source = %source, "Debounced save");
            self.save()?;
        }
        Ok(due.len())
    }

    /// Validate, record the submission, and offer to clear the form.
    pub fn submit(&mut self) -> Result<SubmitOutcome, IntakeError> {
        let check = {
            let controls = self.all_controls();
            self.validator.check_validity(&controls)
        };
        if let Err(report) = check {
            self.validator.report_validity(&report);
            info!(violations = report.violations.len(), "Submission blocked by validation");
            return Ok(SubmitOutcome::Invalid(report));
        }

        let submitted = self.snapshot().submitted(self.clock.now());
        self.persistence.write_submitted(&submitted)?;
        info!(cofounders = submitted.snapshot.cofounders.len(), "Application submitted");
        self.prompt.alert(SUBMITTED_MESSAGE);

        let cleared = self.prompt.confirm(CLEAR_CONFIRMATION);
        if cleared {
            self.clear()?;
        }
        Ok(SubmitOutcome::Submitted { cleared })
    }

    /// Reset the form for a new application and forget the live record.
    fn clear(&mut self) -> Result<(), IntakeError> {
        self.persistence.clear_live()?;
        self.form.reset();
        self.cofounders.clear();
        self.words.refresh_all(&self.form);
        info!("Form cleared");
        Ok(())
    }

    fn route(&mut self, name: &str, kind: ControlKind) -> Result<(), IntakeError> {
        match self.persistence.schedule(name, kind, self.clock.now_ms()) {
            PersistTrigger::Immediate => self.save(),
            PersistTrigger::Deferred => Ok(()),
        }
    }

    fn control_mut(&mut self, name: &str) -> Option<&mut Control> {
        if self.form.get(name).is_some() {
            return self.form.get_mut(name);
        }
        self.cofounders.control_mut(name)
    }

    fn all_controls(&self) -> Vec<&Control> {
        self.form
            .controls()
            .iter()
            .chain(self.cofounders.controls())
            .collect()
    }
}
