//! Persistence controller: debounced write-through of snapshots.
//!
//! Free-text edits are coalesced per control and written after the debounce
//! window; every other change is written immediately. Each write overwrites
//! the whole live record.

pub mod debounce;

use tracing::{debug, error, warn};

pub use debounce::Debouncer;

use crate::config::IntakeConfig;
use crate::error::IntakeError;
use crate::form::ControlKind;
use crate::snapshot::{FormSnapshot, SubmittedSnapshot};
use crate::store::KeyValueStore;

/// How a change will reach storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistTrigger {
    /// Write now
    Immediate,
    /// Write once the source has been idle for the debounce window
    Deferred,
}

/// Transient "saved" acknowledgment.
#[derive(Debug, Clone, Copy)]
pub struct SaveIndicator {
    duration_ms: u64,
    visible_until: Option<u64>,
}

impl SaveIndicator {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            visible_until: None,
        }
    }

    /// Show (or extend) the acknowledgment from `now_ms`.
    pub fn show(&mut self, now_ms: u64) {
        self.visible_until = Some(now_ms.saturating_add(self.duration_ms));
    }

    pub fn is_visible(&self, now_ms: u64) -> bool {
        self.visible_until.is_some_and(|until| now_ms < until)
    }
}

/// Owns the store handle, the live/submitted keys and the debounce timers.
pub struct PersistenceController {
    store: Box<dyn KeyValueStore>,
    live_key: String,
    submitted_key: String,
    debouncer: Debouncer,
    indicator: SaveIndicator,
}

impl PersistenceController {
    pub fn new(store: Box<dyn KeyValueStore>, config: &IntakeConfig) -> Self {
        Self {
            store,
            live_key: config.storage_key.clone(),
            submitted_key: config.submitted_key(),
            debouncer: Debouncer::new(config.debounce_ms),
            indicator: SaveIndicator::new(config.save_indicator_ms),
        }
    }

    pub fn live_key(&self) -> &str {
        &self.live_key
    }

    pub fn submitted_key(&self) -> &str {
        &self.submitted_key
    }

    /// Route a change from `source`: arm its debounce timer for free-text
    /// kinds, otherwise ask for an immediate write.
    pub fn schedule(&mut self, source: &str, kind: ControlKind, now_ms: u64) -> PersistTrigger {
        if kind.is_debounced() {
            self.debouncer.schedule(source, now_ms);
            PersistTrigger::Deferred
        } else {
            PersistTrigger::Immediate
        }
    }

    /// Drop a pending deferred write for `source`.
    pub fn cancel(&mut self, source: &str) -> bool {
        self.debouncer.cancel(source)
    }

    /// Sources whose debounce window has elapsed.
    pub fn take_due(&mut self, now_ms: u64) -> Vec<String> {
        self.debouncer.take_due(now_ms)
    }

    pub fn has_pending(&self) -> bool {
        self.debouncer.pending_count() > 0
    }

    /// Earliest pending deadline, for hosts that arm a real timer.
    pub fn next_deadline(&self) -> Option<u64> {
        self.debouncer.next_deadline()
    }

    /// Overwrite the live record.
    pub fn write(&mut self, snapshot: &FormSnapshot, now_ms: u64) -> Result<(), IntakeError> {
        let json = snapshot.to_json()?;
        self.store.set(&self.live_key, &json)?;
        self.indicator.show(now_ms);
        debug!(key = %self.live_key, bytes = json.len(), "Saved form snapshot");
        Ok(())
    }

    /// Write the submitted record. The live record is left in place.
    pub fn write_submitted(&self, submitted: &SubmittedSnapshot) -> Result<(), IntakeError> {
        let json = submitted.to_json()?;
        self.store.set(&self.submitted_key, &json)?;
        Ok(())
    }

    /// Read the live record.
    ///
    /// A missing, unreadable or malformed record is reported as `None`.
    pub fn load(&self) -> Option<FormSnapshot> {
        let json = match self.store.get(&self.live_key) {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %self.live_key, error = %e, "Could not read saved form");
                return None;
            }
        };

        match FormSnapshot::from_json(&json) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                error!(key = %self.live_key, error = %e, "Error loading saved data");
                None
            }
        }
    }

    /// Delete the live record and drop pending writes so it is not recreated.
    pub fn clear_live(&mut self) -> Result<(), IntakeError> {
        self.store.remove(&self.live_key)?;
        self.debouncer.cancel_all();
        Ok(())
    }

    pub fn indicator_visible(&self, now_ms: u64) -> bool {
        self.indicator.is_visible(now_ms)
    }
}
