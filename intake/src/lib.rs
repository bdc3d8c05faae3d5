//! Speedrun Intake - autosaving application form engine
//!
//! Platform-independent core of the Speedrun application form:
//! - Snapshot codec between live controls and a JSON record
//! - Repeatable co-founder groups with contiguous renumbering
//! - Debounced write-through persistence with restore-on-load
//! - Soft word limits with warning/error bands
//! - Shared-password session gate and submit-time validation
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                IntakeSession                 │
//! │    (input / change / tick / submit events)   │
//! └──────┬──────────────┬──────────────┬─────────┘
//!        ▼              ▼              ▼
//! ┌─────────────┐ ┌────────────┐ ┌─────────────┐
//! │ WordLimit   │ │ Cofounder  │ │ Persistence │
//! │ Monitor     │ │ Manager    │ │ Controller  │
//! └─────────────┘ └─────┬──────┘ └──────┬──────┘
//!                       ▼               ▼
//!                 ┌────────────┐ ┌─────────────┐
//!                 │  Snapshot  │─│KeyValueStore│
//!                 │   codec    │ │             │
//!                 └────────────┘ └─────────────┘
//! ```
//!
//! Host capabilities (storage, prompts, validity reporting, time) are traits
//! so the browser bindings and tests can supply their own.

pub mod auth;
pub mod clock;
pub mod cofounder;
pub mod config;
pub mod error;
pub mod form;
pub mod persistence;
pub mod prompt;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod validation;
pub mod word_limit;

// Re-export main types for convenience
pub use auth::PasswordGate;
pub use clock::{Clock, ManualClock, SystemClock};
pub use cofounder::{CofounderGroup, CofounderManager, QualifiedName, RemoveOutcome};
pub use config::{IntakeConfig, WordLimit};
pub use error::{IntakeError, StoreError};
pub use form::{Control, ControlKind, FormState};
pub use persistence::{PersistTrigger, PersistenceController};
pub use prompt::{ScriptedPrompt, UserPrompt};
pub use session::{IntakeSession, SubmitOutcome};
pub use snapshot::{CofounderRecord, FieldValue, FormSnapshot, SubmittedSnapshot};
pub use store::{KeyValueStore, MemoryStore, SessionStore};
pub use validation::{ConstraintValidator, FormValidator, ValidityReport};
pub use word_limit::{LimitState, WordCount, WordLimitMonitor};
