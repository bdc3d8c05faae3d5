//! Repeatable co-founder groups.
//!
//! Each group is a structurally identical sub-form whose controls are named
//! `cofounder{ordinal}_{key}`. Ordinals are kept contiguous (`1..N`) across
//! removals so saved records map back to groups by position.

pub mod group;
pub mod manager;
pub mod schema;

pub use group::{CofounderGroup, CofounderGroupBuilder, GroupField, Label};
pub use manager::{CofounderManager, RemoveOutcome, REMOVE_CONFIRMATION};
pub use schema::{FieldSpec, QualifiedName, COFOUNDER_FIELDS, GROUP_PREFIX};
