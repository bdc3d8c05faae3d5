//! Repeatable group manager: add, remove and renumber co-founder groups.

use tracing::debug;

use super::group::{CofounderGroup, CofounderGroupBuilder};
use crate::form::Control;
use crate::prompt::UserPrompt;
use crate::snapshot::CofounderRecord;

/// Confirmation text shown before a group is removed.
pub const REMOVE_CONFIRMATION: &str = "Are you sure you want to remove this co-founder?";

/// Result of a removal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// Group deleted and the rest renumbered
    Removed,
    /// User declined the confirmation
    Cancelled,
    /// No group carries that ordinal
    NotFound,
}

/// Owns the co-founder groups and the running ordinal counter.
#[derive(Debug, Clone, Default)]
pub struct CofounderManager {
    groups: Vec<CofounderGroup>,
    counter: u32,
}

impl CofounderManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups in display order.
    pub fn groups(&self) -> &[CofounderGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Running counter; the last allocated ordinal.
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Group by ordinal.
    pub fn group(&self, ordinal: u32) -> Option<&CofounderGroup> {
        self.groups.iter().find(|g| g.ordinal() == ordinal)
    }

    /// All group controls, in display order.
    pub fn controls(&self) -> impl Iterator<Item = &Control> {
        self.groups.iter().flat_map(|g| g.controls())
    }

    /// Group control by qualified name.
    pub fn control_mut(&mut self, name: &str) -> Option<&mut Control> {
        self.groups.iter_mut().find_map(|g| g.control_mut(name))
    }

    /// Append a group with the next ordinal, optionally pre-populated.
    pub fn add_group(&mut self, initial: Option<&CofounderRecord>) -> u32 {
        self.counter += 1;
        let ordinal = self.counter;
        let group = CofounderGroupBuilder::new(ordinal).record(initial).build();
        self.groups.push(group);
        debug!(ordinal, "Added co-founder group");
        ordinal
    }

    /// Remove the group with `ordinal` after the user confirms.
    pub fn remove_group(&mut self, ordinal: u32, prompt: &dyn UserPrompt) -> RemoveOutcome {
        let Some(index) = self.groups.iter().position(|g| g.ordinal() == ordinal) else {
            return RemoveOutcome::NotFound;
        };
        if !prompt.confirm(REMOVE_CONFIRMATION) {
            return RemoveOutcome::Cancelled;
        }

        self.groups.remove(index);
        self.renumber();
        debug!(ordinal, remaining = self.groups.len(), "Removed co-founder group");
        RemoveOutcome::Removed
    }

    /// Reassign ordinals `1..N` in display order and reset the counter to N.
    pub fn renumber(&mut self) {
        for (index, group) in self.groups.iter_mut().enumerate() {
            group.assign_ordinal(index as u32 + 1);
        }
        self.counter = self.groups.len() as u32;
    }

    /// Drop every group and reset the counter.
    pub fn clear(&mut self) {
        self.groups.clear();
        self.counter = 0;
    }

    /// Records in display order.
    pub fn records(&self) -> Vec<CofounderRecord> {
        self.groups.iter().map(|g| g.to_record()).collect()
    }
}
