//! Soft word limits on free-text fields.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::WordLimit;
use crate::form::FormState;

/// Threshold band of a word counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitState {
    Neutral,
    /// More than 80% of the budget used
    Warning,
    /// Over budget
    Error,
}

impl LimitState {
    /// Band for `count` words against `limit`.
    pub fn classify(count: usize, limit: u32) -> Self {
        let limit = limit as usize;
        if count > limit {
            LimitState::Error
        } else if count * 5 > limit * 4 {
            // count > 0.8 * limit, kept in integers
            LimitState::Warning
        } else {
            LimitState::Neutral
        }
    }
}

/// Rendered state of one word counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub count: usize,
    pub limit: u32,
    pub state: LimitState,
}

impl WordCount {
    /// Display text, e.g. `81/100 words`.
    pub fn label(&self) -> String {
        format!("{}/{} words", self.count, self.limit)
    }
}

/// Number of whitespace-separated words in `text`.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Tracks word counts for the fields that carry a limit.
#[derive(Debug, Clone, Default)]
pub struct WordLimitMonitor {
    limits: BTreeMap<String, u32>,
    counts: BTreeMap<String, WordCount>,
}

impl WordLimitMonitor {
    pub fn new(limits: &[WordLimit]) -> Self {
        Self {
            limits: limits
                .iter()
                .map(|l| (l.field_id.clone(), l.limit))
                .collect(),
            counts: BTreeMap::new(),
        }
    }

    /// Limit configured for a field.
    pub fn limit(&self, field_id: &str) -> Option<u32> {
        self.limits.get(field_id).copied()
    }

    /// Recount one field.
    pub fn update(&mut self, field_id: &str, limit: u32, text: &str) -> &WordCount {
        let count = count_words(text);
        let display = WordCount {
            count,
            limit,
            state: LimitState::classify(count, limit),
        };
        self.counts.insert(field_id.to_string(), display);
        &self.counts[field_id]
    }

    /// Recount a tracked field from the form; untracked ids are ignored.
    pub fn refresh(&mut self, field_id: &str, form: &FormState) -> Option<&WordCount> {
        let limit = self.limit(field_id)?;
        let text = form.by_id(field_id)?.value.clone();
        Some(self.update(field_id, limit, &text))
    }

    /// Recount every tracked field.
    pub fn refresh_all(&mut self, form: &FormState) {
        let tracked: Vec<(String, u32)> = self
            .limits
            .iter()
            .map(|(id, limit)| (id.clone(), *limit))
            .collect();
        for (field_id, limit) in tracked {
            if let Some(control) = form.by_id(&field_id) {
                let text = control.value.clone();
                self.update(&field_id, limit, &text);
            }
        }
    }

    /// Current display for a field.
    pub fn get(&self, field_id: &str) -> Option<&WordCount> {
        self.counts.get(field_id)
    }

    /// Every computed display, keyed by field id.
    pub fn counts(&self) -> &BTreeMap<String, WordCount> {
        &self.counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{Control, ControlKind};

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_count_words_whitespace_runs() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   \n\t "), 0);
        assert_eq!(count_words("  one  two\tthree\n\nfour "), 4);
    }

    #[test]
    fn test_limit_100_boundaries() {
        assert_eq!(LimitState::classify(80, 100), LimitState::Neutral);
        assert_eq!(LimitState::classify(81, 100), LimitState::Warning);
        // At the limit: within budget, but in the warning band
        assert_eq!(LimitState::classify(100, 100), LimitState::Warning);
        assert_eq!(LimitState::classify(101, 100), LimitState::Error);
    }

    #[test]
    fn test_boundaries_for_uneven_limits() {
        for limit in [1u32, 7, 13, 150, 333] {
            let floor = (limit as usize * 4) / 5;
            assert_eq!(LimitState::classify(floor, limit), LimitState::Neutral, "limit {limit}");
            assert_ne!(LimitState::classify(limit as usize, limit), LimitState::Error);
            assert_eq!(LimitState::classify(limit as usize + 1, limit), LimitState::Error);
        }
        // 0.8 * 7 = 5.6, so 6 words is the first warning
        assert_eq!(LimitState::classify(6, 7), LimitState::Warning);
        assert_eq!(LimitState::classify(5, 7), LimitState::Neutral);
    }

    #[test]
    fn test_update_renders_label() {
        let mut monitor = WordLimitMonitor::default();
        let display = monitor.update("problem", 100, &words(81));

        assert_eq!(display.label(), "81/100 words");
        assert_eq!(display.state, LimitState::Warning);
    }

    #[test]
    fn test_refresh_all_tracks_configured_fields() {
        let limits = [
            WordLimit {
                field_id: "problem".to_string(),
                limit: 3,
            },
            WordLimit {
                field_id: "missing".to_string(),
                limit: 10,
            },
        ];
        let form = FormState::new()
            .with_control(Control::new("problem", ControlKind::TextArea).with_default("a b c d"))
            .with_control(Control::new("other", ControlKind::TextArea).with_default("x"));
        let mut monitor = WordLimitMonitor::new(&limits);

        monitor.refresh_all(&form);

        assert_eq!(monitor.get("problem").unwrap().state, LimitState::Error);
        assert!(monitor.get("missing").is_none());
        assert!(monitor.refresh("other", &form).is_none());
    }
}
