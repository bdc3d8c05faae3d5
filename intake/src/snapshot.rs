//! Snapshot codec: live form state ⇄ serializable record.
//!
//! Wire shape (JSON):
//!
//! ```text
//! { "timestamp": "2025-01-01T00:00:00Z",
//!   "fields": { "companyName": "Acme", "newsletter": true },
//!   "cofounders": [ { "firstName": "Ada", "email": "ada@example.com", ... } ] }
//! ```
//!
//! A submitted record adds `"submittedAt"`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cofounder::{CofounderManager, QualifiedName};
use crate::form::{Control, ControlKind, FormState};

/// Value of a serialized field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

/// One co-founder's values keyed by unqualified key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CofounderRecord(BTreeMap<String, String>);

impl CofounderRecord {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for CofounderRecord {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Complete capture of the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSnapshot {
    #[serde(default)]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
    #[serde(default)]
    pub cofounders: Vec<CofounderRecord>,
}

impl FormSnapshot {
    /// Parse a stored snapshot.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Stamp as submitted.
    pub fn submitted(self, submitted_at: DateTime<Utc>) -> SubmittedSnapshot {
        SubmittedSnapshot {
            snapshot: self,
            submitted_at,
        }
    }
}

/// A snapshot recorded at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedSnapshot {
    #[serde(flatten)]
    pub snapshot: FormSnapshot,
    #[serde(rename = "submittedAt")]
    pub submitted_at: DateTime<Utc>,
}

impl SubmittedSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Capture the form and its co-founder groups.
pub fn serialize(
    form: &FormState,
    cofounders: &CofounderManager,
    timestamp: DateTime<Utc>,
) -> FormSnapshot {
    let mut fields = BTreeMap::new();
    let mut records = cofounders.records();

    for control in form.controls() {
        if control.name.is_empty() || control.kind == ControlKind::File {
            continue;
        }
        // Group-named controls on the static form join an existing group's
        // record; without a matching group they stay ordinary fields.
        if let Some(qualified) = QualifiedName::parse(&control.name) {
            match records.get_mut(qualified.ordinal as usize - 1) {
                Some(record) => {
                    record.insert(qualified.key, control.value.clone());
                    continue;
                }
                None => debug!(field = %control.name, "No co-founder group for field"),
            }
        }
        match control.kind {
            ControlKind::Radio => {
                if control.checked {
                    fields.insert(control.name.clone(), FieldValue::Text(control.value.clone()));
                }
            }
            ControlKind::Checkbox => {
                fields.insert(control.name.clone(), FieldValue::Flag(control.checked));
            }
            _ => {
                fields.insert(control.name.clone(), FieldValue::Text(control.value.clone()));
            }
        }
    }

    FormSnapshot {
        timestamp,
        fields,
        cofounders: records,
    }
}

/// What a restore did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    /// Field entries written into controls
    pub applied: usize,
    /// Field entries with no matching control or option
    pub skipped: usize,
    /// Co-founder groups recreated
    pub groups: usize,
}

/// Apply a snapshot to the form, recreating co-founder groups in order.
///
/// Best effort: entries without a matching control are skipped.
pub fn deserialize(
    snapshot: &FormSnapshot,
    form: &mut FormState,
    cofounders: &mut CofounderManager,
) -> RestoreSummary {
    let mut summary = RestoreSummary::default();

    for (name, value) in &snapshot.fields {
        let Some(kind) = form.get(name).map(|c| c.kind) else {
            debug!(field = %name, "No control for saved field");
            summary.skipped += 1;
            continue;
        };

        let applied = match (kind, value) {
            (ControlKind::Radio, FieldValue::Text(option)) => form.select_radio(name, option),
            (ControlKind::Checkbox, FieldValue::Flag(checked)) => {
                set_control(form, name, |c| c.checked = *checked)
            }
            (ControlKind::Radio | ControlKind::Checkbox | ControlKind::File, _) => false,
            (_, FieldValue::Text(text)) => set_control(form, name, |c| c.value = text.clone()),
            (_, FieldValue::Flag(flag)) => set_control(form, name, |c| c.value = flag.to_string()),
        };

        if applied {
            summary.applied += 1;
        } else {
            debug!(field = %name, "Saved value does not fit control");
            summary.skipped += 1;
        }
    }

    for record in &snapshot.cofounders {
        cofounders.add_group(Some(record));
        summary.groups += 1;
    }

    summary
}

fn set_control(
    form: &mut FormState,
    name: &str,
    apply: impl FnOnce(&mut Control),
) -> bool {
    match form.get_mut(name) {
        Some(control) => {
            apply(control);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_735_689_600_000).unwrap()
    }

    fn application_form() -> FormState {
        FormState::new()
            .with_control(Control::new("companyName", ControlKind::Text).required())
            .with_control(Control::new("problem", ControlKind::TextArea))
            .with_control(Control::new("country", ControlKind::Select))
            .with_control(Control::new("fullTime", ControlKind::Checkbox))
            .with_control(Control::radio("stage", "idea"))
            .with_control(Control::radio("stage", "mvp"))
            .with_control(Control::new("pitchDeck", ControlKind::File))
    }

    #[test]
    fn test_serialize_field_rules() {
        let mut form = application_form();
        form.get_mut("companyName").unwrap().value = "Acme".to_string();
        form.get_mut("pitchDeck").unwrap().value = "C:\\fakepath\\deck.pdf".to_string();

        let snapshot = serialize(&form, &CofounderManager::new(), at());

        assert_eq!(snapshot.fields["companyName"], FieldValue::from("Acme"));
        assert_eq!(snapshot.fields["fullTime"], FieldValue::Flag(false));
        assert!(!snapshot.fields.contains_key("stage"));
        assert!(!snapshot.fields.contains_key("pitchDeck"));
        assert_eq!(snapshot.timestamp, at());
    }

    #[test]
    fn test_group_named_static_control_joins_existing_group() {
        let mut cofounders = CofounderManager::new();
        cofounders.add_group(None);
        cofounders.add_group(None);
        let form = FormState::new()
            .with_control(Control::new("cofounder2_referral", ControlKind::Text).with_default("friend"))
            .with_control(Control::new("cofounderNotes", ControlKind::TextArea));

        let snapshot = serialize(&form, &cofounders, at());

        assert!(snapshot.fields.contains_key("cofounderNotes"));
        assert!(!snapshot.fields.contains_key("cofounder2_referral"));
        assert_eq!(snapshot.cofounders.len(), 2);
        assert_eq!(snapshot.cofounders[1].get("referral"), Some("friend"));
        assert_eq!(snapshot.cofounders[0].get("referral"), None);
    }

    #[test]
    fn test_group_named_static_control_without_group_stays_a_field() {
        let static_form = || {
            FormState::new()
                .with_control(Control::new("cofounder3_referral", ControlKind::Text))
                .with_control(Control::new("cofounder4000000000_x", ControlKind::Text))
        };
        let mut form = static_form();
        form.get_mut("cofounder3_referral").unwrap().value = "friend".to_string();
        form.get_mut("cofounder4000000000_x").unwrap().value = "y".to_string();

        let snapshot = serialize(&form, &CofounderManager::new(), at());

        assert!(snapshot.cofounders.is_empty());
        assert_eq!(snapshot.fields["cofounder3_referral"], FieldValue::from("friend"));

        let mut restored_form = static_form();
        let mut restored_groups = CofounderManager::new();
        let summary = deserialize(&snapshot, &mut restored_form, &mut restored_groups);

        assert_eq!(summary.groups, 0);
        assert!(restored_groups.is_empty());
        assert_eq!(restored_form, form);
    }

    #[test]
    fn test_wire_shape() {
        let mut cofounders = CofounderManager::new();
        cofounders.add_group(None);
        let form = FormState::new().with_control(Control::new("fullTime", ControlKind::Checkbox));

        let json = serialize(&form, &cofounders, at()).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["fields"]["fullTime"], serde_json::json!(false));
        assert_eq!(value["cofounders"][0]["linkedIn"], serde_json::json!(""));
        assert!(value["timestamp"].as_str().unwrap().starts_with("2025-01-01T00:00:00"));
    }

    #[test]
    fn test_submitted_record_adds_submitted_at() {
        let snapshot = serialize(&FormState::new(), &CofounderManager::new(), at());
        let json = snapshot.submitted(at()).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value.get("submittedAt").is_some());
        assert!(value.get("fields").is_some());
        assert!(value.get("timestamp").is_some());
    }

    #[test]
    fn test_restore_round_trip() {
        let mut form = application_form();
        let mut cofounders = CofounderManager::new();
        form.get_mut("companyName").unwrap().value = "Acme".to_string();
        form.get_mut("problem").unwrap().value = "Forms lose data".to_string();
        form.get_mut("country").unwrap().value = "NZ".to_string();
        form.get_mut("fullTime").unwrap().checked = true;
        form.select_radio("stage", "mvp");
        for name in ["Ada", "Grace", "Hedy"] {
            let ordinal = cofounders.add_group(None);
            let field = format!("cofounder{}_firstName", ordinal);
            cofounders.control_mut(&field).unwrap().value = name.to_string();
        }

        let snapshot = serialize(&form, &cofounders, at());
        let json = snapshot.to_json().unwrap();

        let mut restored_form = application_form();
        let mut restored_groups = CofounderManager::new();
        let summary = deserialize(
            &FormSnapshot::from_json(&json).unwrap(),
            &mut restored_form,
            &mut restored_groups,
        );

        assert_eq!(summary.groups, 3);
        assert_eq!(summary.skipped, 0);
        assert_eq!(restored_form, form);
        let ordinals: Vec<u32> = restored_groups.groups().iter().map(|g| g.ordinal()).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);
        assert_eq!(restored_groups.records(), cofounders.records());
    }

    #[test]
    fn test_restore_tolerates_drift() {
        let json = r#"{
            "timestamp": "2024-06-01T10:00:00.000Z",
            "fields": {
                "removedField": "gone",
                "stage": "series-b",
                "fullTime": "yes",
                "companyName": true
            }
        }"#;
        let mut form = application_form();
        let mut cofounders = CofounderManager::new();

        let summary = deserialize(&FormSnapshot::from_json(json).unwrap(), &mut form, &mut cofounders);

        assert_eq!(summary.applied, 1);
        assert_eq!(summary.skipped, 3);
        assert_eq!(form.selected_radio("stage"), None);
        assert!(!form.get("fullTime").unwrap().checked);
        assert_eq!(form.get("companyName").unwrap().value, "true");
        assert!(cofounders.is_empty());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(FormSnapshot::from_json("{not json").is_err());
        assert!(FormSnapshot::from_json(r#"{"fields": {"n": 4}}"#).is_err());
    }
}
