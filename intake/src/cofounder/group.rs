//! A single co-founder group instance and the builder that materializes it.

use serde::Serialize;
use tracing::warn;

use super::schema::{FieldSpec, QualifiedName, COFOUNDER_FIELDS};
use crate::form::Control;
use crate::snapshot::CofounderRecord;

/// Label linked to a control by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    pub for_id: String,
    pub text: String,
}

/// A control inside a group together with its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupField {
    pub label: Label,
    pub control: Control,
}

/// One repeatable co-founder sub-form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CofounderGroup {
    /// Identifying attribute (`data-cofounder`)
    attribute: u32,
    heading: String,
    /// Argument passed by the group's remove trigger
    remove_argument: u32,
    fields: Vec<GroupField>,
}

impl CofounderGroup {
    /// Current display ordinal.
    pub fn ordinal(&self) -> u32 {
        self.attribute
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn remove_argument(&self) -> u32 {
        self.remove_argument
    }

    pub fn fields(&self) -> &[GroupField] {
        &self.fields
    }

    /// Iterate over the group's controls.
    pub fn controls(&self) -> impl Iterator<Item = &Control> {
        self.fields.iter().map(|f| &f.control)
    }

    /// Control by qualified name.
    pub fn control_mut(&mut self, name: &str) -> Option<&mut Control> {
        self.fields
            .iter_mut()
            .map(|f| &mut f.control)
            .find(|c| c.name == name)
    }

    /// Value of the control with the given unqualified key.
    pub fn value(&self, key: &str) -> Option<&str> {
        let name = QualifiedName::new(self.attribute, key).to_string();
        self.controls()
            .find(|c| c.name == name)
            .map(|c| c.value.as_str())
    }

    /// Fill controls from a saved record; unknown keys are ignored.
    pub fn populate(&mut self, record: &CofounderRecord) {
        let ordinal = self.attribute;
        for (key, value) in record.iter() {
            let name = QualifiedName::new(ordinal, key).to_string();
            if let Some(control) = self.control_mut(&name) {
                control.value = value.clone();
            }
        }
    }

    /// Capture the group as a record keyed by unqualified key.
    pub fn to_record(&self) -> CofounderRecord {
        self.controls()
            .filter_map(|c| QualifiedName::parse(&c.name).map(|q| (q.key, c.value.clone())))
            .collect()
    }

    /// Rewrite every ordinal-bearing attribute to `ordinal`.
    ///
    /// Keys are recovered from each control's current qualified name, so the
    /// rewrite depends only on name structure.
    pub(crate) fn assign_ordinal(&mut self, ordinal: u32) {
        self.attribute = ordinal;
        self.heading = heading_for(ordinal);
        self.remove_argument = ordinal;

        for field in &mut self.fields {
            let Some(old) = QualifiedName::parse(&field.control.name) else {
                warn!(name = %field.control.name, "Group control outside the cofounder namespace");
                continue;
            };
            let renamed = old.with_ordinal(ordinal).to_string();
            field.control.id = renamed.clone();
            field.control.name = renamed;
            field.label.for_id = field.control.id.clone();
        }
    }
}

fn heading_for(ordinal: u32) -> String {
    format!("Co-Founder {}", ordinal)
}

/// Builds a [`CofounderGroup`] from a field schema and an ordinal.
pub struct CofounderGroupBuilder<'a> {
    ordinal: u32,
    schema: &'a [FieldSpec],
    record: Option<&'a CofounderRecord>,
}

impl<'a> CofounderGroupBuilder<'a> {
    /// Start a builder for the given ordinal using the standard schema.
    pub fn new(ordinal: u32) -> Self {
        Self {
            ordinal,
            schema: &COFOUNDER_FIELDS,
            record: None,
        }
    }

    /// Use a custom schema.
    pub fn schema(mut self, schema: &'a [FieldSpec]) -> Self {
        self.schema = schema;
        self
    }

    /// Pre-populate from a saved record.
    pub fn record(mut self, record: Option<&'a CofounderRecord>) -> Self {
        self.record = record;
        self
    }

    /// Materialize the group.
    pub fn build(self) -> CofounderGroup {
        let fields = self
            .schema
            .iter()
            .map(|spec| {
                let qualified = QualifiedName::new(self.ordinal, spec.key).to_string();
                let mut control = Control::new(qualified.clone(), spec.kind);
                control.required = spec.required;
                GroupField {
                    label: Label {
                        for_id: qualified,
                        text: spec.label_text(),
                    },
                    control,
                }
            })
            .collect();

        let mut group = CofounderGroup {
            attribute: self.ordinal,
            heading: heading_for(self.ordinal),
            remove_argument: self.ordinal,
            fields,
        };
        if let Some(record) = self.record {
            group.populate(record);
        }
        group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::ControlKind;

    #[test]
    fn test_builder_qualifies_names_and_labels() {
        let group = CofounderGroupBuilder::new(2).build();

        assert_eq!(group.ordinal(), 2);
        assert_eq!(group.heading(), "Co-Founder 2");
        assert_eq!(group.remove_argument(), 2);
        assert_eq!(group.fields().len(), 5);

        let email = &group.fields()[2];
        assert_eq!(email.control.name, "cofounder2_email");
        assert_eq!(email.control.id, "cofounder2_email");
        assert_eq!(email.control.kind, ControlKind::Email);
        assert_eq!(email.label.for_id, "cofounder2_email");
        assert_eq!(email.label.text, "Email *");

        let phone = &group.fields()[3];
        assert!(!phone.control.required);
    }

    #[test]
    fn test_builder_populates_known_keys_only() {
        let record: CofounderRecord = [
            ("firstName", "Ada"),
            ("email", "ada@example.com"),
            ("favouriteColour", "green"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let group = CofounderGroupBuilder::new(1).record(Some(&record)).build();

        assert_eq!(group.value("firstName"), Some("Ada"));
        assert_eq!(group.value("email"), Some("ada@example.com"));
        assert_eq!(group.value("lastName"), Some(""));
        assert!(group.to_record().get("favouriteColour").is_none());
    }

    #[test]
    fn test_assign_ordinal_rewrites_everything() {
        let mut group = CofounderGroupBuilder::new(3).build();
        group.control_mut("cofounder3_lastName").unwrap().value = "Lovelace".to_string();

        group.assign_ordinal(1);

        assert_eq!(group.ordinal(), 1);
        assert_eq!(group.heading(), "Co-Founder 1");
        assert_eq!(group.remove_argument(), 1);
        for field in group.fields() {
            assert!(field.control.name.starts_with("cofounder1_"));
            assert_eq!(field.control.id, field.control.name);
            assert_eq!(field.label.for_id, field.control.id);
        }
        assert_eq!(group.value("lastName"), Some("Lovelace"));
    }

    #[test]
    fn test_custom_schema_keys_with_underscores() {
        let schema = [FieldSpec {
            key: "github_handle",
            label: "GitHub",
            kind: ControlKind::Text,
            required: false,
        }];
        let mut group = CofounderGroupBuilder::new(4).schema(&schema).build();
        group.assign_ordinal(2);

        assert_eq!(group.fields()[0].control.name, "cofounder2_github_handle");
        assert!(group.to_record().get("github_handle").is_some());
    }
}
