//! Co-founder field schema and qualified field names.

use std::fmt;

use crate::form::ControlKind;

/// Name prefix shared by every co-founder control.
pub const GROUP_PREFIX: &str = "cofounder";

/// One field of the co-founder sub-form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Unqualified key used in snapshots
    pub key: &'static str,
    /// Label text (without the required marker)
    pub label: &'static str,
    pub kind: ControlKind,
    pub required: bool,
}

impl FieldSpec {
    /// Label as displayed, with ` *` on required fields.
    pub fn label_text(&self) -> String {
        if self.required {
            format!("{} *", self.label)
        } else {
            self.label.to_string()
        }
    }
}

/// Fields every co-founder group carries, in display order.
pub const COFOUNDER_FIELDS: [FieldSpec; 5] = [
    FieldSpec {
        key: "firstName",
        label: "First Name",
        kind: ControlKind::Text,
        required: true,
    },
    FieldSpec {
        key: "lastName",
        label: "Last Name",
        kind: ControlKind::Text,
        required: true,
    },
    FieldSpec {
        key: "email",
        label: "Email",
        kind: ControlKind::Email,
        required: true,
    },
    FieldSpec {
        key: "phone",
        label: "Phone Number",
        kind: ControlKind::Tel,
        required: false,
    },
    FieldSpec {
        key: "linkedIn",
        label: "LinkedIn URL",
        kind: ControlKind::Url,
        required: true,
    },
];

/// A parsed `cofounder{ordinal}_{key}` name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub ordinal: u32,
    pub key: String,
}

impl QualifiedName {
    pub fn new(ordinal: u32, key: impl Into<String>) -> Self {
        Self {
            ordinal,
            key: key.into(),
        }
    }

    /// Parse a control name.
    ///
    /// The ordinal is the digit run between the prefix and the first
    /// underscore; everything after that underscore is the key, underscores
    /// included. Returns `None` for names outside the group namespace
    /// (e.g. `cofounderNotes`).
    pub fn parse(name: &str) -> Option<Self> {
        let rest = name.strip_prefix(GROUP_PREFIX)?;
        let (digits, key) = rest.split_once('_')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) || key.is_empty() {
            return None;
        }
        let ordinal = digits.parse::<u32>().ok().filter(|n| *n > 0)?;
        Some(Self::new(ordinal, key))
    }

    /// Same key, different ordinal.
    pub fn with_ordinal(&self, ordinal: u32) -> Self {
        Self::new(ordinal, self.key.clone())
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}_{}", GROUP_PREFIX, self.ordinal, self.key)
    }
}
