//! Live form model.
//!
//! A [`FormState`] is the ordered set of named controls on the static part of
//! the application form. Co-founder controls are owned by their group (see
//! [`crate::cofounder`]) and are not stored here.

use serde::{Deserialize, Serialize};

/// Kind of form control, mirroring the HTML input types the form uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Text,
    Email,
    Tel,
    Url,
    Number,
    Date,
    #[serde(rename = "textarea")]
    TextArea,
    Select,
    Checkbox,
    Radio,
    File,
}

impl ControlKind {
    /// Free-text controls whose keystrokes are coalesced before persisting.
    pub fn is_debounced(&self) -> bool {
        matches!(
            self,
            ControlKind::Text
                | ControlKind::Email
                | ControlKind::Tel
                | ControlKind::Url
                | ControlKind::TextArea
        )
    }

    /// Controls whose state is a checked flag rather than a value.
    pub fn is_checkable(&self) -> bool {
        matches!(self, ControlKind::Checkbox | ControlKind::Radio)
    }
}

/// A single named form control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    /// Form field name (radio options share one)
    pub name: String,
    /// Element id
    pub id: String,
    pub kind: ControlKind,
    /// Current value (for radios and checkboxes: the option value)
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub required: bool,
    /// Regex the whole value must match when non-empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default)]
    pub default_value: String,
    #[serde(default)]
    pub default_checked: bool,
}

impl Control {
    /// Create a control whose id equals its name.
    pub fn new(name: impl Into<String>, kind: ControlKind) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            kind,
            value: String::new(),
            checked: false,
            required: false,
            pattern: None,
            default_value: String::new(),
            default_checked: false,
        }
    }

    /// Create one option of a radio group.
    pub fn radio(name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        let mut control = Self::new(name.clone(), ControlKind::Radio);
        control.id = format!("{}_{}", name, value);
        control.default_value = value.clone();
        control.value = value;
        control
    }

    /// Set the element id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Mark as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a pattern constraint.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Set the initial (and reset) value.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        self.default_value = value.clone();
        self.value = value;
        self
    }

    /// Set the initial (and reset) checked state.
    pub fn with_default_checked(mut self, checked: bool) -> Self {
        self.default_checked = checked;
        self.checked = checked;
        self
    }

    /// Restore the control to its initial state.
    pub fn reset(&mut self) {
        self.value = self.default_value.clone();
        self.checked = self.default_checked;
    }
}

/// The static controls of the application form, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormState {
    controls: Vec<Control>,
}

impl FormState {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a control (builder style).
    pub fn with_control(mut self, control: Control) -> Self {
        self.controls.push(control);
        self
    }

    /// Add a control.
    pub fn push(&mut self, control: Control) {
        self.controls.push(control);
    }

    /// All controls in document order.
    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    /// First control with the given name.
    pub fn get(&self, name: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.name == name)
    }

    /// First control with the given name (mutable).
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Control> {
        self.controls.iter_mut().find(|c| c.name == name)
    }

    /// Control by element id.
    pub fn by_id(&self, id: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.id == id)
    }

    /// Select the radio option `value` in group `name`.
    ///
    /// Returns false (and leaves the group untouched) when no option has
    /// that value.
    pub fn select_radio(&mut self, name: &str, value: &str) -> bool {
        let exists = self
            .controls
            .iter()
            .any(|c| c.kind == ControlKind::Radio && c.name == name && c.value == value);
        if !exists {
            return false;
        }

        for control in self
            .controls
            .iter_mut()
            .filter(|c| c.kind == ControlKind::Radio && c.name == name)
        {
            control.checked = control.value == value;
        }
        true
    }

    /// Currently selected value of a radio group.
    pub fn selected_radio(&self, name: &str) -> Option<&str> {
        self.controls
            .iter()
            .find(|c| c.kind == ControlKind::Radio && c.name == name && c.checked)
            .map(|c| c.value.as_str())
    }

    /// Reset every control to its initial state.
    pub fn reset(&mut self) {
        for control in &mut self.controls {
            control.reset();
        }
    }
}
