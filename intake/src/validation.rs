//! Form validity checking.
//!
//! [`FormValidator`] is the host's constraint check; [`ConstraintValidator`]
//! evaluates the same constraints a browser applies to the form's controls.

use std::collections::HashSet;

use regex::Regex;
use tracing::warn;

use crate::form::{Control, ControlKind};

/// Which constraint a control violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    ValueMissing,
    TypeMismatch,
    PatternMismatch,
}

/// A single failed constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub name: String,
    pub kind: ViolationKind,
    pub message: String,
}

/// Every constraint that failed, in control order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidityReport {
    pub violations: Vec<Violation>,
}

impl ValidityReport {
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// The message a browser would show first.
    pub fn first_message(&self) -> Option<&str> {
        self.violations.first().map(|v| v.message.as_str())
    }
}

/// Validity-check capability.
pub trait FormValidator {
    /// Check every control; `Err` carries the failures.
    fn check_validity(&self, controls: &[&Control]) -> Result<(), ValidityReport>;

    /// Surface a failed check to the user.
    fn report_validity(&self, report: &ValidityReport);
}

/// Built-in required / type / pattern constraints.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintValidator;

impl ConstraintValidator {
    fn check_control(control: &Control) -> Option<Violation> {
        let value = control.value.trim();
        let violation = |kind, message: &str| {
            Some(Violation {
                name: control.name.clone(),
                kind,
                message: message.to_string(),
            })
        };

        match control.kind {
            ControlKind::Checkbox => {
                if control.required && !control.checked {
                    return violation(
                        ViolationKind::ValueMissing,
                        "Please check this box if you want to proceed.",
                    );
                }
                return None;
            }
            ControlKind::Radio => return None,
            _ => {}
        }

        if value.is_empty() {
            if control.required {
                return violation(ViolationKind::ValueMissing, "Please fill out this field.");
            }
            return None;
        }

        match control.kind {
            ControlKind::Email if !is_email(value) => {
                return violation(ViolationKind::TypeMismatch, "Please enter an email address.");
            }
            ControlKind::Url if url::Url::parse(value).is_err() => {
                return violation(ViolationKind::TypeMismatch, "Please enter a URL.");
            }
            _ => {}
        }

        if let Some(pattern) = &control.pattern {
            // Browsers ignore patterns that fail to compile.
            if let Ok(re) = Regex::new(&format!("^(?:{})$", pattern)) {
                if !re.is_match(&control.value) {
                    return violation(
                        ViolationKind::PatternMismatch,
                        "Please match the requested format.",
                    );
                }
            }
        }

        None
    }
}

impl FormValidator for ConstraintValidator {
    fn check_validity(&self, controls: &[&Control]) -> Result<(), ValidityReport> {
        let mut report = ValidityReport::default();

        for control in controls {
            if let Some(violation) = Self::check_control(control) {
                report.violations.push(violation);
            }
        }

        // A required radio group needs one checked option.
        let mut seen = HashSet::new();
        for control in controls.iter().filter(|c| c.kind == ControlKind::Radio) {
            if !seen.insert(control.name.as_str()) {
                continue;
            }
            let group_required = controls
                .iter()
                .any(|c| c.kind == ControlKind::Radio && c.name == control.name && c.required);
            let selected = controls
                .iter()
                .any(|c| c.kind == ControlKind::Radio && c.name == control.name && c.checked);
            if group_required && !selected {
                report.violations.push(Violation {
                    name: control.name.clone(),
                    kind: ViolationKind::ValueMissing,
                    message: "Please select one of these options.".to_string(),
                });
            }
        }

        if report.is_empty() {
            Ok(())
        } else {
            Err(report)
        }
    }

    fn report_validity(&self, report: &ValidityReport) {
        for violation in &report.violations {
            warn!(field = %violation.name, kind = ?violation.kind, "{}", violation.message);
        }
    }
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace)
        && !domain.contains('@')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(controls: &[Control]) -> Result<(), ValidityReport> {
        let refs: Vec<&Control> = controls.iter().collect();
        ConstraintValidator.check_validity(&refs)
    }

    #[test]
    fn test_required_text() {
        let mut name = Control::new("companyName", ControlKind::Text).required();
        name.value = "   ".to_string();

        let report = check(&[name.clone()]).unwrap_err();
        assert_eq!(report.violations[0].kind, ViolationKind::ValueMissing);

        name.value = "Acme".to_string();
        assert!(check(&[name]).is_ok());
    }

    #[test]
    fn test_optional_empty_skips_type_checks() {
        let phone = Control::new("cofounder1_phone", ControlKind::Tel).with_pattern("[0-9]+");
        let email = Control::new("email", ControlKind::Email);
        assert!(check(&[phone, email]).is_ok());
    }

    #[test]
    fn test_email_and_url() {
        let email = Control::new("email", ControlKind::Email).with_default("not-an-email");
        let linkedin = Control::new("linkedIn", ControlKind::Url).with_default("linkedin.com/in/ada");

        let report = check(&[email, linkedin]).unwrap_err();
        assert_eq!(report.violations.len(), 2);
        assert!(report.violations.iter().all(|v| v.kind == ViolationKind::TypeMismatch));

        let email = Control::new("email", ControlKind::Email).with_default("ada@example.com");
        let linkedin = Control::new("linkedIn", ControlKind::Url)
            .with_default("https://www.linkedin.com/in/ada");
        assert!(check(&[email, linkedin]).is_ok());
    }

    #[test]
    fn test_pattern_matches_whole_value() {
        let zip = Control::new("zip", ControlKind::Text)
            .with_pattern("[0-9]{5}")
            .with_default("123456");
        let report = check(&[zip]).unwrap_err();
        assert_eq!(report.violations[0].kind, ViolationKind::PatternMismatch);

        let broken = Control::new("code", ControlKind::Text)
            .with_pattern("([")
            .with_default("anything");
        assert!(check(&[broken]).is_ok());
    }

    #[test]
    fn test_required_radio_group_and_checkbox() {
        let mut idea = Control::radio("stage", "idea").required();
        let mvp = Control::radio("stage", "mvp");
        let terms = Control::new("terms", ControlKind::Checkbox).required();

        let report = check(&[idea.clone(), mvp.clone(), terms]).unwrap_err();
        assert_eq!(report.violations.len(), 2);
        assert_eq!(report.first_message(), Some("Please check this box if you want to proceed."));

        idea.checked = true;
        let terms = Control::new("terms", ControlKind::Checkbox)
            .required()
            .with_default_checked(true);
        assert!(check(&[idea, mvp, terms]).is_ok());
    }
}
