//! Speedrun Intake WASM - browser bindings for the application form
//!
//! Wires the form engine to the page:
//! - `localStorage` for the live and submitted records
//! - `sessionStorage` for the access flag
//! - Native `confirm` / `alert` dialogs
//! - `Date.now()` for debounce windows
//!
//! ## Usage in JavaScript
//!
//! ```javascript
//! import init, { IntakeApp } from 'speedrun-intake-wasm';
//!
//! await init();
//!
//! const app = new IntakeApp(configYaml, JSON.stringify(controls));
//! if (!app.is_authenticated()) {
//!     app.authenticate(passwordInput.value);
//! }
//! app.start();
//!
//! textarea.addEventListener('input', e => {
//!     app.input(e.target.name, e.target.value);
//!     const deadline = app.next_deadline();
//!     if (deadline !== undefined) setTimeout(() => app.tick(), deadline - Date.now());
//! });
//! ```
//!
//! ## Build
//!
//! ```bash
//! wasm-pack build --target web --out-dir pkg
//! ```

mod host;

use intake::{
    CofounderManager, FormState, IntakeConfig, IntakeError, IntakeSession, KeyValueStore,
    MemoryStore, PasswordGate, RemoveOutcome, SubmitOutcome,
};
use serde_json::json;
use wasm_bindgen::prelude::*;

pub use host::{BrowserClock, BrowserPrompt, BrowserValidator, LocalStore, SessionFlagStore};

// Initialize panic hook for better error messages in browser console
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(err: IntakeError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn warn(message: &str) {
    web_sys::console::warn_1(&message.into());
}

// ============================================================================
// Types
// ============================================================================

/// Result of a submit attempt
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct SubmitResult {
    submitted: bool,
    cleared: bool,
    message: Option<String>,
}

#[wasm_bindgen]
impl SubmitResult {
    /// Whether the submitted record was written
    #[wasm_bindgen(getter)]
    pub fn submitted(&self) -> bool {
        self.submitted
    }

    /// Whether the form was reset afterwards
    #[wasm_bindgen(getter)]
    pub fn cleared(&self) -> bool {
        self.cleared
    }

    /// First validation message when the form was rejected
    #[wasm_bindgen(getter)]
    pub fn message(&self) -> Option<String> {
        self.message.clone()
    }
}

impl From<SubmitOutcome> for SubmitResult {
    fn from(outcome: SubmitOutcome) -> Self {
        match outcome {
            SubmitOutcome::Invalid(report) => Self {
                submitted: false,
                cleared: false,
                message: report.first_message().map(str::to_string),
            },
            SubmitOutcome::Submitted { cleared } => Self {
                submitted: true,
                cleared,
                message: None,
            },
        }
    }
}

// ============================================================================
// Application
// ============================================================================

/// One application form bound to the current page.
#[wasm_bindgen]
pub struct IntakeApp {
    session: IntakeSession,
    gate: Option<PasswordGate<SessionFlagStore>>,
}

#[wasm_bindgen]
impl IntakeApp {
    /// Build the form engine.
    ///
    /// # Arguments
    /// * `config_yaml` - Optional YAML overriding the defaults
    /// * `form_json` - JSON array of the page's static controls
    #[wasm_bindgen(constructor)]
    pub fn new(config_yaml: Option<String>, form_json: &str) -> Result<IntakeApp, JsValue> {
        #[cfg(feature = "console_error_panic_hook")]
        set_panic_hook();

        let (config, form) = parse_setup(config_yaml.as_deref(), form_json).map_err(to_js)?;

        let store: Box<dyn KeyValueStore> = match LocalStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                warn(&format!("{}; progress will not survive a reload", e));
                Box::new(MemoryStore::new())
            }
        };
        let gate = match SessionFlagStore::open() {
            Ok(flags) => Some(PasswordGate::new(flags, &config)),
            Err(e) => {
                warn(&e.to_string());
                None
            }
        };

        let session = IntakeSession::new(config, form, store, Box::new(BrowserPrompt))
            .with_clock(Box::new(BrowserClock))
            .with_validator(Box::new(BrowserValidator::default()));

        Ok(Self { session, gate })
    }

    // ------------------------------------------------------------------------
    // Access gate
    // ------------------------------------------------------------------------

    pub fn is_authenticated(&self) -> bool {
        self.gate.as_ref().is_some_and(|gate| gate.is_authenticated())
    }

    /// Check the shared password; rejects with the message to display.
    pub fn authenticate(&self, password: &str) -> Result<(), JsValue> {
        let gate = self
            .gate
            .as_ref()
            .ok_or_else(|| JsValue::from_str("Session storage unavailable"))?;
        gate.check_password(password).map_err(to_js)
    }

    pub fn logout(&self) -> Result<(), JsValue> {
        match &self.gate {
            Some(gate) => gate.logout().map_err(to_js),
            None => Ok(()),
        }
    }

    // ------------------------------------------------------------------------
    // Form events
    // ------------------------------------------------------------------------

    /// Initialize counters and restore saved progress. Returns whether
    /// anything was restored.
    pub fn start(&mut self) -> bool {
        self.session.start().is_some()
    }

    pub fn input(&mut self, name: &str, value: &str) -> Result<(), JsValue> {
        self.session.input(name, value).map_err(to_js)
    }

    pub fn commit(&mut self, name: &str) -> Result<(), JsValue> {
        self.session.commit(name).map_err(to_js)
    }

    pub fn set_checked(&mut self, name: &str, checked: bool) -> Result<(), JsValue> {
        self.session.set_checked(name, checked).map_err(to_js)
    }

    pub fn select_radio(&mut self, name: &str, value: &str) -> Result<(), JsValue> {
        self.session.select_radio(name, value).map_err(to_js)
    }

    /// Write the whole form now.
    pub fn save(&mut self) -> Result<(), JsValue> {
        self.session.save().map_err(to_js)
    }

    /// Append a co-founder group; returns its ordinal.
    pub fn add_cofounder(&mut self) -> Result<u32, JsValue> {
        self.session.add_cofounder().map_err(to_js)
    }

    /// Returns `"removed"`, `"cancelled"` or `"not_found"`.
    pub fn remove_cofounder(&mut self, ordinal: u32) -> Result<String, JsValue> {
        let outcome = self.session.remove_cofounder(ordinal).map_err(to_js)?;
        Ok(outcome_label(outcome).to_string())
    }

    /// Run debounced writes that are due.
    pub fn tick(&mut self) -> Result<u32, JsValue> {
        let writes = self.session.tick().map_err(to_js)?;
        Ok(writes as u32)
    }

    pub fn submit(&mut self) -> Result<SubmitResult, JsValue> {
        self.session.submit().map(SubmitResult::from).map_err(to_js)
    }

    // ------------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------------

    /// When the next debounced write is due (ms since epoch).
    pub fn next_deadline(&self) -> Option<f64> {
        self.session.next_deadline().map(|ms| ms as f64)
    }

    pub fn save_indicator_visible(&self) -> bool {
        self.session.save_indicator_visible()
    }

    /// Static controls as JSON.
    pub fn form_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.form()).map_err(|e| to_js(e.into()))
    }

    /// Co-founder groups as JSON, for rendering.
    pub fn cofounders_json(&self) -> String {
        groups_view(self.session.cofounders()).to_string()
    }

    /// Word counters keyed by field id.
    pub fn word_counts_json(&self) -> Result<String, JsValue> {
        let counts: serde_json::Map<String, serde_json::Value> = self
            .session
            .word_limits()
            .counts()
            .iter()
            .map(|(id, count)| {
                (
                    id.clone(),
                    json!({
                        "label": count.label(),
                        "count": count.count,
                        "limit": count.limit,
                        "state": count.state,
                    }),
                )
            })
            .collect();
        serde_json::to_string(&counts).map_err(|e| to_js(e.into()))
    }

    /// The record autosave would write right now.
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        self.session.snapshot().to_json().map_err(|e| to_js(e.into()))
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_setup(
    config_yaml: Option<&str>,
    form_json: &str,
) -> Result<(IntakeConfig, FormState), IntakeError> {
    let config = match config_yaml {
        Some(yaml) if !yaml.trim().is_empty() => IntakeConfig::from_yaml(yaml)?,
        _ => IntakeConfig::default(),
    };
    let form: FormState = serde_json::from_str(form_json)?;
    Ok((config, form))
}

fn outcome_label(outcome: RemoveOutcome) -> &'static str {
    match outcome {
        RemoveOutcome::Removed => "removed",
        RemoveOutcome::Cancelled => "cancelled",
        RemoveOutcome::NotFound => "not_found",
    }
}

fn groups_view(manager: &CofounderManager) -> serde_json::Value {
    let groups: Vec<serde_json::Value> = manager
        .groups()
        .iter()
        .map(|group| {
            let fields: Vec<serde_json::Value> = group
                .fields()
                .iter()
                .map(|field| {
                    json!({
                        "label": field.label.text,
                        "for": field.label.for_id,
                        "control": field.control,
                    })
                })
                .collect();
            json!({
                "ordinal": group.ordinal(),
                "heading": group.heading(),
                "remove": group.remove_argument(),
                "fields": fields,
            })
        })
        .collect();
    serde_json::Value::Array(groups)
}

/// Get the WASM module version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: &str = r#"[
        {"name": "companyName", "id": "companyName", "kind": "text", "required": true},
        {"name": "problem", "id": "problem", "kind": "textarea"},
        {"name": "stage", "id": "stage_idea", "kind": "radio", "value": "idea", "default_value": "idea"}
    ]"#;

    #[test]
    fn test_parse_setup_defaults() {
        let (config, form) = parse_setup(None, FORM).unwrap();

        assert_eq!(config.storage_key, "speedrunFormData");
        assert_eq!(form.controls().len(), 3);
        assert!(form.get("companyName").unwrap().required);
        assert_eq!(form.by_id("stage_idea").unwrap().value, "idea");
    }

    #[test]
    fn test_parse_setup_with_config() {
        let yaml = "debounce_ms: 250\nword_limits:\n  - field_id: problem\n    limit: 150\n";
        let (config, _) = parse_setup(Some(yaml), FORM).unwrap();

        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.word_limits[0].limit, 150);
        assert_eq!(config.save_indicator_ms, 2000);
    }

    #[test]
    fn test_parse_setup_rejects_bad_form() {
        let err = parse_setup(Some("   "), "{\"name\": ").unwrap_err();
        assert!(matches!(err, IntakeError::Serialization(_)));
    }

    #[test]
    fn test_groups_view() {
        let mut manager = CofounderManager::new();
        manager.add_group(None);
        manager.add_group(None);

        let view = groups_view(&manager);

        assert_eq!(view[1]["heading"], "Co-Founder 2");
        assert_eq!(view[1]["remove"], 2);
        assert_eq!(view[1]["fields"][0]["label"], "First Name *");
        assert_eq!(view[1]["fields"][0]["for"], "cofounder2_firstName");
        assert_eq!(view[1]["fields"][0]["control"]["name"], "cofounder2_firstName");
    }

    #[test]
    fn test_submit_result_from_outcome() {
        let result = SubmitResult::from(SubmitOutcome::Submitted { cleared: true });
        assert!(result.submitted && result.cleared);
        assert_eq!(outcome_label(RemoveOutcome::NotFound), "not_found");
    }
}

// ============================================================================
// WASM-specific Tests
// ============================================================================
