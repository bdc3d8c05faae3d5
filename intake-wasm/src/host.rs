//! Browser implementations of the engine's host capabilities.

use chrono::{DateTime, Utc};
use intake::{
    Clock, ConstraintValidator, Control, FormValidator, KeyValueStore, SessionStore, StoreError,
    UserPrompt, ValidityReport,
};
use wasm_bindgen::JsValue;
use web_sys::{Storage, Window};

fn window() -> Result<Window, StoreError> {
    web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".to_string()))
}

fn describe(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

fn require(which: &str, found: Result<Option<Storage>, JsValue>) -> Result<Storage, StoreError> {
    match found {
        Ok(Some(storage)) => Ok(storage),
        Ok(None) => Err(StoreError::Unavailable(format!("{} is disabled", which))),
        Err(e) => Err(StoreError::Unavailable(describe(e))),
    }
}

fn read(storage: &Storage, key: &str) -> Result<Option<String>, StoreError> {
    storage.get_item(key).map_err(|e| StoreError::ReadFailed {
        key: key.to_string(),
        reason: describe(e),
    })
}

fn write(storage: &Storage, key: &str, value: &str) -> Result<(), StoreError> {
    storage.set_item(key, value).map_err(|e| StoreError::WriteFailed {
        key: key.to_string(),
        reason: describe(e),
    })
}

fn delete(storage: &Storage, key: &str) -> Result<(), StoreError> {
    storage.remove_item(key).map_err(|e| StoreError::WriteFailed {
        key: key.to_string(),
        reason: describe(e),
    })
}

// ============================================================================
// Storage
// ============================================================================

/// `window.localStorage`
pub struct LocalStore {
    storage: Storage,
}

impl LocalStore {
    pub fn open() -> Result<Self, StoreError> {
        let storage = require("localStorage", window()?.local_storage())?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        read(&self.storage, key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        write(&self.storage, key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        delete(&self.storage, key)
    }
}

/// `window.sessionStorage`, holding the access flag.
pub struct SessionFlagStore {
    storage: Storage,
}

impl SessionFlagStore {
    pub fn open() -> Result<Self, StoreError> {
        let storage = require("sessionStorage", window()?.session_storage())?;
        Ok(Self { storage })
    }
}

impl SessionStore for SessionFlagStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        read(&self.storage, key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        write(&self.storage, key, value)
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        delete(&self.storage, key)
    }
}

// ============================================================================
// Dialogs, time, validity
// ============================================================================

/// Native `confirm` / `alert` dialogs.
#[derive(Debug, Default)]
pub struct BrowserPrompt;

impl UserPrompt for BrowserPrompt {
    fn confirm(&self, message: &str) -> bool {
        // No window means nobody to ask.
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    fn alert(&self, message: &str) {
        if let Some(w) = web_sys::window() {
            let _ = w.alert_with_message(message);
        }
    }
}

/// `Date.now()`
#[derive(Debug, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
    }
}

/// Constraint check that reports its first failure the way the browser does.
#[derive(Debug, Default)]
pub struct BrowserValidator {
    inner: ConstraintValidator,
}

impl FormValidator for BrowserValidator {
    fn check_validity(&self, controls: &[&Control]) -> Result<(), ValidityReport> {
        self.inner.check_validity(controls)
    }

    fn report_validity(&self, report: &ValidityReport) {
        for violation in &report.violations {
            web_sys::console::warn_1(
                &format!("{}: {}", violation.name, violation.message).into(),
            );
        }
        if let Some(message) = report.first_message() {
            BrowserPrompt.alert(message);
        }
    }
}
