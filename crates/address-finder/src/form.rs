//! Address form presentation model
//!
//! Holds the editable fields, sanitizes postal code input, and pre-fills the
//! address fields from controller updates. It knows nothing about terminals;
//! the binary renders it.

use crate::controller::LookupState;
use crate::resolver::AddressRecord;
use std::fmt;
use tokio::sync::watch;

pub const POSTAL_CODE_LENGTH: usize = 6;
pub const INVALID_POSTAL_CODE_MESSAGE: &str = "Please enter a valid 6-digit postal code";

/// Building name OneMap sends when there is none
const NO_BUILDING: &str = "NIL";

/// Keep only ASCII digits, at most [`POSTAL_CODE_LENGTH`] of them
pub fn sanitize_postal_code(input: &str) -> String {
    input
        .chars()
        .filter(char::is_ascii_digit)
        .take(POSTAL_CODE_LENGTH)
        .collect()
}

/// Exactly six ASCII digits
pub fn is_valid_postal_code(code: &str) -> bool {
    code.len() == POSTAL_CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}

/// Combined "{block} {street}" line
pub fn block_street(record: &AddressRecord) -> String {
    format!("{} {}", record.block_number, record.street_name)
}

/// Building name as shown to the user; the `NIL` sentinel becomes empty
pub fn building_display(building_name: &str) -> &str {
    if building_name == NO_BUILDING {
        ""
    } else {
        building_name
    }
}

/// Postal code rejected before any lookup is attempted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub postal_code: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(INVALID_POSTAL_CODE_MESSAGE)
    }
}

impl std::error::Error for ValidationError {}

/// Blocking notification for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: &'static str,
    pub message: String,
}

impl Alert {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: "Error",
            message: message.into(),
        }
    }
}

impl From<&ValidationError> for Alert {
    fn from(err: &ValidationError) -> Self {
        Self::error(err.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub postal_code: String,
    pub block_street: String,
    pub building_name: String,
    /// Only ever entered by the user
    pub unit_number: String,
}

/// One form session bound to a lookup controller's updates
pub struct AddressForm {
    fields: FormFields,
    state: LookupState,
    updates: watch::Receiver<LookupState>,
}

impl AddressForm {
    pub fn new(mut updates: watch::Receiver<LookupState>) -> Self {
        let state = updates.borrow_and_update().clone();
        Self {
            fields: FormFields::default(),
            state,
            updates,
        }
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// Last lookup state the form has seen
    pub fn state(&self) -> &LookupState {
        &self.state
    }

    pub fn postal_code(&self) -> &str {
        &self.fields.postal_code
    }

    /// Replace the postal code with the sanitized form of `input`
    pub fn set_postal_code(&mut self, input: &str) {
        self.fields.postal_code = sanitize_postal_code(input);
    }

    pub fn set_block_street(&mut self, value: impl Into<String>) {
        self.fields.block_street = value.into();
    }

    pub fn set_building_name(&mut self, value: impl Into<String>) {
        self.fields.building_name = value.into();
    }

    pub fn set_unit_number(&mut self, value: impl Into<String>) {
        self.fields.unit_number = value.into();
    }

    /// Inline hint shown under a non-empty, invalid postal code
    pub fn postal_code_hint(&self) -> Option<&'static str> {
        let code = self.postal_code();
        if !code.is_empty() && !is_valid_postal_code(code) {
            Some(INVALID_POSTAL_CODE_MESSAGE)
        } else {
            None
        }
    }

    /// Whether the find button is enabled
    pub fn can_submit(&self) -> bool {
        is_valid_postal_code(self.postal_code()) && !self.state.is_loading()
    }

    /// Postal code to look up, or the reason it cannot be submitted
    pub fn submit(&self) -> Result<String, ValidationError> {
        let code = self.postal_code();
        if !is_valid_postal_code(code) {
            return Err(ValidationError {
                postal_code: code.to_string(),
            });
        }
        Ok(code.to_string())
    }

    /// Apply the latest controller state, if it changed since the last call.
    ///
    /// A resolved address overwrites the block/street and building fields.
    /// A failure yields its alert once; calling again without a new
    /// transition yields nothing.
    pub fn sync(&mut self) -> Option<Alert> {
        if !matches!(self.updates.has_changed(), Ok(true)) {
            return None;
        }
        self.state = self.updates.borrow_and_update().clone();

        match &self.state {
            LookupState::Resolved(record) => {
                self.fields.block_street = block_street(record);
                self.fields.building_name = building_display(&record.building_name).to_string();
                None
            }
            LookupState::Failed(message) => Some(Alert::error(message.clone())),
            LookupState::Idle | LookupState::Loading => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(building: &str) -> AddressRecord {
        AddressRecord {
            block_number: "78".to_string(),
            street_name: "LORONG LIMAU".to_string(),
            building_name: building.to_string(),
            full_address: "78 LORONG LIMAU SINGAPORE 320078".to_string(),
            postal_code: "320078".to_string(),
        }
    }

    #[test]
    fn test_sanitize_strips_non_digits() {
        assert_eq!(sanitize_postal_code("32-00 78"), "320078");
        assert_eq!(sanitize_postal_code("S320078"), "320078");
        assert_eq!(sanitize_postal_code("abc"), "");
    }

    #[test]
    fn test_sanitize_caps_length() {
        assert_eq!(sanitize_postal_code("3200781234"), "320078");
    }

    #[test]
    fn test_sanitize_drops_non_ascii_digits() {
        assert_eq!(sanitize_postal_code("٣٢٠٠٧٨"), "");
        assert_eq!(sanitize_postal_code("３２0078"), "0078");
    }

    #[test]
    fn test_validation() {
        assert!(is_valid_postal_code("320078"));
        assert!(is_valid_postal_code("000000"));
        assert!(!is_valid_postal_code("32007"));
        assert!(!is_valid_postal_code("3200781"));
        assert!(!is_valid_postal_code("32007a"));
        assert!(!is_valid_postal_code(""));
        assert!(!is_valid_postal_code("32 078"));
    }

    #[test]
    fn test_building_sentinel() {
        assert_eq!(building_display("NIL"), "");
        assert_eq!(building_display("ION ORCHARD"), "ION ORCHARD");
        assert_eq!(building_display("nil"), "nil");
    }

    #[test]
    fn test_hint_only_for_partial_input() {
        let (_tx, rx) = watch::channel(LookupState::Idle);
        let mut form = AddressForm::new(rx);
        assert!(form.postal_code_hint().is_none());

        form.set_postal_code("3200");
        assert_eq!(form.postal_code_hint(), Some(INVALID_POSTAL_CODE_MESSAGE));
        assert!(!form.can_submit());

        form.set_postal_code("320078");
        assert!(form.postal_code_hint().is_none());
        assert!(form.can_submit());
    }

    #[test]
    fn test_invalid_code_blocks_submission() {
        let (_tx, rx) = watch::channel(LookupState::Idle);
        let mut form = AddressForm::new(rx);
        form.set_postal_code("12a45");

        let err = form.submit().unwrap_err();
        assert_eq!(err.postal_code, "1245");
        assert_eq!(
            Alert::from(&err).message,
            "Please enter a valid 6-digit postal code"
        );
    }

    #[test]
    fn test_submit_disabled_while_loading() {
        let (tx, rx) = watch::channel(LookupState::Idle);
        let mut form = AddressForm::new(rx);
        form.set_postal_code("320078");

        tx.send_replace(LookupState::Loading);
        form.sync();

        assert!(!form.can_submit());
        assert_eq!(form.submit().unwrap(), "320078");
    }

    #[test]
    fn test_resolved_prefills_fields() {
        let (tx, rx) = watch::channel(LookupState::Idle);
        let mut form = AddressForm::new(rx);
        form.set_postal_code("320078");
        form.set_unit_number("#01-02");

        tx.send_replace(LookupState::Resolved(record("NIL")));
        assert!(form.sync().is_none());

        let fields = form.fields();
        assert_eq!(fields.block_street, "78 LORONG LIMAU");
        assert_eq!(fields.building_name, "");
        assert_eq!(fields.unit_number, "#01-02");
    }

    #[test]
    fn test_resolved_keeps_real_building_name() {
        let (tx, rx) = watch::channel(LookupState::Idle);
        let mut form = AddressForm::new(rx);

        tx.send_replace(LookupState::Resolved(record("LIMAU COURT")));
        form.sync();

        assert_eq!(form.fields().building_name, "LIMAU COURT");
    }

    #[test]
    fn test_failure_alerts_once() {
        let (tx, rx) = watch::channel(LookupState::Idle);
        let mut form = AddressForm::new(rx);

        tx.send_replace(LookupState::Failed(
            "No address found for this postal code".to_string(),
        ));

        let alert = form.sync().unwrap();
        assert_eq!(alert.title, "Error");
        assert_eq!(alert.message, "No address found for this postal code");
        assert!(form.sync().is_none());
        assert!(form.state().has_error());
    }

    #[test]
    fn test_repeated_failure_alerts_again() {
        let (tx, rx) = watch::channel(LookupState::Idle);
        let mut form = AddressForm::new(rx);
        let failed = LookupState::Failed("Failed to fetch address information".to_string());

        tx.send_replace(failed.clone());
        assert!(form.sync().is_some());

        tx.send_replace(LookupState::Loading);
        form.sync();
        tx.send_replace(failed);
        assert!(form.sync().is_some());
    }

    #[test]
    fn test_user_edits_survive_until_next_resolution() {
        let (tx, rx) = watch::channel(LookupState::Idle);
        let mut form = AddressForm::new(rx);

        tx.send_replace(LookupState::Resolved(record("NIL")));
        form.sync();
        form.set_block_street("78A LORONG LIMAU");
        form.sync();
        assert_eq!(form.fields().block_street, "78A LORONG LIMAU");

        tx.send_replace(LookupState::Idle);
        form.sync();
        assert_eq!(form.fields().block_street, "78A LORONG LIMAU");
    }
}
