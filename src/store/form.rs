//! Editable form state and its validation.
//!
//! Each resource declares its editable fields as a static schema of
//! [`FieldSpec`]s. [`FormState`] keeps one string per field in schema order
//! and serializes to the JSON object the API expects.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::search::Searchable;

pub const INVALID_EMAIL: &str = "Invalid email format.";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    /// Masked in the UI and never prefilled from a record.
    Secret,
}

/// One editable, required field.
#[derive(Copy, Clone, Debug)]
pub struct FieldSpec {
    /// Wire name, e.g. `codeId`.
    pub key: &'static str,
    /// Name used in the aggregated "... is required." message.
    pub label: &'static str,
    /// Per-field error shown when the value is blank.
    pub required: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn text(key: &'static str, label: &'static str, required: &'static str) -> Self {
        Self { key, label, required, kind: FieldKind::Text }
    }

    pub const fn email(key: &'static str, label: &'static str, required: &'static str) -> Self {
        Self { key, label, required, kind: FieldKind::Email }
    }

    pub const fn secret(key: &'static str, label: &'static str, required: &'static str) -> Self {
        Self { key, label, required, kind: FieldKind::Secret }
    }
}

/// Field key to error message; an empty message means the field is fine.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Aggregate result of [`validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validation {
    pub is_valid: bool,
    pub message: String,
}

#[derive(Clone, Debug)]
pub struct FormState {
    schema: &'static [FieldSpec],
    values: Vec<String>,
}

impl FormState {
    pub fn new(schema: &'static [FieldSpec]) -> Self {
        Self { schema, values: vec![String::new(); schema.len()] }
    }

    pub fn schema(&self) -> &'static [FieldSpec] {
        self.schema
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.position(key).map(|i| self.values[i].as_str())
    }

    /// Set field `key`. Returns `false` for keys outside the schema.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        match self.position(key) {
            Some(i) => {
                self.values[i] = value.into();
                true
            }
            None => false,
        }
    }

    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub fn value_at_mut(&mut self, index: usize) -> Option<&mut String> {
        self.values.get_mut(index)
    }

    pub fn reset(&mut self) {
        self.values.iter_mut().for_each(String::clear);
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(String::is_empty)
    }

    /// Copy every non-secret field from `record`; secrets are cleared.
    pub fn fill_from<T: Searchable>(&mut self, record: &T) {
        for (spec, value) in self.schema.iter().zip(self.values.iter_mut()) {
            *value = match spec.kind {
                FieldKind::Secret => String::new(),
                _ => record.field(spec.key).unwrap_or_default().to_string(),
            };
        }
    }

    /// Full body for create requests.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Body for update requests: blank fields are left out.
    pub fn to_patch(&self) -> Value {
        let map: Map<String, Value> = self
            .schema
            .iter()
            .zip(&self.values)
            .filter(|(_, v)| !v.trim().is_empty())
            .map(|(s, v)| (s.key.to_string(), Value::String(v.clone())))
            .collect();
        Value::Object(map)
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.schema.iter().position(|s| s.key == key)
    }
}

impl Serialize for FormState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.schema.len()))?;
        for (spec, value) in self.schema.iter().zip(&self.values) {
            map.serialize_entry(spec.key, value)?;
        }
        map.end()
    }
}

/// One empty entry per schema field.
pub fn empty_errors(schema: &'static [FieldSpec]) -> FieldErrors {
    schema.iter().map(|s| (s.key, String::new())).collect()
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Validate `form`, rewriting `errors` from scratch.
///
/// Every field is required. Email fields must also look like an address.
/// The message lists missing labels ("Name is required." / "Name, Email are
/// required.") and appends the email-format message when that check fails.
pub fn validate(form: &FormState, errors: &mut FieldErrors) -> Validation {
    errors.clear();
    errors.extend(empty_errors(form.schema));

    let mut missing: Vec<&str> = Vec::new();
    let mut bad_email = false;
    for (spec, raw) in form.schema.iter().zip(&form.values) {
        let value = raw.trim();
        if value.is_empty() {
            errors.insert(spec.key, spec.required.to_string());
            missing.push(spec.label);
        } else if spec.kind == FieldKind::Email && !is_valid_email(value) {
            errors.insert(spec.key, INVALID_EMAIL.to_string());
            bad_email = true;
        }
    }

    let mut parts = Vec::new();
    if !missing.is_empty() {
        let verb = if missing.len() > 1 { "are" } else { "is" };
        parts.push(format!("{} {} required.", missing.join(", "), verb));
    }
    if bad_email {
        parts.push(INVALID_EMAIL.to_string());
    }

    Validation { is_valid: parts.is_empty(), message: parts.join(" ") }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &[FieldSpec] = &[
        FieldSpec::text("name", "Name", "Name is required."),
        FieldSpec::email("email", "Email", "Email is required."),
        FieldSpec::secret("password", "Password", "Password is required."),
    ];

    #[test]
    fn serializes_in_schema_order_with_wire_names() {
        let mut form = FormState::new(SCHEMA);
        form.set("name", "Ann");
        let json = serde_json::to_string(&form).unwrap();
        assert_eq!(json, r#"{"name":"Ann","email":"","password":""}"#);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut form = FormState::new(SCHEMA);
        assert!(!form.set("nickname", "x"));
        assert_eq!(form.get("nickname"), None);
    }

    #[test]
    fn patch_skips_blank_fields() {
        let mut form = FormState::new(SCHEMA);
        form.set("email", "a@b.co");
        form.set("name", "   ");
        assert_eq!(form.to_patch(), serde_json::json!({ "email": "a@b.co" }));
    }

    #[test]
    fn single_missing_field_uses_is() {
        let mut form = FormState::new(SCHEMA);
        form.set("email", "a@b.co");
        form.set("password", "pw");
        let mut errors = FieldErrors::new();
        let v = validate(&form, &mut errors);
        assert!(!v.is_valid);
        assert_eq!(v.message, "Name is required.");
        assert_eq!(errors["name"], "Name is required.");
        assert_eq!(errors["email"], "");
    }

    #[test]
    fn whitespace_counts_as_missing() {
        let mut form = FormState::new(SCHEMA);
        form.set("name", "  \t");
        let mut errors = FieldErrors::new();
        let v = validate(&form, &mut errors);
        assert_eq!(v.message, "Name, Email, Password are required.");
    }

    #[test]
    fn email_check_applies_alongside_missing_fields() {
        let mut form = FormState::new(SCHEMA);
        form.set("email", "not-an-email");
        let mut errors = FieldErrors::new();
        let v = validate(&form, &mut errors);
        assert!(!v.is_valid);
        assert_eq!(v.message, "Name, Password are required. Invalid email format.");
        assert_eq!(errors["email"], INVALID_EMAIL);
    }

    #[test]
    fn revalidation_clears_stale_errors() {
        let mut form = FormState::new(SCHEMA);
        let mut errors = FieldErrors::new();
        validate(&form, &mut errors);
        form.set("name", "Ann");
        form.set("email", "ann@corp.io");
        form.set("password", "secret");
        let v = validate(&form, &mut errors);
        assert!(v.is_valid);
        assert_eq!(v.message, "");
        assert!(errors.values().all(String::is_empty));
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("@c.d"));
    }
}
