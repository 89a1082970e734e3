//! Validation error collection
//!
//! Field errors are keyed by the persisted document key of the offending
//! field (e.g. `nombreProyecto`), so they line up with stored data.

use std::collections::BTreeMap;
use thiserror::Error;

/// Message recorded for a required field that is empty or whitespace-only
pub const BLANK: &str = "can't be blank";

/// Validation errors collection
#[derive(Error, Debug, Default, Clone, PartialEq, Eq)]
#[error("Validation failed: {}", render(.errors, .base_errors))]
pub struct ValidationErrors {
    /// Field-specific errors: field key -> messages
    pub errors: BTreeMap<String, Vec<String>>,
    /// Errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    /// Record a missing required field
    pub fn add_missing(&mut self, field: impl Into<String>) {
        self.add(field, BLANK);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    /// Check if there are errors for a specific field
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Whether `field` was reported as missing
    pub fn is_missing(&self, field: &str) -> bool {
        self.errors
            .get(field)
            .is_some_and(|messages| messages.iter().any(|m| m == BLANK))
    }

    /// Get errors for a specific field
    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    /// Field keys with at least one error, in key order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }

    /// `Ok(())` when nothing was recorded, otherwise `Err(self)`
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn render(errors: &BTreeMap<String, Vec<String>>, base_errors: &[String]) -> String {
    let mut messages: Vec<String> = base_errors.to_vec();
    for (field, field_messages) in errors {
        messages.extend(field_messages.iter().map(|msg| format!("{} {}", field, msg)));
    }
    messages.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_is_reported() {
        let mut errors = ValidationErrors::new();
        errors.add_missing("nombreProyecto");

        assert!(errors.has_error("nombreProyecto"));
        assert!(errors.is_missing("nombreProyecto"));
        assert!(!errors.is_missing("descripcion"));
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["nombreProyecto"]);
    }

    #[test]
    fn test_merge_and_messages() {
        let mut a = ValidationErrors::new();
        a.add("precioProducto", "is not a number");

        let mut b = ValidationErrors::new();
        b.add_missing("precioProducto");
        b.add_base("record is locked");

        a.merge(b);
        assert_eq!(a.get("precioProducto").map(Vec::len), Some(2));
        assert_eq!(
            a.full_messages(),
            vec![
                "record is locked".to_string(),
                "precioProducto is not a number".to_string(),
                "precioProducto can't be blank".to_string(),
            ]
        );
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let mut errors = ValidationErrors::new();
        errors.add_missing("finalProyecto");
        let err = errors.into_result().unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: finalProyecto can't be blank");
    }
}
