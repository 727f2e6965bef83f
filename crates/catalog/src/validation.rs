//! Request-body validation.
//!
//! Violations are collected so one response reports every problem at once.

use taproom_core::{DomainError, DomainResult};

use crate::field::Field;

#[derive(Debug, Default)]
pub struct Violations(Vec<String>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, msg: impl Into<String>) {
        self.0.push(msg.into());
    }

    /// Field must be present, non-blank and within `min..=max` characters.
    pub fn required_text(&mut self, field: &str, value: &Field<String>, min: usize, max: usize) {
        match value.as_option() {
            None => self.push(format!("{field}: must not be blank")),
            Some(s) => self.non_blank_bounds(field, s, min, max),
        }
    }

    /// When present, the field must be non-blank and within `min..=max` characters.
    pub fn optional_non_blank_text(&mut self, field: &str, value: &Field<String>, min: usize, max: usize) {
        if let Some(s) = value.as_option() {
            self.non_blank_bounds(field, s, min, max);
        }
    }

    /// When present, the field must be within `min..=max` characters.
    /// Whitespace counts toward the length.
    pub fn optional_text(&mut self, field: &str, value: &Field<String>, min: usize, max: usize) {
        if let Some(s) = value.as_option() {
            self.length_bounds(field, s, min, max);
        }
    }

    pub fn required_present<T>(&mut self, field: &str, value: &Field<T>) {
        if !value.is_value() {
            self.push(format!("{field}: is required"));
        }
    }

    /// Record the error from a parse step, if any.
    pub fn check<T>(&mut self, result: DomainResult<T>) {
        if let Err(e) = result {
            match e {
                DomainError::Validation(msg) => self.push(msg),
                other => self.push(other.to_string()),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> DomainResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation(self.0.join("; ")))
        }
    }

    fn non_blank_bounds(&mut self, field: &str, s: &str, min: usize, max: usize) {
        if s.trim().is_empty() {
            self.push(format!("{field}: must not be blank"));
            return;
        }
        self.length_bounds(field, s, min, max);
    }

    fn length_bounds(&mut self, field: &str, s: &str, min: usize, max: usize) {
        let len = s.chars().count();
        if len < min || len > max {
            self.push(format!("{field}: length must be between {min} and {max}"));
        }
    }
}
