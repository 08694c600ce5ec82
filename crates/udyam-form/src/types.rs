//! Core types for the Udyam registration form schema.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The full two-step form schema, as written to `udyam_form_schema.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
    /// Form steps in display order.
    pub steps: Vec<Step>,
    /// Named validation rules in authored order, referenced by [`Field::validation`].
    pub validation_rules: IndexMap<String, ValidationRule>,
}

impl FormSchema {
    /// Number of steps in the form.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Total number of fields across all steps.
    pub fn field_count(&self) -> usize {
        self.steps.iter().map(|s| s.fields.len()).sum()
    }

    /// Look up a step by its 1-based index.
    pub fn step(&self, index: u32) -> Option<&Step> {
        self.steps.iter().find(|s| s.step == index)
    }

    /// Find a field by name in any step.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.steps
            .iter()
            .flat_map(|s| s.fields.iter())
            .find(|f| f.name == name)
    }

    /// Resolve the rule a field points at, if it has one and it exists.
    pub fn rule_for(&self, field: &Field) -> Option<&ValidationRule> {
        field
            .validation
            .as_deref()
            .and_then(|key| self.validation_rules.get(key))
    }
}

/// One page of the multi-step form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// 1-based step index.
    pub step: u32,
    /// Heading shown above the step.
    pub title: String,
    /// Fields in display order.
    pub fields: Vec<Field>,
}

/// A single input on the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Input `name`, unique within its step.
    pub name: String,
    /// Display label.
    pub label: String,
    /// HTML input type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether the form rejects an empty value.
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Key into [`FormSchema::validation_rules`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<String>,
    #[serde(
        rename = "maxLength",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub max_length: Option<u32>,
    /// HTML `pattern` attribute, duplicated from the rule for client-side checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Set when the field only appears after earlier input has been submitted
    /// (the OTP box shows up once Aadhaar and mobile are accepted).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional: Option<bool>,
}

impl Field {
    /// Start a field with the attributes every field carries.
    pub fn new(name: &str, label: &str, field_type: FieldType) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            field_type,
            required: false,
            placeholder: None,
            validation: None,
            max_length: None,
            pattern: None,
            conditional: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn placeholder(mut self, text: &str) -> Self {
        self.placeholder = Some(text.to_string());
        self
    }

    pub fn validation(mut self, rule_key: &str) -> Self {
        self.validation = Some(rule_key.to_string());
        self
    }

    pub fn max_length(mut self, len: u32) -> Self {
        self.max_length = Some(len);
        self
    }

    pub fn pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }

    pub fn conditional(mut self) -> Self {
        self.conditional = Some(true);
        self
    }

    /// True when the field is marked conditional.
    pub fn is_conditional(&self) -> bool {
        self.conditional.unwrap_or(false)
    }
}

/// HTML input types used on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Tel,
    Date,
}

impl FieldType {
    /// The value of the HTML `type` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Tel => "tel",
            Self::Date => "date",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named validation rule: a regex plus the message shown when it fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRule {
    /// Anchored regex. `None` means the rule relies on the input type alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    pub message: String,
}

impl ValidationRule {
    pub fn with_pattern(pattern: &str, message: &str) -> Self {
        Self {
            pattern: Some(pattern.to_string()),
            message: message.to_string(),
        }
    }

    pub fn message_only(message: &str) -> Self {
        Self {
            pattern: None,
            message: message.to_string(),
        }
    }
}

/// Errors that can occur while persisting, loading, or checking a schema.
#[derive(thiserror::Error, Debug)]
pub enum SchemaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid rule '{key}': {reason}")]
    InvalidRule { key: String, reason: String },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field name '{0}' is used in more than one step")]
    AmbiguousField(String),

    #[error("Unknown step: {0}")]
    UnknownStep(u32),
}

/// Convenience result type.
pub type SchemaResult<T> = Result<T, SchemaError>;
