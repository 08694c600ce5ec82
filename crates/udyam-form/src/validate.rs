//! Schema integrity checks and validation of user input against the schema.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use crate::types::{Field, FieldType, FormSchema, SchemaError, SchemaResult};

/// Format accepted by `type="date"` inputs.
const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// A structural problem in a schema document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityIssue {
    /// A field points at a rule key that is not in `validation_rules`.
    DanglingRule {
        step: u32,
        field: String,
        rule: String,
    },
    /// A rule or field pattern does not compile.
    InvalidPattern { owner: String, reason: String },
    /// Two fields in one step share a name.
    DuplicateField { step: u32, field: String },
    /// Step indices are not 1, 2, 3, ... in order.
    StepOutOfSequence { position: usize, found: u32 },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingRule { step, field, rule } => {
                write!(f, "step {step}: field '{field}' references unknown rule '{rule}'")
            }
            Self::InvalidPattern { owner, reason } => {
                write!(f, "{owner}: pattern does not compile: {reason}")
            }
            Self::DuplicateField { step, field } => {
                write!(f, "step {step}: duplicate field '{field}'")
            }
            Self::StepOutOfSequence { position, found } => {
                write!(
                    f,
                    "step at position {position} has index {found}, expected {}",
                    position + 1
                )
            }
        }
    }
}

/// Report every structural problem in `schema`. Empty means the schema is sound.
pub fn check_integrity(schema: &FormSchema) -> Vec<IntegrityIssue> {
    let mut issues = Vec::new();

    for (position, step) in schema.steps.iter().enumerate() {
        if step.step as usize != position + 1 {
            issues.push(IntegrityIssue::StepOutOfSequence {
                position,
                found: step.step,
            });
        }

        let mut seen = HashSet::new();
        for field in &step.fields {
            if !seen.insert(field.name.as_str()) {
                issues.push(IntegrityIssue::DuplicateField {
                    step: step.step,
                    field: field.name.clone(),
                });
            }
            if let Some(rule) = &field.validation {
                if !schema.validation_rules.contains_key(rule) {
                    issues.push(IntegrityIssue::DanglingRule {
                        step: step.step,
                        field: field.name.clone(),
                        rule: rule.clone(),
                    });
                }
            }
            if let Some(pattern) = &field.pattern {
                if let Err(e) = compile_html_pattern(pattern) {
                    issues.push(IntegrityIssue::InvalidPattern {
                        owner: format!("field '{}'", field.name),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    for (key, rule) in &schema.validation_rules {
        if let Some(pattern) = &rule.pattern {
            if let Err(e) = Regex::new(pattern) {
                issues.push(IntegrityIssue::InvalidPattern {
                    owner: format!("rule '{key}'"),
                    reason: e.to_string(),
                });
            }
        }
    }

    issues
}

/// HTML `pattern` attributes match the whole value.
fn compile_html_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

/// Why a value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Missing,
    TooLong { max: u32, actual: usize },
    RuleMismatch { rule: String },
    PatternMismatch,
    InvalidDate,
}

/// A rejected value with the message the form would show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validates values against a schema with its patterns compiled once.
pub struct Validator<'a> {
    schema: &'a FormSchema,
    rules: HashMap<&'a str, Regex>,
    /// Compiled `pattern` attributes keyed by (step, field name).
    field_patterns: HashMap<(u32, &'a str), Regex>,
}

impl<'a> Validator<'a> {
    /// Compile every rule and field pattern in `schema`.
    pub fn new(schema: &'a FormSchema) -> SchemaResult<Self> {
        let mut rules = HashMap::new();
        for (key, rule) in &schema.validation_rules {
            if let Some(pattern) = &rule.pattern {
                let re = Regex::new(pattern).map_err(|e| SchemaError::InvalidRule {
                    key: key.clone(),
                    reason: e.to_string(),
                })?;
                rules.insert(key.as_str(), re);
            }
        }

        let mut field_patterns = HashMap::new();
        for step in &schema.steps {
            for field in &step.fields {
                if let Some(pattern) = &field.pattern {
                    let re =
                        compile_html_pattern(pattern).map_err(|e| SchemaError::InvalidRule {
                            key: field.name.clone(),
                            reason: e.to_string(),
                        })?;
                    field_patterns.insert((step.step, field.name.as_str()), re);
                }
            }
        }

        Ok(Self {
            schema,
            rules,
            field_patterns,
        })
    }

    /// Check one value for the named field. `Ok(None)` means it is accepted.
    ///
    /// The name must identify a single field across all steps; use
    /// [`check_step_value`](Self::check_step_value) when steps share names.
    pub fn check_value(&self, field_name: &str, value: &str) -> SchemaResult<Option<Violation>> {
        let mut matches = self.schema.steps.iter().flat_map(move |step| {
            step.fields
                .iter()
                .filter(move |f| f.name == field_name)
                .map(move |f| (step.step, f))
        });

        let (step, field) = matches
            .next()
            .ok_or_else(|| SchemaError::UnknownField(field_name.to_string()))?;
        if matches.next().is_some() {
            return Err(SchemaError::AmbiguousField(field_name.to_string()));
        }
        Ok(self.check_field(step, field, value))
    }

    /// Check one value for the named field of a given step.
    pub fn check_step_value(
        &self,
        step: u32,
        field_name: &str,
        value: &str,
    ) -> SchemaResult<Option<Violation>> {
        let field = self
            .schema
            .step(step)
            .ok_or(SchemaError::UnknownStep(step))?
            .fields
            .iter()
            .find(|f| f.name == field_name)
            .ok_or_else(|| SchemaError::UnknownField(field_name.to_string()))?;
        Ok(self.check_field(step, field, value))
    }

    /// Check a whole step submission. Required fields missing from `values`
    /// are reported, except conditional ones, which the form has not shown
    /// yet. Keys that are not fields of the step are ignored.
    pub fn check_step(
        &self,
        step: u32,
        values: &BTreeMap<String, String>,
    ) -> SchemaResult<Vec<Violation>> {
        let fields = &self
            .schema
            .step(step)
            .ok_or(SchemaError::UnknownStep(step))?
            .fields;

        let mut violations = Vec::new();
        for field in fields {
            let violation = match values.get(&field.name) {
                Some(value) => self.check_field(step, field, value),
                None if field.is_conditional() => None,
                None => self.check_field(step, field, ""),
            };
            violations.extend(violation);
        }
        Ok(violations)
    }

    fn check_field(&self, step: u32, field: &Field, value: &str) -> Option<Violation> {
        let rule = self.schema.rule_for(field);
        let rule_message = |fallback: String| rule.map(|r| r.message.clone()).unwrap_or(fallback);
        let reject = |kind: ViolationKind, message: String| {
            Some(Violation {
                field: field.name.clone(),
                kind,
                message,
            })
        };

        if value.is_empty() {
            if field.required {
                return reject(ViolationKind::Missing, format!("{} is required", field.label));
            }
            return None;
        }

        if let Some(max) = field.max_length {
            let actual = value.chars().count();
            if actual > max as usize {
                return reject(
                    ViolationKind::TooLong { max, actual },
                    format!("{} must be at most {max} characters", field.label),
                );
            }
        }

        if let Some(key) = field.validation.as_deref() {
            if let Some(re) = self.rules.get(key) {
                if !re.is_match(value) {
                    return reject(
                        ViolationKind::RuleMismatch {
                            rule: key.to_string(),
                        },
                        rule_message(format!("{} is invalid", field.label)),
                    );
                }
            }
        }

        if let Some(re) = self.field_patterns.get(&(step, field.name.as_str())) {
            if !re.is_match(value) {
                return reject(
                    ViolationKind::PatternMismatch,
                    rule_message(format!("{} has an invalid format", field.label)),
                );
            }
        }

        if field.field_type == FieldType::Date
            && NaiveDate::parse_from_str(value, DATE_INPUT_FORMAT).is_err()
        {
            return reject(
                ViolationKind::InvalidDate,
                rule_message(format!("{} must be a valid date", field.label)),
            );
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::assemble_schema;
    use crate::types::{Field, ValidationRule};

    fn submission(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_authored_schema_is_sound() {
        assert!(check_integrity(&assemble_schema()).is_empty());
    }

    #[test]
    fn test_dangling_rule_detected() {
        let mut schema = assemble_schema();
        schema.validation_rules.shift_remove("otp_format");
        let issues = check_integrity(&schema);
        assert_eq!(
            issues,
            vec![IntegrityIssue::DanglingRule {
                step: 1,
                field: "otp".to_string(),
                rule: "otp_format".to_string(),
            }]
        );
        assert_eq!(
            issues[0].to_string(),
            "step 1: field 'otp' references unknown rule 'otp_format'"
        );
    }

    #[test]
    fn test_structural_issues_detected() {
        let mut schema = assemble_schema();
        schema.steps[1].step = 5;
        let dup = schema.steps[0].fields[0].clone();
        schema.steps[0].fields.push(dup);
        schema
            .validation_rules
            .insert("broken".to_string(), ValidationRule::with_pattern("([", "x"));

        let issues = check_integrity(&schema);
        assert!(issues.contains(&IntegrityIssue::StepOutOfSequence {
            position: 1,
            found: 5
        }));
        assert!(issues.contains(&IntegrityIssue::DuplicateField {
            step: 1,
            field: "aadhaar_number".to_string()
        }));
        assert!(issues
            .iter()
            .any(|i| matches!(i, IntegrityIssue::InvalidPattern { owner, .. } if owner == "rule 'broken'")));
    }

    #[test]
    fn test_validator_rejects_bad_rule() {
        let mut schema = assemble_schema();
        schema
            .validation_rules
            .insert("broken".to_string(), ValidationRule::with_pattern("([", "x"));
        assert!(matches!(
            Validator::new(&schema),
            Err(SchemaError::InvalidRule { key, .. }) if key == "broken"
        ));
    }

    #[test]
    fn test_check_value_accepts_good_input() {
        let schema = assemble_schema();
        let v = Validator::new(&schema).unwrap();
        for (field, value) in [
            ("aadhaar_number", "123456789012"),
            ("mobile_number", "9876543210"),
            ("otp", "123456"),
            ("pan_number", "ABCDE1234F"),
            ("name_as_per_pan", "Asha Devi"),
            ("date_of_birth", "1990-04-21"),
        ] {
            assert_eq!(v.check_value(field, value).unwrap(), None, "{field}");
        }
    }

    #[test]
    fn test_rule_mismatch_uses_rule_message() {
        let schema = assemble_schema();
        let v = Validator::new(&schema).unwrap();
        let violation = v.check_value("mobile_number", "5876543210").unwrap().unwrap();
        assert_eq!(
            violation.kind,
            ViolationKind::RuleMismatch {
                rule: "mobile_format".to_string()
            }
        );
        assert_eq!(
            violation.message,
            "Mobile number must be 10 digits starting with 6-9"
        );
    }

    #[test]
    fn test_too_long_checked_before_rule() {
        let schema = assemble_schema();
        let v = Validator::new(&schema).unwrap();
        let violation = v.check_value("pan_number", "ABCDE12345F").unwrap().unwrap();
        assert_eq!(
            violation.kind,
            ViolationKind::TooLong {
                max: 10,
                actual: 11
            }
        );
    }

    #[test]
    fn test_empty_required_is_missing() {
        let schema = assemble_schema();
        let v = Validator::new(&schema).unwrap();
        let violation = v.check_value("aadhaar_number", "").unwrap().unwrap();
        assert_eq!(violation.kind, ViolationKind::Missing);
        assert_eq!(violation.message, "Aadhaar Number is required");
    }

    #[test]
    fn test_invalid_date() {
        let schema = assemble_schema();
        let v = Validator::new(&schema).unwrap();
        let violation = v.check_value("date_of_birth", "1990-02-30").unwrap().unwrap();
        assert_eq!(violation.kind, ViolationKind::InvalidDate);
        assert_eq!(violation.message, "Please select a valid date of birth");
    }

    #[test]
    fn test_field_pattern_is_anchored() {
        let mut schema = assemble_schema();
        let field = Field::new("code", "Code", FieldType::Text).pattern("[0-9]{3}");
        schema.steps[1].fields.push(field);
        let v = Validator::new(&schema).unwrap();
        assert_eq!(v.check_value("code", "123").unwrap(), None);
        let violation = v.check_value("code", "a1234").unwrap().unwrap();
        assert_eq!(violation.kind, ViolationKind::PatternMismatch);
        assert_eq!(violation.message, "Code has an invalid format");
    }

    #[test]
    fn test_unknown_field() {
        let schema = assemble_schema();
        let v = Validator::new(&schema).unwrap();
        assert!(matches!(
            v.check_value("gstin", "x"),
            Err(SchemaError::UnknownField(name)) if name == "gstin"
        ));
    }

    #[test]
    fn test_check_step_skips_absent_conditional() {
        let schema = assemble_schema();
        let v = Validator::new(&schema).unwrap();
        let values = submission(&[
            ("aadhaar_number", "123456789012"),
            ("mobile_number", "9876543210"),
        ]);
        assert!(v.check_step(1, &values).unwrap().is_empty());

        let values = submission(&[
            ("aadhaar_number", "123456789012"),
            ("mobile_number", "9876543210"),
            ("otp", "12ab56"),
        ]);
        let violations = v.check_step(1, &values).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "otp");
    }

    #[test]
    fn test_check_step_reports_missing_required() {
        let schema = assemble_schema();
        let v = Validator::new(&schema).unwrap();
        let values = submission(&[("pan_number", "ABCDE1234F"), ("extra", "ignored")]);
        let violations = v.check_step(2, &values).unwrap();
        let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["name_as_per_pan", "date_of_birth"]);
        assert!(violations.iter().all(|v| v.kind == ViolationKind::Missing));
    }

    #[test]
    fn test_check_step_unknown() {
        let schema = assemble_schema();
        let v = Validator::new(&schema).unwrap();
        assert!(matches!(
            v.check_step(3, &BTreeMap::new()),
            Err(SchemaError::UnknownStep(3))
        ));
    }
    #[test]
    fn test_shared_name_uses_own_step_pattern() {
        let mut schema = assemble_schema();
        schema.steps[0]
            .fields
            .push(Field::new("code", "Code", FieldType::Text));
        schema.steps[1]
            .fields
            .push(Field::new("code", "Code", FieldType::Text).pattern("[0-9]{3}"));
        assert!(check_integrity(&schema).is_empty());

        let v = Validator::new(&schema).unwrap();
        let values = submission(&[
            ("aadhaar_number", "123456789012"),
            ("mobile_number", "9876543210"),
            ("code", "abc"),
        ]);
        assert!(v.check_step(1, &values).unwrap().is_empty());
        assert_eq!(v.check_step_value(1, "code", "abc").unwrap(), None);

        let violation = v.check_step_value(2, "code", "abc").unwrap().unwrap();
        assert_eq!(violation.kind, ViolationKind::PatternMismatch);

        let values = submission(&[
            ("pan_number", "ABCDE1234F"),
            ("name_as_per_pan", "Asha Devi"),
            ("date_of_birth", "1990-04-21"),
            ("code", "abc"),
        ]);
        let violations = v.check_step(2, &values).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "code");
    }

    #[test]
    fn test_check_value_rejects_shared_name() {
        let mut schema = assemble_schema();
        schema.steps[0]
            .fields
            .push(Field::new("code", "Code", FieldType::Text));
        schema.steps[1]
            .fields
            .push(Field::new("code", "Code", FieldType::Text));
        let v = Validator::new(&schema).unwrap();
        assert!(matches!(
            v.check_value("code", "x"),
            Err(SchemaError::AmbiguousField(name)) if name == "code"
        ));
    }

    #[test]
    fn test_check_step_value_unknown_field_in_step() {
        let schema = assemble_schema();
        let v = Validator::new(&schema).unwrap();
        assert!(matches!(
            v.check_step_value(2, "otp", "123456"),
            Err(SchemaError::UnknownField(_))
        ));
    }
}
