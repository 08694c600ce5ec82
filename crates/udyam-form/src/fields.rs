//! Statically authored field and rule definitions for the two form steps.
//!
//! The portal renders its inputs from server-side state, so the markup
//! fetched by [`crate::fetch`] does not feed these lists. They are the same
//! on the live and fallback paths.

use indexmap::IndexMap;

use crate::types::{Field, FieldType, Step, ValidationRule};

/// Title of step 1.
pub const AADHAAR_STEP_TITLE: &str = "Aadhaar Verification";

/// Title of step 2.
pub const PAN_STEP_TITLE: &str = "PAN Verification";

pub const AADHAAR_FORMAT: &str = "aadhaar_format";
pub const MOBILE_FORMAT: &str = "mobile_format";
pub const OTP_FORMAT: &str = "otp_format";
pub const PAN_FORMAT: &str = "pan_format";
pub const NAME_FORMAT: &str = "name_format";
pub const DATE_FORMAT: &str = "date_format";

/// Fields for step 1: Aadhaar number, mobile number, and the OTP box.
pub fn aadhaar_step_fields() -> Vec<Field> {
    vec![
        Field::new("aadhaar_number", "Aadhaar Number", FieldType::Text)
            .required()
            .placeholder("Enter 12-digit Aadhaar Number")
            .validation(AADHAAR_FORMAT)
            .max_length(12),
        Field::new("mobile_number", "Mobile Number", FieldType::Tel)
            .required()
            .placeholder("Enter 10-digit Mobile Number")
            .validation(MOBILE_FORMAT)
            .max_length(10),
        Field::new("otp", "OTP", FieldType::Text)
            .required()
            .placeholder("Enter 6-digit OTP")
            .validation(OTP_FORMAT)
            .max_length(6)
            .conditional(),
    ]
}

/// Fields for step 2: PAN number, name as per PAN, date of birth.
pub fn pan_step_fields() -> Vec<Field> {
    vec![
        Field::new("pan_number", "PAN Number", FieldType::Text)
            .required()
            .placeholder("Enter PAN Number (e.g., ABCDE1234F)")
            .validation(PAN_FORMAT)
            .max_length(10)
            .pattern("[A-Za-z]{5}[0-9]{4}[A-Za-z]{1}"),
        Field::new("name_as_per_pan", "Name as per PAN", FieldType::Text)
            .required()
            .placeholder("Enter name as per PAN card")
            .validation(NAME_FORMAT),
        Field::new("date_of_birth", "Date of Birth", FieldType::Date)
            .required()
            .validation(DATE_FORMAT),
    ]
}

/// The six named rules referenced by the step fields, in authored order.
pub fn validation_rules() -> IndexMap<String, ValidationRule> {
    [
        (
            AADHAAR_FORMAT,
            ValidationRule::with_pattern(
                "^[0-9]{12}$",
                "Aadhaar number must be exactly 12 digits",
            ),
        ),
        (
            MOBILE_FORMAT,
            ValidationRule::with_pattern(
                "^[6-9][0-9]{9}$",
                "Mobile number must be 10 digits starting with 6-9",
            ),
        ),
        (
            OTP_FORMAT,
            ValidationRule::with_pattern("^[0-9]{6}$", "OTP must be exactly 6 digits"),
        ),
        (
            PAN_FORMAT,
            ValidationRule::with_pattern(
                "^[A-Za-z]{5}[0-9]{4}[A-Za-z]{1}$",
                "PAN format: 5 letters, 4 numbers, 1 letter (e.g., ABCDE1234F)",
            ),
        ),
        (
            NAME_FORMAT,
            ValidationRule::with_pattern(
                r"^[a-zA-Z\s]{2,50}$",
                "Name should contain only letters and spaces (2-50 characters)",
            ),
        ),
        (
            DATE_FORMAT,
            ValidationRule::message_only("Please select a valid date of birth"),
        ),
    ]
    .into_iter()
    .map(|(key, rule)| (key.to_string(), rule))
    .collect()
}

/// Both steps, numbered from 1.
pub fn steps() -> Vec<Step> {
    vec![
        Step {
            step: 1,
            title: AADHAAR_STEP_TITLE.to_string(),
            fields: aadhaar_step_fields(),
        },
        Step {
            step: 2,
            title: PAN_STEP_TITLE.to_string(),
            fields: pan_step_fields(),
        },
    ]
}
