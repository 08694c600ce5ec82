//! Schema of the two-step Udyam registration form: fields,
//! validation rules, page retrieval with fallback, and JSON persistence.

pub mod builder;
pub mod fetch;
pub mod fields;
pub mod storage;
pub mod survey;
pub mod types;
pub mod validate;

pub use builder::{assemble_schema, BuildOutcome, FormSchemaBuilder, SchemaBuild};
pub use fetch::{HttpPageSource, PageSource, RetrievalError, StaticPageSource, UDYAM_FORM_URL};
pub use storage::{load, persist, DEFAULT_SCHEMA_FILE};
pub use survey::{survey_page, PageSurvey};
pub use types::*;
pub use validate::{check_integrity, IntegrityIssue, Validator, Violation, ViolationKind};
