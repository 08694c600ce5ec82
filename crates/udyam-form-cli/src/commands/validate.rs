//! `udyam-form validate`: check a value against a field of the schema.

use anyhow::{bail, Context, Result};
use udyam_form::{assemble_schema, load, FormSchema, Validator};

use crate::config;
use crate::output;

/// Load the schema at `schema_path`, or the built-in one when no file exists.
fn schema_for(schema_path: Option<&str>) -> Result<FormSchema> {
    let path = config::resolve_schema_path(schema_path);
    if schema_path.is_none() && !path.exists() {
        tracing::debug!("{} not found, validating against built-in schema", path.display());
        return Ok(assemble_schema());
    }
    load(&path).with_context(|| format!("failed to read {}", path.display()))
}

/// Run the validate command.
pub fn run(schema_path: Option<&str>, field: &str, value: &str) -> Result<()> {
    let schema = schema_for(schema_path)?;
    let validator = Validator::new(&schema)?;
    let violation = validator.check_value(field, value)?;

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "field": field,
            "valid": violation.is_none(),
            "violation": violation,
        }));
    } else if !output::is_quiet() {
        match &violation {
            None => println!("  ✓ {field}: valid"),
            Some(v) => println!("  ✗ {v}"),
        }
    }

    if let Some(v) = violation {
        bail!("{}", v.message);
    }
    Ok(())
}
