//! `udyam-form check`: verify a written schema document.

use anyhow::{bail, Context, Result};
use udyam_form::{check_integrity, load};

use crate::config;
use crate::output;

/// Run the check command.
pub fn run(schema_path: Option<&str>) -> Result<()> {
    let path = config::resolve_schema_path(schema_path);
    let schema = load(&path).with_context(|| format!("failed to read {}", path.display()))?;
    let issues = check_integrity(&schema);

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "path": path.display().to_string(),
            "steps": schema.step_count(),
            "fields": schema.field_count(),
            "rules": schema.validation_rules.len(),
            "issues": issues,
        }));
    } else if !output::is_quiet() {
        println!("  Schema: {}", path.display());
        println!("  Steps:  {}", schema.step_count());
        println!("  Fields: {}", schema.field_count());
        println!("  Rules:  {}", schema.validation_rules.len());
        for issue in &issues {
            println!("  ✗ {issue}");
        }
    }

    if !issues.is_empty() {
        bail!("{} integrity issue(s) in {}", issues.len(), path.display());
    }

    if !output::is_quiet() {
        println!("  ✓ All field rules resolve");
    }
    Ok(())
}
