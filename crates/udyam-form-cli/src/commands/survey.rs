//! `udyam-form survey`: list the inputs the live page actually carries.

use anyhow::{Context, Result};
use udyam_form::survey::missing_from_page;
use udyam_form::{assemble_schema, survey_page, HttpPageSource, PageSource};

use crate::config;
use crate::output;

/// Run the survey command.
pub async fn run(url: Option<&str>, timeout_ms: Option<u64>) -> Result<()> {
    let url = config::resolve_form_url(url);
    let source = HttpPageSource::new(&url, config::resolve_timeout_ms(timeout_ms))
        .context("failed to build HTTP client")?;

    let html = source
        .fetch()
        .await
        .with_context(|| format!("failed to retrieve {url}"))?;
    let survey = survey_page(&html);
    let missing = missing_from_page(&assemble_schema(), &survey);

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "url": url,
            "survey": survey,
            "missing": missing,
        }));
        return Ok(());
    }

    if output::is_quiet() {
        return Ok(());
    }

    println!("  Surveyed {url}");
    println!(
        "  {} form(s), {} input(s), {} hidden\n",
        survey.form_count,
        survey.inputs.len(),
        survey.hidden_count
    );
    for input in &survey.inputs {
        let max = input
            .max_length
            .map(|m| format!("max {m}"))
            .unwrap_or_default();
        println!("    {:<48} {:<10} {max}", input.name, input.input_type);
    }
    if !missing.is_empty() {
        println!("\n  Not found in markup: {}", missing.join(", "));
    }
    Ok(())
}
