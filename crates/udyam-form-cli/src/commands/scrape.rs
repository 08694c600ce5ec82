//! `udyam-form scrape`: build the schema and write it to disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use udyam_form::{
    persist, BuildOutcome, FormSchema, FormSchemaBuilder, HttpPageSource, PageSource,
    StaticPageSource,
};

use crate::config;
use crate::output;

/// Options for one scrape run.
#[derive(Debug, Default, Clone)]
pub struct ScrapeOptions {
    pub output: Option<String>,
    pub url: Option<String>,
    pub timeout_ms: Option<u64>,
    /// Skip the network and take the fallback path directly.
    pub offline: bool,
}

/// What a scrape run produced.
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    pub path: PathBuf,
    pub schema: FormSchema,
    pub outcome: BuildOutcome,
}

/// Build the schema and persist it.
pub async fn scrape(opts: &ScrapeOptions) -> Result<ScrapeReport> {
    let path = config::resolve_schema_path(opts.output.as_deref());

    let source: Box<dyn PageSource> = if opts.offline {
        Box::new(StaticPageSource::unreachable())
    } else {
        let url = config::resolve_form_url(opts.url.as_deref());
        let timeout_ms = config::resolve_timeout_ms(opts.timeout_ms);
        Box::new(HttpPageSource::new(&url, timeout_ms).context("failed to build HTTP client")?)
    };

    let build = FormSchemaBuilder::new(source).build().await;
    let schema = persist(build.schema, &path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    Ok(ScrapeReport {
        path,
        schema,
        outcome: build.outcome,
    })
}

/// Run the scrape command.
pub async fn run(opts: &ScrapeOptions) -> Result<()> {
    let report = scrape(opts).await?;
    report_result(&report);
    Ok(())
}

fn report_result(report: &ScrapeReport) {
    let ScrapeReport {
        path,
        schema,
        outcome,
    } = report;

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "path": path.display().to_string(),
            "steps": schema.step_count(),
            "fields": schema.field_count(),
            "fallback": outcome.is_fallback(),
        }));
        return;
    }

    if output::is_quiet() {
        return;
    }

    if let BuildOutcome::Fallback { reason } = outcome {
        println!("  Error scraping form: {reason}");
        println!("  Using built-in form structure.");
    }
    print_summary(path, schema);
}

fn print_summary(path: &Path, schema: &FormSchema) {
    println!("  Form schema saved to {}", path.display());
    println!("  Udyam form scraping completed!");
    println!(
        "  Extracted {} steps with {} total fields",
        schema.step_count(),
        schema.field_count()
    );
}
