//! Builds the form schema, falling back to the authored definitions when the
//! portal cannot be reached.

use tracing::{debug, info, warn};

use crate::fetch::PageSource;
use crate::fields;
use crate::survey::{self, PageSurvey};
use crate::types::FormSchema;

/// Which path produced a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The page was retrieved and surveyed.
    Live {
        /// Named inputs found in the page markup.
        inputs_seen: usize,
        /// Schema fields that did not show up in the markup.
        missing: Vec<String>,
    },
    /// Retrieval failed; the schema came from the fallback path.
    Fallback {
        /// Display form of the retrieval error.
        reason: String,
    },
}

impl BuildOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// A schema together with how it was obtained.
#[derive(Debug, Clone)]
pub struct SchemaBuild {
    pub schema: FormSchema,
    pub outcome: BuildOutcome,
}

/// Assemble the schema from the authored step and rule definitions.
pub fn assemble_schema() -> FormSchema {
    FormSchema {
        steps: fields::steps(),
        validation_rules: fields::validation_rules(),
    }
}

/// Produces a [`FormSchema`] from a page source.
pub struct FormSchemaBuilder {
    source: Box<dyn PageSource>,
}

impl FormSchemaBuilder {
    pub fn new(source: Box<dyn PageSource>) -> Self {
        Self { source }
    }

    /// Build the schema. Never fails: a retrieval error is logged and the
    /// fallback schema, identical in content, is returned instead.
    pub async fn build_schema(&self) -> FormSchema {
        self.build().await.schema
    }

    /// Like [`build_schema`](Self::build_schema), but also reports which path
    /// was taken.
    pub async fn build(&self) -> SchemaBuild {
        info!("retrieving registration page from {}", self.source.describe());

        match self.source.fetch().await {
            Ok(html) => {
                let page = survey::survey_page(&html);
                let schema = assemble_schema();
                let outcome = Self::live_outcome(&schema, &page);
                SchemaBuild { schema, outcome }
            }
            Err(e) => {
                warn!("error retrieving registration page: {e}; using fallback schema");
                SchemaBuild {
                    schema: Self::fallback_schema(),
                    outcome: BuildOutcome::Fallback {
                        reason: e.to_string(),
                    },
                }
            }
        }
    }

    /// The schema used when the portal is unreachable.
    pub fn fallback_schema() -> FormSchema {
        assemble_schema()
    }

    fn live_outcome(schema: &FormSchema, page: &PageSurvey) -> BuildOutcome {
        let missing = survey::missing_from_page(schema, page);
        debug!(
            "page survey: {} form(s), {} named input(s), {} hidden",
            page.form_count,
            page.inputs.len(),
            page.hidden_count
        );
        if !missing.is_empty() {
            info!(
                "{} schema field(s) not present in page markup: {}",
                missing.len(),
                missing.join(", ")
            );
        }
        BuildOutcome::Live {
            inputs_seen: page.inputs.len(),
            missing,
        }
    }
}
