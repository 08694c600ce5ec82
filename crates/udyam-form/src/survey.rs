//! Diagnostic pass over the retrieved registration page.
//!
//! Walks every named input in the markup so drift between the portal and the
//! authored field lists shows up in the logs. Nothing here feeds the schema.

use scraper::{Html, Selector};
use serde::Serialize;

use crate::types::FormSchema;

/// An input element found in the page markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredInput {
    /// The `name` attribute. ASP.NET pages nest these as `ctl00$Main$txtName`.
    pub name: String,
    /// The `id` attribute, if any.
    pub id: Option<String>,
    /// The `type` attribute, or the tag name for `select`/`textarea`.
    pub input_type: String,
    /// Parsed `maxlength` attribute.
    pub max_length: Option<u32>,
    /// Whether the element carries `required`.
    pub required: bool,
}

/// Summary of the inputs on a page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageSurvey {
    /// Number of `<form>` elements.
    pub form_count: usize,
    /// Named, non-hidden inputs in document order.
    pub inputs: Vec<DiscoveredInput>,
    /// Hidden inputs (view state, event validation tokens).
    pub hidden_count: usize,
}

impl PageSurvey {
    /// Whether any discovered input plausibly corresponds to `field_name`.
    ///
    /// Matches on exact name or id, or on a case-insensitive suffix of the
    /// ASP.NET-mangled name with punctuation dropped, so `aadhaar_number`
    /// matches `ctl00$Main$txtAadhaarNumber`.
    pub fn mentions(&self, field_name: &str) -> bool {
        let wanted = squash(field_name);
        self.inputs.iter().any(|input| {
            input.name == field_name
                || input.id.as_deref() == Some(field_name)
                || squash(&input.name).ends_with(&wanted)
                || input
                    .id
                    .as_deref()
                    .map(|id| squash(id).ends_with(&wanted))
                    .unwrap_or(false)
        })
    }
}

fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Parse `html` and collect its form inputs.
pub fn survey_page(html: &str) -> PageSurvey {
    let document = Html::parse_document(html);
    let mut survey = PageSurvey::default();

    let form_sel = match Selector::parse("form") {
        Ok(s) => s,
        Err(_) => return survey,
    };
    let field_sel = match Selector::parse("input, select, textarea") {
        Ok(s) => s,
        Err(_) => return survey,
    };

    survey.form_count = document.select(&form_sel).count();

    for el in document.select(&field_sel) {
        let attrs = el.value();
        let name = attrs.attr("name").unwrap_or("").to_string();
        if name.is_empty() {
            continue;
        }
        let input_type = attrs
            .attr("type")
            .unwrap_or(attrs.name())
            .to_ascii_lowercase();

        if matches!(input_type.as_str(), "hidden" | "submit" | "button" | "image") {
            if input_type == "hidden" {
                survey.hidden_count += 1;
            }
            continue;
        }

        survey.inputs.push(DiscoveredInput {
            name,
            id: attrs.attr("id").map(String::from),
            input_type,
            max_length: attrs.attr("maxlength").and_then(|v| v.trim().parse().ok()),
            required: attrs.attr("required").is_some(),
        });
    }

    survey
}

/// Schema field names that the survey could not find in the markup.
pub fn missing_from_page(schema: &FormSchema, survey: &PageSurvey) -> Vec<String> {
    schema
        .steps
        .iter()
        .flat_map(|s| s.fields.iter())
        .filter(|f| !f.is_conditional())
        .filter(|f| !survey.mentions(&f.name))
        .map(|f| f.name.clone())
        .collect()
}
