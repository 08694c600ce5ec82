//! Configuration loading and resolution.
//!
//! Each setting resolves explicit flag, then environment variable, then default.
//! An empty environment variable counts as unset.

use std::path::PathBuf;

use udyam_form::fetch::DEFAULT_TIMEOUT_MS;
use udyam_form::{DEFAULT_SCHEMA_FILE, UDYAM_FORM_URL};

pub const ENV_SCHEMA_FILE: &str = "UDYAM_SCHEMA_FILE";
pub const ENV_FORM_URL: &str = "UDYAM_FORM_URL";
pub const ENV_TIMEOUT_MS: &str = "UDYAM_TIMEOUT_MS";

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Resolve the schema file path.
pub fn resolve_schema_path(explicit: Option<&str>) -> PathBuf {
    resolve_schema_path_with(explicit, process_env)
}

/// Resolve the registration page URL.
pub fn resolve_form_url(explicit: Option<&str>) -> String {
    resolve_form_url_with(explicit, process_env)
}

/// Resolve the request timeout. An unparseable environment value is ignored.
pub fn resolve_timeout_ms(explicit: Option<u64>) -> u64 {
    resolve_timeout_ms_with(explicit, process_env)
}

fn non_empty<F>(env: F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    env(key).filter(|v| !v.is_empty())
}

fn resolve_schema_path_with<F>(explicit: Option<&str>, env: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    non_empty(env, ENV_SCHEMA_FILE)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_FILE))
}

fn resolve_form_url_with<F>(explicit: Option<&str>, env: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    explicit
        .map(String::from)
        .or_else(|| non_empty(env, ENV_FORM_URL))
        .unwrap_or_else(|| UDYAM_FORM_URL.to_string())
}

fn resolve_timeout_ms_with<F>(explicit: Option<u64>, env: F) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(ms) = explicit {
        return ms;
    }

    match non_empty(env, ENV_TIMEOUT_MS) {
        Some(raw) => match raw.trim().parse() {
            Ok(ms) => ms,
            Err(_) => {
                tracing::warn!("ignoring {ENV_TIMEOUT_MS}={raw:?}: not a number of milliseconds");
                DEFAULT_TIMEOUT_MS
            }
        },
        None => DEFAULT_TIMEOUT_MS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_explicit_wins() {
        let env = env_of(&[
            (ENV_SCHEMA_FILE, "env.json"),
            (ENV_FORM_URL, "http://env.invalid/form"),
            (ENV_TIMEOUT_MS, "900"),
        ]);
        assert_eq!(
            resolve_schema_path_with(Some("out/schema.json"), &env),
            PathBuf::from("out/schema.json")
        );
        assert_eq!(
            resolve_form_url_with(Some("http://localhost:1/form"), &env),
            "http://localhost:1/form"
        );
        assert_eq!(resolve_timeout_ms_with(Some(250), &env), 250);
    }

    #[test]
    fn test_env_used_without_flag() {
        let env = env_of(&[
            (ENV_SCHEMA_FILE, "env.json"),
            (ENV_FORM_URL, "http://env.invalid/form"),
            (ENV_TIMEOUT_MS, " 900 "),
        ]);
        assert_eq!(resolve_schema_path_with(None, &env), PathBuf::from("env.json"));
        assert_eq!(resolve_form_url_with(None, &env), "http://env.invalid/form");
        assert_eq!(resolve_timeout_ms_with(None, &env), 900);
    }

    #[test]
    fn test_defaults_when_unset() {
        let env = env_of(&[]);
        assert_eq!(
            resolve_schema_path_with(None, &env),
            PathBuf::from(DEFAULT_SCHEMA_FILE)
        );
        assert_eq!(resolve_form_url_with(None, &env), UDYAM_FORM_URL);
        assert_eq!(resolve_timeout_ms_with(None, &env), DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_empty_env_counts_as_unset() {
        let env = env_of(&[
            (ENV_SCHEMA_FILE, ""),
            (ENV_FORM_URL, ""),
            (ENV_TIMEOUT_MS, ""),
        ]);
        assert_eq!(
            resolve_schema_path_with(None, &env),
            PathBuf::from(DEFAULT_SCHEMA_FILE)
        );
        assert_eq!(resolve_form_url_with(None, &env), UDYAM_FORM_URL);
        assert_eq!(resolve_timeout_ms_with(None, &env), DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_bad_timeout_falls_back_to_default() {
        let env = env_of(&[(ENV_TIMEOUT_MS, "fifteen seconds")]);
        assert_eq!(resolve_timeout_ms_with(None, &env), DEFAULT_TIMEOUT_MS);
    }
}
