//! Console output helpers shared by every subcommand.
//!
//! Global flags are set once in `main` through environment variables so any
//! module can check them without threading a context around.

pub const ENV_JSON: &str = "UDYAM_FORM_JSON";
pub const ENV_QUIET: &str = "UDYAM_FORM_QUIET";

/// True when `--json` was passed.
pub fn is_json() -> bool {
    std::env::var(ENV_JSON).is_ok()
}

/// True when `--quiet` or `--json` was passed.
pub fn is_quiet() -> bool {
    std::env::var(ENV_QUIET).is_ok() || is_json()
}

/// Print a JSON value on stdout.
pub fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("  Error: failed to render JSON: {e}"),
    }
}
