//! Helpers for the end to end tests in `tests/`. They expect a running catalog service,
//! by default on http://127.0.0.1:8080, and only run with `--features system_tests`.

use std::time::{SystemTime, UNIX_EPOCH};

pub const DEFAULT_CATALOG_URL: &str = "http://127.0.0.1:8080";

/// Service under test, overridable with `CATALOG_URL`
pub fn catalog_url() -> String {
    std::env::var("CATALOG_URL").unwrap_or_else(|_| DEFAULT_CATALOG_URL.to_string())
}

/// Keeps titles and shelves from different runs apart on a shared database
pub fn unique_suffix() -> String {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}{:09}", elapsed.as_secs(), elapsed.subsec_nanos())
}
