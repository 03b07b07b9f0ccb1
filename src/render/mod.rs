//! Output rendering
//!
//! Consumes the aggregated reports and writes them out. Three formats:
//! human-readable console blocks, porcelain (tab-separated, script-friendly,
//! one row per line), and CSV files. Reports are immutable, so the same
//! report can feed the console and a CSV file in one run.
//!
//! - [`console`] - Human-readable and porcelain output
//! - [`csv`] - CSV file output

pub mod console;
pub mod csv;

use chrono::{DateTime, SecondsFormat, Utc};

/// RFC 3339 creation-time cell shared by all formats.
/// Errors and missing values are rendered, never omitted.
pub fn created_time_cell(
    created: Option<DateTime<Utc>>,
    error: Option<&str>,
    missing: &str,
) -> String {
    if let Some(err) = error {
        return format!("Error: {err}");
    }
    match created {
        Some(ts) => ts.to_rfc3339_opts(SecondsFormat::Secs, true),
        None => missing.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_wins_over_timestamp() {
        let ts = "2021-01-01T00:00:00Z".parse().ok();
        assert_eq!(created_time_cell(ts, Some("boom"), "N/A"), "Error: boom");
    }

    #[test]
    fn missing_placeholder_used_without_timestamp() {
        assert_eq!(created_time_cell(None, None, "Not available"), "Not available");
    }

    #[test]
    fn timestamps_render_rfc3339() {
        let ts = "2021-06-15T12:30:00Z".parse().ok();
        assert_eq!(created_time_cell(ts, None, "N/A"), "2021-06-15T12:30:00Z");
    }
}
