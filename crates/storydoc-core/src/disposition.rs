//! Download filename handling for generated documents.
//!
//! The generate endpoint may suggest a name through a
//! `content-disposition`-style header. Parsing is deliberately lenient and
//! never fails: anything unusable falls back to a timestamped name.

use chrono::{DateTime, Local};

const FILENAME_TOKEN: &str = "filename=";

/// Extracts the `filename=` token from a disposition header value.
///
/// A quoted value runs to its closing quote and may contain `;`. An unquoted
/// value (or one missing its closing quote) ends at the next `;`. Returns
/// `None` when the token is missing or empty.
pub fn filename_from_disposition(value: &str) -> Option<String> {
    let (_, rest) = value.split_once(FILENAME_TOKEN)?;
    let rest = rest.trim_start();
    let quoted = rest
        .strip_prefix('"')
        .and_then(|inner| inner.split_once('"'))
        .map(|(name, _)| name);
    let name = match quoted {
        Some(name) => name.trim(),
        None => rest
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .trim_matches('"')
            .trim(),
    };
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Builds `generated_output_<YYYYmmdd_HHMMSS>.txt` for the given moment.
pub fn synthesized_filename(at: DateTime<Local>) -> String {
    format!("generated_output_{}.txt", at.format("%Y%m%d_%H%M%S"))
}

/// Picks the download name: the disposition hint when usable, otherwise a
/// timestamped name for `at`.
pub fn resolve_filename(disposition: Option<&str>, at: DateTime<Local>) -> String {
    disposition
        .and_then(filename_from_disposition)
        .unwrap_or_else(|| synthesized_filename(at))
}
