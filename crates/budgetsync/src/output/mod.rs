//! Output formatting functions.

pub mod json;
pub mod pretty;

use serde::Serialize;

use crate::cli::OutputFormat;

/// Renders a command result in the requested format.
///
/// JSON output is the serialized value; pretty output comes from `pretty`.
pub fn render<T>(value: &T, format: OutputFormat, pretty: impl FnOnce(&T) -> String) -> String
where
    T: Serialize + ?Sized,
{
    match format {
        OutputFormat::Json => json::format_json(value),
        OutputFormat::Pretty => pretty(value),
    }
}
