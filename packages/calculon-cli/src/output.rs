use serde::Serialize;
use std::io::Write;

/// Serialize `value` as JSON and write it to `path`, or to stdout when `path` is `None`.
pub fn write_json<T: Serialize>(value: &T, path: Option<&str>, compact: bool) -> Result<(), String> {
    let json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
    .map_err(|e| format!("JSON serialization failed: {}", e))?;

    match path {
        Some(path) => std::fs::write(path, format!("{}\n", json))
            .map_err(|e| format!("Failed to write report file '{}': {}", path, e)),
        None => {
            let mut handle = std::io::stdout().lock();
            writeln!(handle, "{}", json).map_err(|e| format!("Failed to write to stdout: {}", e))
        }
    }
}
