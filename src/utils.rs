// src/utils.rs
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Validate file extension against allowed types
pub fn validate_file_extension(filename: &str, allowed: &[&str]) -> Result<()> {
    let ext = get_file_extension(filename)
        .ok_or_else(|| anyhow::anyhow!("File has no extension: {}", filename))?;

    if !allowed.contains(&ext.as_str()) {
        anyhow::bail!(
            "Unsupported file extension: {}. Allowed: {:?}",
            ext,
            allowed
        );
    }

    Ok(())
}

/// Get content type for an uploadable document
pub fn content_type_for(file_name: &str) -> Result<&'static str> {
    match get_file_extension(file_name).as_deref() {
        Some("pdf") => Ok("application/pdf"),
        Some("doc") => Ok("application/msword"),
        Some("docx") => {
            Ok("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        }
        _ => anyhow::bail!("Unsupported file format: {}", file_name),
    }
}

/// Command-line value for a form field: JSON when it parses, plain text otherwise.
/// `5` is a number, `true` a boolean, `null` clears to null, `["a"]` an array,
/// `Nurse` a string.
pub fn parse_cli_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

pub fn to_pretty_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "<unserializable>".to_string())
}

/// Shorten text for table cells
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    short.push('…');
    short
}
