//! Utilities for the deploy scripts.

use std::{fs, path::Path};

use json::JsonValue;

use crate::errors::ScriptError;

/// Parses the JSON file at the given path
pub fn read_json_file(file_path: &Path) -> Result<JsonValue, ScriptError> {
    let file_contents = fs::read_to_string(file_path)
        .map_err(|e| ScriptError::Artifact(format!("{}: {}", file_path.display(), e)))?;

    json::parse(&file_contents)
        .map_err(|e| ScriptError::Artifact(format!("{}: {}", file_path.display(), e)))
}

/// Fetch a mandatory string field of a JSON object
pub fn required_str<'a>(
    value: &'a JsonValue,
    key: &str,
    source: &Path,
) -> Result<&'a str, ScriptError> {
    value[key].as_str().ok_or_else(|| {
        ScriptError::Artifact(format!("{}: missing `{}` field", source.display(), key))
    })
}

/// Hex encoding of raw bytes, without the `0x` prefix
pub fn to_hex_no_prefix(bytes: &[u8]) -> String {
    alloy::hex::encode(bytes)
}
