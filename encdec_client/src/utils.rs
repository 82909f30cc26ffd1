use base64::{Engine as _, engine::general_purpose::STANDARD, engine::general_purpose::STANDARD_NO_PAD};
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum UtilError {
    #[error("Invalid format: {0}")]
    Format(String),
}

/// Decodes base64url text the way the backend produces it: the URL-safe
/// alphabet is translated back to the standard one (`-`→`+`, `_`→`/`) before
/// decoding, and `=` padding is optional.
pub fn base64url_decode(input: &str) -> Result<Vec<u8>, UtilError> {
    let translated: String = input
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    let unpadded = translated.trim_end_matches('=');
    let decoded = STANDARD_NO_PAD
        .decode(unpadded)
        .map_err(|_| UtilError::Format("Failed to decode base64url".to_string()))?;
    Ok(decoded)
}

/// Encodes bytes into unpadded base64url text for the backend: standard
/// base64 with `+`→`-`, `/`→`_` and padding stripped.
pub fn base64url_encode(input: &[u8]) -> String {
    STANDARD
        .encode(input)
        .chars()
        .filter(|c| *c != '=')
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect()
}
