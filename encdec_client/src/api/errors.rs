use thiserror::Error;

/// Errors from backend HTTP calls.
///
/// `Rejected` carries the user-facing message mined from the response body's
/// `detail` (or `message`) field; everything else is transport or decoding
/// trouble.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed (connection refused, timeout, DNS)
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// The configured base URL is not parseable
    #[error("Invalid base URL: {0}")]
    BaseUrl(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl ApiError {
    /// The single string shown to the user for this failure.
    pub fn message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::Network(_) => "Could not reach the server".to_string(),
            Self::Decode(_) => "Unexpected server response".to_string(),
            Self::BaseUrl(url) => format!("Invalid base URL: {url}"),
        }
    }
}

/// Extracts the backend's rejection message from a response body.
///
/// FastAPI-style bodies carry either `detail` as a string, `detail` as an
/// array of objects with `msg` entries (joined with ", "), or a plain
/// `message` field.
pub(super) fn detail_message(body: &serde_json::Value) -> Option<String> {
    match body.get("detail") {
        Some(serde_json::Value::String(s)) => return Some(s.clone()),
        Some(serde_json::Value::Array(entries)) => {
            let joined: Vec<String> = entries
                .iter()
                .filter_map(|e| e.get("msg").and_then(|m| m.as_str()).map(String::from))
                .collect();
            if !joined.is_empty() {
                return Some(joined.join(", "));
            }
        }
        _ => {}
    }
    body.get("message")
        .and_then(|m| m.as_str())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Test extraction of a plain string detail
    #[test]
    fn test_detail_message_string() {
        let body = json!({"detail": "Invalid OTP"});
        assert_eq!(detail_message(&body).unwrap(), "Invalid OTP");
    }

    /// Test that array-shaped details are joined into one string
    #[test]
    fn test_detail_message_array_joined() {
        let body = json!({"detail": [
            {"msg": "field required", "loc": ["body", "email"]},
            {"msg": "value is not a valid email", "loc": ["body", "email"]}
        ]});
        assert_eq!(
            detail_message(&body).unwrap(),
            "field required, value is not a valid email"
        );
    }

    /// Test the message field fallback
    #[test]
    fn test_detail_message_message_fallback() {
        let body = json!({"message": "Failed to send OTP"});
        assert_eq!(detail_message(&body).unwrap(), "Failed to send OTP");
    }

    /// Test that an empty body yields no message
    #[test]
    fn test_detail_message_absent() {
        assert!(detail_message(&json!({})).is_none());
        assert!(detail_message(&serde_json::Value::Null).is_none());
    }
}
