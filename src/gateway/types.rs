use serde::{Deserialize, Serialize};

use super::provider::GatewayError;

/// Shown when the backend reports failure without saying why.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Request body for the generate endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub prompt: String,
}

/// Response body: `{"ok": true, "text": ...}` or `{"ok": false, "error": ...}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct GenerateResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateResponse {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            ok: true,
            text: Some(text.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            text: None,
            error: Some(error.into()),
        }
    }
}

/// How a round trip settled, as the transcript sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// `ok: true`; the text is revealed.
    Reply(String),
    /// `ok: false`; carries the backend's error, if any.
    ServerError(Option<String>),
    /// The request never produced a readable body.
    NetworkError(String),
}

impl Outcome {
    /// Plain message for the non-animated outcomes. `None` for `Reply`.
    pub fn notice(&self) -> Option<String> {
        match self {
            Outcome::Reply(_) => None,
            Outcome::ServerError(error) => Some(format!(
                "Server error: {}",
                error
                    .as_deref()
                    .filter(|e| !e.is_empty())
                    .unwrap_or(UNKNOWN_ERROR)
            )),
            Outcome::NetworkError(message) => Some(format!("Network error: {message}")),
        }
    }
}

impl From<Result<GenerateResponse, GatewayError>> for Outcome {
    fn from(result: Result<GenerateResponse, GatewayError>) -> Self {
        match result {
            Ok(resp) if resp.ok => Outcome::Reply(resp.text.unwrap_or_default()),
            Ok(resp) => Outcome::ServerError(resp.error),
            Err(e) => Outcome::NetworkError(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_prompt() {
        let req = GenerateRequest {
            prompt: "Hello".to_string(),
        };
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"prompt":"Hello"}"#);
    }

    #[test]
    fn test_response_parses_both_shapes() {
        let ok: GenerateResponse = serde_json::from_str(r#"{"ok":true,"text":"hi"}"#).unwrap();
        assert_eq!(ok, GenerateResponse::success("hi"));

        let err: GenerateResponse =
            serde_json::from_str(r#"{"ok":false,"error":"rate limited"}"#).unwrap();
        assert_eq!(err, GenerateResponse::failure("rate limited"));
    }

    #[test]
    fn test_outcome_from_result() {
        assert_eq!(
            Outcome::from(Ok(GenerateResponse::success("x"))),
            Outcome::Reply("x".to_string())
        );
        assert_eq!(
            Outcome::from(Ok(GenerateResponse {
                ok: true,
                ..Default::default()
            })),
            Outcome::Reply(String::new())
        );
        assert_eq!(
            Outcome::from(Ok(GenerateResponse::failure("boom"))),
            Outcome::ServerError(Some("boom".to_string()))
        );
        assert_eq!(
            Outcome::from(Err(GatewayError::Network("connection refused".into()))),
            Outcome::NetworkError("connection refused".to_string())
        );
    }

    #[test]
    fn test_notice_text() {
        assert_eq!(
            Outcome::ServerError(Some("rate limited".into())).notice().as_deref(),
            Some("Server error: rate limited")
        );
        assert_eq!(
            Outcome::ServerError(None).notice().as_deref(),
            Some("Server error: Unknown error")
        );
        assert_eq!(
            Outcome::ServerError(Some(String::new())).notice().as_deref(),
            Some("Server error: Unknown error")
        );
        assert_eq!(
            Outcome::NetworkError("timed out".into()).notice().as_deref(),
            Some("Network error: timed out")
        );
        assert_eq!(Outcome::Reply("x".into()).notice(), None);
    }
}
