//! Response normalization
//!
//! Success bodies become an [`ApiResponse`]; error bodies are reduced to a
//! message, an optional structured payload and an optional machine-readable
//! error code.

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::errors::ApiError;

/// Normalized success body.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// 204/205 or a body with nothing in it
    Empty,
    Json(Value),
    Text(String),
}

impl ApiResponse {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The body as a JSON value: `Empty` is `null`, text is a string.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Empty => Value::Null,
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
        }
    }

    /// Deserialize the body into `T`.
    ///
    /// # Errors
    /// Returns [`ApiError::Decode`] when the body does not match `T`.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        serde_json::from_value(self.into_value())
            .map_err(|err| ApiError::Decode(format!("unexpected response shape: {err}")))
    }
}

/// Fully buffered response, read once and inspected as often as needed.
#[derive(Debug, Clone)]
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self, ApiError> {
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|err| ApiError::Network(format!("failed to read response body: {err}")))?;
        Ok(Self { status, content_type, body })
    }

    fn is_json(&self) -> bool {
        self.content_type.as_deref().is_some_and(|value| {
            let mime = value.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
    }

    /// Normalize a 2xx response.
    pub(crate) fn into_success(self) -> Result<ApiResponse, ApiError> {
        if matches!(self.status, StatusCode::NO_CONTENT | StatusCode::RESET_CONTENT)
            || self.body.trim().is_empty()
        {
            return Ok(ApiResponse::Empty);
        }
        if self.is_json() {
            return serde_json::from_str(&self.body)
                .map(ApiResponse::Json)
                .map_err(|err| ApiError::Decode(format!("invalid JSON body: {err}")));
        }
        Ok(ApiResponse::Text(self.body))
    }

    /// Extract message, payload and code from a non-2xx body.
    pub(crate) fn error_body(&self) -> ErrorBody {
        let trimmed = self.body.trim();
        let fallback = || format!("Request failed with status {}", self.status.as_u16());

        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Object(map)) => {
                let code = ["code", "error_code"]
                    .iter()
                    .find_map(|key| map.get(*key).and_then(Value::as_str))
                    .map(str::to_string);

                match map.get("detail") {
                    Some(Value::String(detail)) => ErrorBody {
                        message: detail.clone(),
                        payload: Some(Value::Object(map.clone())),
                        code,
                        structured: false,
                    },
                    Some(detail @ (Value::Object(_) | Value::Array(_))) => ErrorBody {
                        message: summarize_detail(detail).unwrap_or_else(fallback),
                        payload: Some(detail.clone()),
                        code,
                        structured: true,
                    },
                    _ => {
                        let message = ["message", "error"]
                            .iter()
                            .find_map(|key| map.get(*key).and_then(Value::as_str))
                            .map_or_else(fallback, str::to_string);
                        ErrorBody {
                            message,
                            payload: Some(Value::Object(map.clone())),
                            code,
                            structured: false,
                        }
                    }
                }
            }
            _ if !trimmed.is_empty() => ErrorBody {
                message: trimmed.to_string(),
                payload: None,
                code: None,
                structured: false,
            },
            _ => ErrorBody { message: fallback(), payload: None, code: None, structured: false },
        }
    }
}

/// Parsed non-2xx body.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ErrorBody {
    pub message: String,
    pub payload: Option<Value>,
    pub code: Option<String>,
    /// `detail` was an object or list rather than a string
    pub structured: bool,
}

impl ErrorBody {
    /// The caller-facing error for a non-auth failure.
    pub(crate) fn into_error(self, status: StatusCode) -> ApiError {
        match (self.structured, self.payload) {
            (true, Some(payload)) => {
                ApiError::Validation { status: status.as_u16(), message: self.message, payload }
            }
            (_, payload) => {
                ApiError::Status { status: status.as_u16(), message: self.message, payload }
            }
        }
    }
}

// FastAPI-style `[{"loc": [...], "msg": "..."}]` or `{"message": "..."}`.
fn summarize_detail(detail: &Value) -> Option<String> {
    match detail {
        Value::Array(items) => {
            let messages: Vec<String> = items.iter().filter_map(describe_item).collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        Value::Object(map) => ["msg", "message", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}

fn describe_item(item: &Value) -> Option<String> {
    match item {
        Value::String(text) => Some(text.clone()),
        Value::Object(map) => {
            let msg = map.get("msg").or_else(|| map.get("message")).and_then(Value::as_str)?;
            let field = map.get("loc").and_then(Value::as_array).and_then(|loc| {
                loc.iter().rev().find_map(|segment| match segment {
                    Value::String(name) if name != "body" => Some(name.clone()),
                    _ => None,
                })
            });
            Some(field.map_or_else(|| msg.to_string(), |field| format!("{field}: {msg}")))
        }
        _ => None,
    }
}
