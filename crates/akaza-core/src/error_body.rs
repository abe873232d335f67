use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::{response::IntoResponse, Json};
use serde_json::Value;

/// JSON error returned to API clients.
///
/// Serializes as a flat object, e.g. `{"error": "...", "details": "..."}`.
/// Browser SSE consumers rely on every failure being exactly one of these.
#[derive(Debug, Clone)]
pub struct ErrorBody {
    /// The status code of the error.
    pub status_code: StatusCode,
    /// The fields of the JSON object.
    pub body: BTreeMap<String, Value>,
}

/// Create a new `ErrorBody` response to send to the client.
pub fn new<S>(status_code: S) -> ErrorBody
where
    S: Into<StatusCode>,
{
    ErrorBody {
        status_code: status_code.into(),
        body: BTreeMap::new(),
    }
}

impl ErrorBody {
    /// Specify the "error" message.
    pub fn with_error<S>(self, value: S) -> Self
    where
        S: Into<String>,
    {
        self.with_value("error", value.into())
    }

    /// Specify the "details" of the failure.
    pub fn with_details<S>(self, value: S) -> Self
    where
        S: Into<String>,
    {
        self.with_value("details", value.into())
    }

    /// Specify an arbitrary value to include in the body.
    pub fn with_value<V>(mut self, key: &str, value: V) -> Self
    where
        V: Into<Value>,
    {
        self.body.insert(key.to_owned(), value.into());

        self
    }

    /// The "error" message, if one was set.
    pub fn error(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }
}

impl<S> From<S> for ErrorBody
where
    S: Into<StatusCode>,
{
    fn from(status_code: S) -> Self {
        new(status_code.into())
    }
}

impl IntoResponse for ErrorBody {
    fn into_response(self) -> axum::response::Response {
        if self.body.is_empty() {
            self.status_code.into_response()
        } else {
            (self.status_code, Json(self.body)).into_response()
        }
    }
}
