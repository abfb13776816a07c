//! Error payloads carried by failed queries.
//!
//! These values are never raised by this workspace. A query provider stores
//! them on a [`QueryResult`](crate::QueryResult) and the aggregator forwards
//! the first one it meets.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Default error payload of a failed fetch.
///
/// Covers the shapes a fetch-based query provider reports: a non-2xx HTTP
/// response, a transport failure, an unparsable body, a timeout, a custom
/// error from a query function, and an error serialized from a thrown value.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchError {
    /// Server answered with a non-success status.
    #[error("request failed with status {status}")]
    Http {
        status: u16,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
    },

    /// Request never produced a response.
    #[error("fetch failed: {error}")]
    Fetch { error: String },

    /// Response body could not be parsed.
    #[error("could not parse response (status {original_status}): {error}")]
    Parsing {
        original_status: u16,
        error: String,
        #[serde(default)]
        data: String,
    },

    /// Request exceeded its deadline.
    #[error("request timed out: {error}")]
    Timeout { error: String },

    /// Error returned by a custom query function.
    #[error("query failed: {error}")]
    Custom {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
    },

    /// Thrown value captured as name/message/code.
    #[error("{}", message.as_deref().unwrap_or("unknown error"))]
    Serialized {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },
}

impl FetchError {
    /// Create a serialized error carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self::Serialized {
            name: None,
            message: Some(message.into()),
            code: None,
        }
    }

    /// HTTP status, when the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Parsing {
                original_status, ..
            } => Some(*original_status),
            Self::Fetch { .. }
            | Self::Timeout { .. }
            | Self::Custom { .. }
            | Self::Serialized { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_message_or_fallback() {
        assert_eq!(FetchError::message("boom").to_string(), "boom");
        let anonymous = FetchError::Serialized {
            name: Some("TypeError".into()),
            message: None,
            code: None,
        };
        assert_eq!(anonymous.to_string(), "unknown error");
    }

    #[test]
    fn status_only_for_response_errors() {
        let http = FetchError::Http {
            status: 404,
            data: None,
        };
        assert_eq!(http.status(), Some(404));
        assert_eq!(FetchError::message("x").status(), None);
    }

    #[test]
    fn deserializes_tagged_shape() {
        let error: FetchError =
            serde_json::from_str(r#"{"kind":"http","status":500,"data":{"detail":"down"}}"#)
                .expect("parse error");
        assert_eq!(
            error,
            FetchError::Http {
                status: 500,
                data: Some(serde_json::json!({"detail": "down"})),
            }
        );
    }
}
