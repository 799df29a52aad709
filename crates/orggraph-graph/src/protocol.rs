//! Gremlin Server WebSocket sub-protocol framing.
//!
//! Requests are JSON documents sent as binary frames, prefixed with the
//! serializer MIME type (one length byte, then the MIME bytes). Responses
//! come back as plain JSON in text or binary frames.
//!
//! The serializer is pinned to GraphSON v2. Cosmos DB does not negotiate
//! and answers other versions with `MalformedRequest`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::TransportError;
use crate::graphson;
use crate::statement::Statement;

/// Serializer MIME type sent with every request.
pub const SERIALIZER_MIME: &str = "application/vnd.gremlin-v2.0+json";

/// Script language for `eval` requests.
pub const LANGUAGE: &str = "gremlin-groovy";

/// SASL mechanism used for the authentication challenge.
pub const SASL_MECHANISM: &str = "PLAIN";

/// Response status codes.
pub mod status {
    pub const SUCCESS: u16 = 200;
    pub const NO_CONTENT: u16 = 204;
    pub const PARTIAL_CONTENT: u16 = 206;
    pub const UNAUTHORIZED: u16 = 401;
    pub const AUTHENTICATE: u16 = 407;
    pub const MALFORMED_REQUEST: u16 = 498;
    pub const INVALID_REQUEST_ARGUMENTS: u16 = 499;
    pub const SERVER_ERROR: u16 = 500;
    pub const SCRIPT_EVALUATION_ERROR: u16 = 597;
    pub const SERVER_TIMEOUT: u16 = 598;
    pub const SERVER_SERIALIZATION_ERROR: u16 = 599;
}

/// An outgoing request message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMessage {
    pub request_id: Value,
    pub op: &'static str,
    pub processor: &'static str,
    pub args: Value,
}

/// Build an `eval` request for `statement`.
pub fn eval_request(request_id: Uuid, statement: &Statement) -> RequestMessage {
    RequestMessage {
        request_id: typed_uuid(request_id),
        op: "eval",
        processor: "",
        args: json!({
            "gremlin": statement.text(),
            "bindings": statement.bindings(),
            "language": LANGUAGE,
        }),
    }
}

/// Build the answer to a 407 challenge for request `request_id`.
pub fn auth_request(request_id: Uuid, username: &str, password: &str) -> RequestMessage {
    RequestMessage {
        request_id: typed_uuid(request_id),
        op: "authentication",
        processor: "",
        args: json!({
            "sasl": sasl_plain(username, password),
            "saslMechanism": SASL_MECHANISM,
        }),
    }
}

fn typed_uuid(id: Uuid) -> Value {
    json!({ "@type": "g:UUID", "@value": id.to_string() })
}

/// SASL PLAIN payload: base64 of `\0username\0password`.
pub fn sasl_plain(username: &str, password: &str) -> String {
    let mut raw = Vec::with_capacity(username.len() + password.len() + 2);
    raw.push(0);
    raw.extend_from_slice(username.as_bytes());
    raw.push(0);
    raw.extend_from_slice(password.as_bytes());
    STANDARD.encode(raw)
}

/// Serialize a request into a binary frame payload.
pub fn encode(message: &RequestMessage) -> Result<Vec<u8>, TransportError> {
    let body = serde_json::to_vec(message)?;
    let mime = SERIALIZER_MIME.as_bytes();
    let mut frame = Vec::with_capacity(1 + mime.len() + body.len());
    frame.push(mime.len() as u8);
    frame.extend_from_slice(mime);
    frame.extend_from_slice(&body);
    Ok(frame)
}

/// Status block of a response.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseStatus {
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub attributes: Value,
}

/// Result block of a response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseResult {
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub meta: Value,
}

/// An incoming response frame.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMessage {
    #[serde(default)]
    pub request_id: Value,
    pub status: ResponseStatus,
    #[serde(default)]
    pub result: ResponseResult,
}

impl ResponseMessage {
    /// The request id as a bare string, with any GraphSON wrapper removed.
    pub fn request_id(&self) -> Option<&str> {
        graphson::peel(&self.request_id).as_str()
    }

    /// Result items of this frame. `null` and missing data yield nothing.
    pub fn into_data(self) -> Vec<Value> {
        match graphson::strip_types(self.result.data) {
            Value::Null => Vec::new(),
            Value::Array(items) => items,
            other => vec![other],
        }
    }

    /// Status message, enriched with the engine's own status code when the
    /// status attributes carry one (Cosmos DB reports e.g. 409 there).
    pub fn describe(&self) -> String {
        match self.status.attributes.get("x-ms-status-code").and_then(Value::as_u64) {
            Some(code) => format!("{} (x-ms-status-code {})", self.status.message, code),
            None => self.status.message.clone(),
        }
    }
}

/// Parse a response frame.
pub fn decode(bytes: &[u8]) -> Result<ResponseMessage, TransportError> {
    serde_json::from_slice(bytes)
        .map_err(|e| TransportError::Protocol(format!("unparseable response: {e}")))
}
