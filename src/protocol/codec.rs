//! Protocol codec
//!
//! Encoding and decoding functions for the JSON wire format.

use super::{Command, ErrorBody, Operation, Response};
use crate::error::{ErrorKind, LockTableError, Result};

/// Content type of every request and response body
pub const JSON_CONTENT_TYPE: &str = "application/x-amz-json-1.0";

const ERROR_TYPE_PREFIX: &str = "com.amazonaws.dynamodb.v20120810#";

// =============================================================================
// Command Decoding
// =============================================================================

/// Decode the body of a request for `operation`
pub fn decode_command(operation: Operation, body: &[u8]) -> Result<Command> {
    let command = match operation {
        Operation::PutItem => Command::PutItem(serde_json::from_slice(body)?),
        Operation::GetItem => Command::GetItem(serde_json::from_slice(body)?),
        Operation::DeleteItem => Command::DeleteItem(serde_json::from_slice(body)?),
    };
    Ok(command)
}

// =============================================================================
// Response Encoding
// =============================================================================

/// Encode a successful response
pub fn encode_response(response: &Response) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(response)?)
}

/// Encode an error as an `{"__type", "message"}` body
pub fn encode_error(error: &LockTableError) -> Vec<u8> {
    let body = ErrorBody {
        error_type: format!("{}{}", ERROR_TYPE_PREFIX, error_type(error)),
        message: error.to_string(),
    };
    // A two-string struct cannot fail to serialize
    serde_json::to_vec(&body).unwrap_or_default()
}

/// Exception name reported for `error`
pub fn error_type(error: &LockTableError) -> &'static str {
    match error {
        LockTableError::Serialization(_) => "SerializationException",
        LockTableError::UnknownOperation(_)
        | LockTableError::MethodNotAllowed(_)
        | LockTableError::RouteNotFound(_) => "UnknownOperationException",
        _ => match error.kind() {
            ErrorKind::Validation => "ValidationException",
            ErrorKind::NotFound => "ResourceNotFoundException",
            ErrorKind::Conflict => "ConditionalCheckFailedException",
            ErrorKind::Operational => "InternalServerError",
        },
    }
}
