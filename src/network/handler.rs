//! Request Handler
//!
//! Maps one HTTP request to one dispatcher call.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response as HttpResponse};

use super::server::AppState;
use super::TARGET_HEADER;
use crate::error::{ErrorKind, LockTableError, Result};
use crate::protocol::{decode_command, encode_error, encode_response, Operation, JSON_CONTENT_TYPE};

/// `POST /`: decode, execute, encode
pub(crate) async fn handle_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: std::result::Result<Bytes, BytesRejection>,
) -> HttpResponse {
    let result = read_body(&state, body)
        .and_then(|body| execute(&state, &headers, &body))
        .and_then(|response| encode_response(&response));

    match result {
        Ok(body) => reply(StatusCode::OK, body),
        Err(e) => reply_error(&e),
    }
}

/// Any method other than `POST` on `/`
pub(crate) async fn method_not_allowed(method: Method) -> HttpResponse {
    reply_error(&LockTableError::MethodNotAllowed(method.to_string()))
}

/// Any path other than `/`
pub(crate) async fn route_not_found(method: Method, uri: Uri) -> HttpResponse {
    reply_error(&LockTableError::RouteNotFound(format!("{} {}", method, uri.path())))
}

fn read_body(state: &AppState, body: std::result::Result<Bytes, BytesRejection>) -> Result<Bytes> {
    body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            LockTableError::RequestTooLarge {
                limit: state.max_request_bytes,
            }
        } else {
            LockTableError::validation(rejection.body_text())
        }
    })
}

fn execute(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Result<crate::protocol::Response> {
    let target = headers
        .get(TARGET_HEADER)
        .ok_or_else(|| LockTableError::validation("X-Amz-Target header is missing"))?
        .to_str()
        .map_err(|_| LockTableError::validation("X-Amz-Target header is not valid text"))?;

    let operation = Operation::from_target(target, &state.target_prefix)?;
    let command = decode_command(operation, body)?;

    tracing::trace!("Received {} on table {}", operation, command.table_name());

    state.dispatcher.execute(command)
}

/// HTTP status for an error
pub(crate) fn status_for(error: &LockTableError) -> StatusCode {
    match error {
        LockTableError::RequestTooLarge { .. } => return StatusCode::PAYLOAD_TOO_LARGE,
        LockTableError::MethodNotAllowed(_) => return StatusCode::METHOD_NOT_ALLOWED,
        LockTableError::RouteNotFound(_) => return StatusCode::NOT_FOUND,
        _ => {}
    }

    match error.kind() {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Operational => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reply_error(error: &LockTableError) -> HttpResponse {
    match error.kind() {
        ErrorKind::Validation => tracing::warn!("Rejected request: {}", error),
        ErrorKind::Operational => tracing::error!("Request failed: {}", error),
        ErrorKind::NotFound | ErrorKind::Conflict => tracing::debug!("{}", error),
    }
    reply(status_for(error), encode_error(error))
}

fn reply(status: StatusCode, body: Vec<u8>) -> HttpResponse {
    (status, [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], body).into_response()
}
