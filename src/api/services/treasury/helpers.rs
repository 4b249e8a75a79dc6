//! Response helpers

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, error::InternalError, web};
use serde::Serialize;
use tracing::{error, warn};

use crate::errors::LedgerError;

use super::error_code::{ErrorCode, ErrorScope};
use super::types::ApiResponse;

/// Build a JSON response
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::CREATED, ErrorCode::Success, "Created", Some(data))
}

pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// Map a `LedgerError` to status code and scoped `ErrorCode`
pub fn error_from_ledger(err: &LedgerError, scope: ErrorScope) -> HttpResponse {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!("API error: {}", err);
    } else {
        warn!("API rejected request: {}", err);
    }
    error_response(status, ErrorCode::for_error(err, scope), err.message())
}

/// `Result` to `HttpResponse`: 200 with data, or the mapped error
pub fn api_result<T: Serialize>(
    result: crate::errors::Result<T>,
    scope: ErrorScope,
) -> HttpResponse {
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_from_ledger(&e, scope),
    }
}

/// Like `api_result` but answers 201 on success
pub fn api_created<T: Serialize>(
    result: crate::errors::Result<T>,
    scope: ErrorScope,
) -> HttpResponse {
    match result {
        Ok(data) => created_response(data),
        Err(e) => error_from_ledger(&e, scope),
    }
}

/// Malformed JSON bodies answer with the envelope instead of plain text
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(1024 * 1024)
        .error_handler(|err, _req| {
            let message = err.to_string();
            let response = error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &message);
            InternalError::from_response(err, response).into()
        })
}

/// Same treatment for bad query strings
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        let response = error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &message);
        InternalError::from_response(err, response).into()
    })
}

/// Same treatment for bad path segments (e.g. a non-numeric id)
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        let response = error_response(StatusCode::NOT_FOUND, ErrorCode::NotFound, &message);
        InternalError::from_response(err, response).into()
    })
}
