//! Response normalization: status check, embedded error check, then JSON or
//! CSV decoding.
//!
//! # Design
//! The remote service reports many failures with a `200` status and an error
//! object in the body, so the body is always inspected before it is decoded
//! into the caller's shape. A caller therefore never receives a
//! default-filled success value for an error body.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::http::HttpResponse;
use crate::records::{parse_records, Record};

/// Body format an operation expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Json,
    Csv,
}

/// Top-level keys that mark a logical error body, compared case-insensitively.
const ERROR_KEYS: &[&str] = &["Error Message", "Error_Message", "Information", "Note", "detail"];

#[derive(Deserialize)]
struct StatusErrorBody {
    #[serde(default)]
    code: Option<i64>,
    detail: String,
}

/// Statuses from 200 through 399 are treated as success.
pub fn is_success(status: u16) -> bool {
    (200..400).contains(&status)
}

/// Fail with a transport-kind error when the status is outside 200..=399.
pub fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if is_success(response.status) {
        return Ok(());
    }
    match serde_json::from_slice::<StatusErrorBody>(&response.body) {
        Ok(body) => Err(ApiError::Status {
            status: response.status,
            code: body.code,
            detail: body.detail,
        }),
        Err(err) => Err(ApiError::UnknownStatus {
            status: response.status,
            reason: err.to_string(),
        }),
    }
}

/// Fail with `ApiError::Logical` when the body is a JSON object carrying a
/// recognized error field with a non-empty string value.
///
/// Bodies that are not JSON objects (CSV, arrays) pass through untouched.
pub fn check_embedded_error(response: &HttpResponse) -> Result<(), ApiError> {
    if !response.is_json() && !looks_like_object(&response.body) {
        return Ok(());
    }
    let Ok(object) = serde_json::from_slice::<Map<String, Value>>(&response.body) else {
        return Ok(());
    };
    match embedded_message(&object) {
        Some(message) => Err(ApiError::Logical { message }),
        None => Ok(()),
    }
}

fn looks_like_object(body: &[u8]) -> bool {
    body.iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{')
}

fn embedded_message(object: &Map<String, Value>) -> Option<String> {
    ERROR_KEYS.iter().find_map(|wanted| {
        object.iter().find_map(|(key, value)| match value {
            Value::String(text) if key.eq_ignore_ascii_case(wanted) && !text.is_empty() => {
                Some(text.clone())
            }
            _ => None,
        })
    })
}

pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Status and error checks followed by JSON decoding into `T`.
pub fn decode_json_response<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    check_embedded_error(&response)?;
    decode_json(&response.body)
}

/// Full decode path. CSV is used only when `format` asks for it and the
/// response does not declare a JSON content type; `project` turns the parsed
/// records into `T`.
pub fn decode_response<T, F>(
    response: HttpResponse,
    format: ResponseFormat,
    project: F,
) -> Result<T, ApiError>
where
    T: DeserializeOwned,
    F: FnOnce(Vec<Record>) -> T,
{
    check_status(&response)?;
    check_embedded_error(&response)?;
    if format == ResponseFormat::Csv && !response.is_json() {
        let records = parse_records(&response.body)?;
        tracing::debug!(rows = records.len(), "decoded CSV body");
        return Ok(project(records));
    }
    decode_json(&response.body)
}
