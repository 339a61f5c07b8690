//! Shared validation helpers for inbound HTTP adapters.

use std::str::FromStr;

use serde_json::json;

use crate::domain::{Error, UnknownValueError, WorksheetId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidFilter,
    InvalidValue,
    InvalidBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidFilter => "invalid_filter",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::InvalidBody => "invalid_body",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn field_error(field: FieldName, message: String, code: ErrorCode, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let message = format!("{} must be a valid UUID", field.as_str());
    field_error(field, message, ErrorCode::InvalidUuid, value)
}

pub(crate) fn parse_worksheet_id(value: &str, field: FieldName) -> Result<WorksheetId, Error> {
    WorksheetId::from_str(value).map_err(|_| invalid_uuid_error(field, value))
}

/// Parse a query filter; `all` and every catalogued label are accepted.
pub(crate) fn parse_filter<T>(value: Option<&str>, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = UnknownValueError> + Default,
{
    match value {
        None => Ok(T::default()),
        Some(raw) => raw.parse().map_err(|err: UnknownValueError| {
            field_error(field, err.to_string(), ErrorCode::InvalidFilter, raw)
        }),
    }
}

/// Parse an enumerated body field strictly against its catalogue.
pub(crate) fn parse_label<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = UnknownValueError>,
{
    value
        .parse()
        .map_err(|err: UnknownValueError| {
            field_error(field, err.to_string(), ErrorCode::InvalidValue, value)
        })
}

/// Map a rejected JSON body to the API error envelope.
pub(crate) fn invalid_body_error(reason: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("invalid request body: {reason}"))
        .with_details(json!({ "code": ErrorCode::InvalidBody.as_str() }))
}
