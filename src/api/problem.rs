//! Error normalization
//!
//! Turns any failed request into exactly one display string. The catalog API
//! answers errors in three overlapping conventions (field-validation details,
//! problem details, plain text) without a discriminant, so the body is matched
//! against an ordered chain of structural predicates.

use serde_json::{Map, Value};

use super::http::ApiError;

pub const UNKNOWN_ERROR: &str = "Unknown error";
pub const NETWORK_ERROR: &str = "Network error";

/// Failure taxonomy used to decide what reaches the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Superseded by a newer selection; never displayed
    Cancelled,
    /// The server answered and rejected the request
    Validation,
    /// The server could not be reached or answered garbage
    Transport,
    /// Anything that is not a request failure
    Programming,
}

pub fn classify(err: &anyhow::Error) -> FailureKind {
    match err.downcast_ref::<ApiError>() {
        Some(ApiError::Cancelled) => FailureKind::Cancelled,
        Some(ApiError::Rejected { .. }) => FailureKind::Validation,
        Some(ApiError::Transport(_)) | Some(ApiError::InvalidResponse(_)) => FailureKind::Transport,
        None => FailureKind::Programming,
    }
}

pub fn is_cancelled(err: &anyhow::Error) -> bool {
    classify(err) == FailureKind::Cancelled
}

/// Display message for any failure. Never panics.
pub fn user_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ApiError>() {
        Some(api) => message_for(api),
        None => {
            tracing::error!(error = ?err, "unexpected failure outside the transport");
            UNKNOWN_ERROR.to_string()
        }
    }
}

/// Display message for a request failure
pub fn message_for(err: &ApiError) -> String {
    let shape = err.body().map(shape_of).unwrap_or(Shape::Unrecognized);

    match shape {
        Shape::FieldValidation { errors, title } => first_field_error(errors)
            .or(title)
            .map(str::to_string)
            .unwrap_or_else(|| status_message(err.status())),
        Shape::Problem {
            title: Some(title),
            detail: Some(detail),
        } => format!("{}: {}", title, detail),
        Shape::Problem {
            title: Some(title),
            detail: None,
        } => title.to_string(),
        Shape::Text(text) => text.to_string(),
        Shape::Problem { title: None, .. } | Shape::Unrecognized => fallback_message(err),
    }
}

// =============================================================================
// Shape detection
// =============================================================================

/// Structural reading of an error body
#[derive(Debug, PartialEq)]
enum Shape<'a> {
    FieldValidation {
        errors: &'a Map<String, Value>,
        title: Option<&'a str>,
    },
    Problem {
        title: Option<&'a str>,
        detail: Option<&'a str>,
    },
    Text(&'a str),
    Unrecognized,
}

fn shape_of(body: &Value) -> Shape<'_> {
    field_validation(body)
        .or_else(|| problem(body))
        .or_else(|| text(body))
        .unwrap_or(Shape::Unrecognized)
}

/// `{ errors: { field: [msg, ..] }, title?, detail? }`
fn field_validation(body: &Value) -> Option<Shape<'_>> {
    let object = body.as_object()?;
    let (title, _) = problem_fields(object)?;
    let errors = object.get("errors")?.as_object()?;
    let well_formed = errors.values().all(|messages| {
        messages
            .as_array()
            .is_some_and(|list| list.iter().all(Value::is_string))
    });
    well_formed.then_some(Shape::FieldValidation { errors, title })
}

/// `{ title?, detail? }`
fn problem(body: &Value) -> Option<Shape<'_>> {
    let (title, detail) = problem_fields(body.as_object()?)?;
    Some(Shape::Problem { title, detail })
}

fn text(body: &Value) -> Option<Shape<'_>> {
    body.as_str()
        .filter(|s| !s.trim().is_empty())
        .map(Shape::Text)
}

/// `title` and `detail` must each be absent or a string; empty strings count as absent
fn problem_fields(object: &Map<String, Value>) -> Option<(Option<&str>, Option<&str>)> {
    let field = |key: &str| match object.get(key) {
        None => Some(None),
        Some(Value::String(s)) => Some(Some(s.as_str()).filter(|s| !s.is_empty())),
        Some(_) => None,
    };
    Some((field("title")?, field("detail")?))
}

/// First message of the first field that has one, in the server's key order
fn first_field_error(errors: &Map<String, Value>) -> Option<&str> {
    errors
        .values()
        .filter_map(Value::as_array)
        .find_map(|messages| messages.first())
        .and_then(Value::as_str)
}

fn status_message(status: Option<u16>) -> String {
    match status {
        Some(status) => format!("HTTP error {}", status),
        None => "HTTP error ?".to_string(),
    }
}

fn fallback_message(err: &ApiError) -> String {
    if let Some(status) = err.status() {
        return status_message(Some(status));
    }
    let message = err.to_string();
    if message.trim().is_empty() {
        NETWORK_ERROR.to_string()
    } else {
        message
    }
}
