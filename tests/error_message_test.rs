//! Error Normalizer Tests
//!
//! One display message per failure, whatever shape the server answered with.

use serde_json::{json, Value};
use showdesk::api::{classify, message_for, user_message, ApiError, FailureKind};

fn rejected(status: u16, body: Value) -> anyhow::Error {
    ApiError::Rejected {
        status,
        body: Some(body),
    }
    .into()
}

#[test]
fn test_field_validation_first_message() {
    let err = rejected(400, json!({"errors": {"field": ["msg1", "msg2"]}}));
    assert_eq!(user_message(&err), "msg1");
}

#[test]
fn test_field_validation_follows_key_order() {
    let err = rejected(
        400,
        json!({"errors": {"Zeta": ["from zeta"], "Alpha": ["from alpha"]}}),
    );
    assert_eq!(user_message(&err), "from zeta");
}

#[test]
fn test_field_validation_skips_empty_lists() {
    let err = rejected(400, json!({"errors": {"a": [], "b": ["second"]}}));
    assert_eq!(user_message(&err), "second");
}

#[test]
fn test_field_validation_without_messages_uses_title_then_status() {
    let err = rejected(400, json!({"errors": {}, "title": "Validation failed"}));
    assert_eq!(user_message(&err), "Validation failed");

    let err = rejected(422, json!({"errors": {"a": []}}));
    assert_eq!(user_message(&err), "HTTP error 422");
}

#[test]
fn test_problem_title_and_detail() {
    let err = rejected(409, json!({"title": "T", "detail": "D"}));
    assert_eq!(user_message(&err), "T: D");
}

#[test]
fn test_problem_title_only() {
    let err = rejected(404, json!({"title": "T"}));
    assert_eq!(user_message(&err), "T");

    let err = rejected(404, json!({"title": "T", "detail": ""}));
    assert_eq!(user_message(&err), "T");
}

#[test]
fn test_problem_without_title_falls_back_to_status() {
    let err = rejected(400, json!({"detail": "only detail"}));
    assert_eq!(user_message(&err), "HTTP error 400");

    let err = rejected(400, json!({}));
    assert_eq!(user_message(&err), "HTTP error 400");
}

#[test]
fn test_non_string_title_is_not_a_problem() {
    let err = rejected(500, json!({"title": 42}));
    assert_eq!(user_message(&err), "HTTP error 500");
}

#[test]
fn test_plain_text_verbatim() {
    let err = rejected(400, json!("oops"));
    assert_eq!(user_message(&err), "oops");

    let err = rejected(400, json!("   "));
    assert_eq!(user_message(&err), "HTTP error 400");
}

#[test]
fn test_no_body_uses_status() {
    let err = ApiError::Rejected {
        status: 500,
        body: None,
    };
    assert_eq!(message_for(&err), "HTTP error 500");
}

#[test]
fn test_transport_message_or_network_error() {
    let err = ApiError::Transport("error sending request: connection refused".into());
    assert_eq!(message_for(&err), "error sending request: connection refused");

    let err = ApiError::Transport(String::new());
    assert_eq!(message_for(&err), "Network error");
}

#[test]
fn test_non_transport_error_is_unknown() {
    let err = anyhow::anyhow!("index out of bounds");
    assert_eq!(classify(&err), FailureKind::Programming);
    assert_eq!(user_message(&err), "Unknown error");
}

#[test]
fn test_context_does_not_hide_transport_failure() {
    let err = anyhow::Error::from(ApiError::Cancelled).context("loading seasons");
    assert_eq!(classify(&err), FailureKind::Cancelled);
}

#[test]
fn test_arbitrary_bodies_never_panic() {
    let bodies = [
        json!(null),
        json!(true),
        json!([{"errors": {"a": ["x"]}}]),
        json!({"errors": null}),
        json!({"errors": {"a": "not a list"}}),
        json!({"errors": {"a": [1, "x"]}, "title": ["nested"]}),
    ];
    for body in bodies {
        let message = user_message(&rejected(418, body));
        assert!(!message.is_empty());
    }
}
