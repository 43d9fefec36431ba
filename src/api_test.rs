use super::*;

// =============================================================================
// endpoint
// =============================================================================

#[test]
fn endpoint_joins_base_and_path() {
    assert_eq!(endpoint("http://api.test", "/auth/me"), "http://api.test/auth/me");
}

#[test]
fn endpoint_handles_trailing_and_missing_slashes() {
    assert_eq!(endpoint("http://api.test/", "/auth/me"), "http://api.test/auth/me");
    assert_eq!(endpoint("http://api.test", "auth/me"), "http://api.test/auth/me");
}

// =============================================================================
// error_message
// =============================================================================

#[test]
fn error_message_prefers_json_message_field() {
    let body = r#"{"message":"Invalid credentials","error":"unauthorized"}"#;
    assert_eq!(error_message(StatusCode::UNAUTHORIZED, body), "Invalid credentials");
}

#[test]
fn error_message_falls_back_to_error_field() {
    let body = r#"{"error":"email already registered"}"#;
    assert_eq!(error_message(StatusCode::CONFLICT, body), "email already registered");
}

#[test]
fn error_message_uses_raw_body_when_not_json() {
    assert_eq!(error_message(StatusCode::BAD_GATEWAY, "  upstream down \n"), "upstream down");
}

#[test]
fn error_message_uses_json_body_without_known_fields_verbatim() {
    let body = r#"{"code":42}"#;
    assert_eq!(error_message(StatusCode::BAD_REQUEST, body), body);
}

#[test]
fn error_message_uses_reason_phrase_for_empty_body() {
    assert_eq!(error_message(StatusCode::NOT_FOUND, ""), "Not Found");
}

// =============================================================================
// parse_body
// =============================================================================

#[test]
fn parse_body_empty_is_null() {
    assert_eq!(parse_body("").unwrap(), Value::Null);
}

#[test]
fn parse_body_decodes_json() {
    let value = parse_body(r#"{"token":"abc"}"#).unwrap();
    assert_eq!(value["token"], "abc");
}

#[test]
fn parse_body_rejects_html() {
    let err = parse_body("<html>oops</html>").unwrap_err();
    assert_eq!(crate::error::ErrorCode::error_code(&err), "E_API_PARSE");
}

#[test]
fn client_keeps_base_url() {
    let client = ApiClient::new("http://api.test", Timeouts::default()).unwrap();
    assert_eq!(client.base_url(), "http://api.test");
}
