use super::*;
use crate::config::Timeouts;
use crate::router::RecordingNavigator;
use crate::store::MemoryTokenStore;
use crate::test_support::{NOW, sign, token_for};

fn service(token: Option<String>) -> AuthService<MemoryTokenStore, RecordingNavigator> {
    let api = ApiClient::new("http://127.0.0.1:9", Timeouts::default()).unwrap();
    let store = token.map_or_else(MemoryTokenStore::new, MemoryTokenStore::with_token);
    AuthService::new(api, store, RecordingNavigator::new(), vec!["local".into(), "github".into()])
}

// =============================================================================
// redirect_user
// =============================================================================

#[test]
fn redirect_admin_to_admin_area() {
    let svc = service(Some(token_for("admin", 60)));
    assert_eq!(svc.redirect_user_at(NOW, None).unwrap(), Route::Admin);
    assert_eq!(svc.navigator().history(), vec![Route::Admin]);
    assert!(svc.get_token().unwrap().is_some());
}

#[test]
fn redirect_superadmin_to_admin_area() {
    let svc = service(Some(token_for("superadmin", 60)));
    assert_eq!(svc.redirect_user_at(NOW, None).unwrap(), Route::Admin);
}

#[test]
fn redirect_member_to_member_area() {
    let svc = service(Some(token_for("member", 60)));
    let mut ctx = UserContext::default();
    assert_eq!(svc.redirect_user_at(NOW, Some(&mut ctx)).unwrap(), Route::Member);
    assert!(ctx.logged_in);
}

#[test]
fn redirect_unknown_role_logs_out() {
    let svc = service(Some(token_for("guest", 60)));
    assert_eq!(svc.redirect_user_at(NOW, None).unwrap(), Route::Login);
    assert_eq!(svc.navigator().history(), vec![Route::Login]);
    assert_eq!(svc.get_token().unwrap(), None);
}

#[test]
fn redirect_missing_role_logs_out() {
    let token = sign(&serde_json::json!({ "exp": NOW + 60, "data": { "user": { "email": "x@y.z" } } }));
    let svc = service(Some(token));
    assert_eq!(svc.redirect_user_at(NOW, None).unwrap(), Route::Login);
}

#[test]
fn redirect_expired_session_logs_out() {
    let svc = service(Some(token_for("admin", -10)));
    assert_eq!(svc.redirect_user_at(NOW, None).unwrap(), Route::Login);
    assert_eq!(svc.get_token().unwrap(), None);
}

#[test]
fn redirect_without_token_goes_to_login() {
    let svc = service(None);
    let mut ctx = UserContext { logged_in: true, populated: true, user: None };
    assert_eq!(svc.redirect_user_at(NOW, Some(&mut ctx)).unwrap(), Route::Login);
    assert!(!ctx.logged_in);
    assert_eq!(svc.navigator().last(), Some(Route::Login));
}

// =============================================================================
// logged_in / tokens
// =============================================================================

#[test]
fn logged_in_returns_claims_for_active_token() {
    let svc = service(Some(token_for("member", 60)));
    let claims = svc.logged_in_at(NOW, None).unwrap().unwrap();
    assert_eq!(claims.user().name.as_deref(), Some("Ada"));
}

#[test]
fn logged_in_false_for_expired_token() {
    let svc = service(Some(token_for("member", 60)));
    assert!(svc.logged_in_at(NOW + 60, None).unwrap().is_none());
}

#[test]
fn logged_in_with_real_clock_treats_old_token_as_expired() {
    let svc = service(Some(token_for("member", 60)));
    assert!(svc.logged_in(None).unwrap().is_none());
    assert!(matches!(svc.session(None).unwrap(), SessionState::Expired(_)));
}

#[test]
fn set_then_get_token() {
    let svc = service(None);
    svc.set_token("abc").unwrap();
    assert_eq!(svc.get_token().unwrap().as_deref(), Some("abc"));
}

#[test]
fn logout_clears_token_and_navigates() {
    let svc = service(Some("abc".into()));
    assert_eq!(svc.logout().unwrap(), Route::Login);
    assert_eq!(svc.get_token().unwrap(), None);
    assert_eq!(svc.navigator().history(), vec![Route::Login]);
}

#[test]
fn auth_providers_come_from_config() {
    let svc = service(None);
    assert_eq!(svc.auth_providers(), ["local".to_owned(), "github".to_owned()]);
}

#[tokio::test]
async fn fetch_user_without_token_fails_before_network() {
    let svc = service(None);
    let err = svc.fetch_user().await.unwrap_err();
    assert!(matches!(err, AuthError::MissingToken));
}

#[tokio::test]
async fn update_token_without_token_fails_before_network() {
    let svc = service(None);
    assert!(matches!(svc.update_token().await, Err(AuthError::MissingToken)));
}

// =============================================================================
// parse_auth_response
// =============================================================================

#[test]
fn parse_auth_response_keeps_extra_fields() {
    let auth = parse_auth_response(serde_json::json!({ "token": "t", "user": { "id": 1 } })).unwrap();
    assert_eq!(auth.token, "t");
    assert_eq!(auth.rest["user"]["id"], 1);
}

#[test]
fn parse_auth_response_requires_token() {
    let err = parse_auth_response(serde_json::json!({ "ok": true })).unwrap_err();
    assert!(err.to_string().contains("auth response"));
}

#[test]
fn parse_auth_response_rejects_blank_token() {
    assert!(parse_auth_response(serde_json::json!({ "token": "  " })).is_err());
}
