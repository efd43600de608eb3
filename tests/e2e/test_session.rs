use crate::e2e::helpers;

use cinema_client::domain::auth::{AuthState, LoginRequest, RegisterRequest, Role};
use cinema_client::infrastructure::navigation::Navigator;
use cinema_client::infrastructure::storage::TokenStore;
use cinema_client::ClientError;
use helpers::stub_backend::{VALID_PASSWORD, VALID_REFRESH_TOKEN};
use helpers::TestContext;
use pretty_assertions::assert_eq;
use serde_json::Value;
use test_context::test_context;
use tokio_test::assert_ok;

fn credentials(password: &str) -> LoginRequest {
    LoginRequest {
        email: "staff@cinema.test".to_string(),
        password: password.to_string(),
    }
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_login_and_land_on_role_dashboard(ctx: &TestContext) {
    let landing = ctx.app.session.login(&credentials(VALID_PASSWORD)).await.unwrap();

    assert_eq!(landing, "/admin/dashboard");
    assert_eq!(ctx.app.navigator.current(), "/admin/dashboard");
    assert_eq!(ctx.store.access_token(), Some(ctx.backend.current_access_token()));
    assert_eq!(ctx.store.refresh_token().as_deref(), Some(VALID_REFRESH_TOKEN));
    assert_eq!(ctx.app.auth_state.current(), AuthState::authenticated(Role::Admin));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_land_customers_on_public_page(ctx: &TestContext) {
    *ctx.backend.role.lock() = Role::Customer;

    let landing = ctx.app.session.login(&credentials(VALID_PASSWORD)).await.unwrap();

    assert_eq!(landing, "/home");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_bad_credentials_without_refreshing(ctx: &TestContext) {
    let err = ctx.app.session.login(&credentials("nope")).await.unwrap_err();

    assert!(matches!(err, ClientError::Api { .. }));
    assert!(err.is_unauthorized());
    assert_eq!(ctx.backend.refresh_calls(), 0);
    assert!(ctx.store.access_token().is_none());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_register_a_customer(ctx: &TestContext) {
    let request = RegisterRequest {
        name: "Ada".to_string(),
        email: "ada@cinema.test".to_string(),
        password: "pw".to_string(),
    };

    assert_ok!(ctx.app.session.register(&request).await);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_logout_and_clear_both_tokens(ctx: &TestContext) {
    ctx.app.session.login(&credentials(VALID_PASSWORD)).await.unwrap();

    ctx.app.session.logout().unwrap();

    assert!(ctx.store.access_token().is_none());
    assert!(ctx.store.refresh_token().is_none());
    assert_eq!(ctx.app.navigator.current(), "/login");
    assert_eq!(ctx.app.auth_state.current(), AuthState::anonymous());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_expire_session_for_requests_after_logout(ctx: &TestContext) {
    ctx.app.session.login(&credentials(VALID_PASSWORD)).await.unwrap();
    ctx.app.session.logout().unwrap();

    let err = ctx.app.http.get::<Value>("/api/movies").await.unwrap_err();

    assert!(matches!(err, ClientError::SessionExpired(_)));
    assert_eq!(ctx.backend.refresh_calls(), 0);
}
