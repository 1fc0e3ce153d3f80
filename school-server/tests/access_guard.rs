//! Role and permission guards mounted on a bare router
//!
//! Run: cargo test -p school-server --test access_guard

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::body::Body;
use axum::routing::get;
use axum::{Router, middleware};
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use school_server::auth::{
    JwtConfig, JwtService, RoleGuard, RoleRegistry, require_permission, require_roles,
    resolve_identity,
};
use serde_json::{Value, json};
use shared::models::{Role, VIEW_ANALYTICS};
use tower::ServiceExt;

fn jwt() -> Arc<JwtService> {
    Arc::new(JwtService::with_config(JwtConfig {
        secret: "integration-test-secret-with-enough-length-0123456789".to_string(),
        expiration_minutes: 60,
        issuer: "school-auth".to_string(),
        audience: "school-server".to_string(),
    }))
}

/// `/guarded` guarded by [teacher, admin], `/analytics` guarded by `view_analytics`
fn app(jwt: Arc<JwtService>, calls: Arc<AtomicUsize>) -> Router {
    let guarded_calls = calls.clone();
    let analytics_calls = calls;

    let guarded = Router::new()
        .route(
            "/guarded",
            get(move || {
                let calls = guarded_calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    "ok"
                }
            }),
        )
        .layer(middleware::from_fn(require_roles(RoleGuard::new([
            Role::Teacher,
            Role::Admin,
        ]))));

    let analytics = Router::new()
        .route(
            "/analytics",
            get(move || {
                let calls = analytics_calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    "ok"
                }
            }),
        )
        .layer(middleware::from_fn(require_permission(
            Arc::new(RoleRegistry::default_table()),
            VIEW_ANALYTICS,
        )));

    guarded
        .merge(analytics)
        .layer(middleware::from_fn_with_state(jwt, resolve_identity))
}

fn request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn denial() -> Value {
    json!({
        "success": false,
        "message": "You do not have permission to perform this action"
    })
}

#[tokio::test]
async fn allowed_role_reaches_handler_once() {
    let jwt = jwt();
    let calls = Arc::new(AtomicUsize::new(0));
    let token = jwt.generate_token("t-1", "ms.teacher", "teacher").unwrap();

    let response = app(jwt, calls.clone())
        .oneshot(request("/guarded", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn role_outside_allow_list_gets_fixed_denial() {
    let jwt = jwt();
    let calls = Arc::new(AtomicUsize::new(0));
    let token = jwt.generate_token("s-1", "student", "student").unwrap();

    let response = app(jwt, calls.clone())
        .oneshot(request("/guarded", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await, denial());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_and_invalid_tokens_are_indistinguishable() {
    let jwt = jwt();
    let calls = Arc::new(AtomicUsize::new(0));

    let anonymous = app(jwt.clone(), calls.clone())
        .oneshot(request("/guarded", None))
        .await
        .unwrap();
    let garbage = app(jwt.clone(), calls.clone())
        .oneshot(request("/guarded", Some("not-a-jwt")))
        .await
        .unwrap();

    let other_issuer = JwtService::with_config(JwtConfig {
        secret: "a-completely-different-secret-of-sufficient-length".to_string(),
        expiration_minutes: 60,
        issuer: "school-auth".to_string(),
        audience: "school-server".to_string(),
    });
    let forged_token = other_issuer.generate_token("a-1", "admin", "admin").unwrap();
    let forged = app(jwt, calls.clone())
        .oneshot(request("/guarded", Some(&forged_token)))
        .await
        .unwrap();

    for response in [anonymous, garbage, forged] {
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await, denial());
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn admin_role_does_not_expand_into_other_guards() {
    // admin passes the [teacher, admin] guard only because it is listed
    let jwt = jwt();
    let calls = Arc::new(AtomicUsize::new(0));
    let token = jwt.generate_token("a-1", "root", "admin").unwrap();

    let admin_only = Router::new()
        .route("/teachers-only", get(|| async { "ok" }))
        .layer(middleware::from_fn(require_roles(RoleGuard::new([Role::Teacher]))))
        .layer(middleware::from_fn_with_state(jwt.clone(), resolve_identity));

    let response = admin_only
        .oneshot(request("/teachers-only", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app(jwt, calls.clone())
        .oneshot(request("/guarded", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn permission_guard_uses_registry() {
    let jwt = jwt();
    let calls = Arc::new(AtomicUsize::new(0));

    // teacher holds view_analytics, admin holds the wildcard, student holds neither
    for (role, expected) in [
        ("teacher", StatusCode::OK),
        ("admin", StatusCode::OK),
        ("student", StatusCode::FORBIDDEN),
        ("parent", StatusCode::FORBIDDEN),
        ("janitor", StatusCode::FORBIDDEN),
    ] {
        let token = jwt.generate_token("u-1", "someone", role).unwrap();
        let response = app(jwt.clone(), calls.clone())
            .oneshot(request("/analytics", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), expected, "role {role}");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
