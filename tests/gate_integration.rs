//! Gate behavior over the real router: redirects, admissions, logout.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use guichet::config::Config;
use guichet::server::{build_app, AppState};
use tempfile::NamedTempFile;
use tower::ServiceExt;

/// App wired to unreachable backend/upstream: everything the gate rejects is
/// observable as a redirect, everything it admits reaches the relay.
fn test_app() -> (Router, AppState, NamedTempFile) {
    let temp = NamedTempFile::new().unwrap();
    let config = Config {
        port: 0,
        api_base_url: "http://127.0.0.1:9/api".to_string(),
        upstream_url: "http://127.0.0.1:9".to_string(),
        credentials_db_path: temp.path().to_str().unwrap().to_string(),
        login_grace_ms: 0,
        api_timeout_secs: 1,
    };
    let state = AppState::new(config).unwrap();
    (build_app(state.clone()), state, temp)
}

fn get(path: &str, cookies: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(cookies) = cookies {
        builder = builder.header(header::COOKIE, cookies);
    }
    builder.body(Body::empty()).unwrap()
}

fn location(res: &axum::response::Response) -> Option<String> {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

#[tokio::test]
async fn missing_token_redirects_with_return_target() {
    let (app, _state, _temp) = test_app();

    let res = app.oneshot(get("/admin/users", None)).await.unwrap();

    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&res).as_deref(),
        Some("/login?next=%2Fadmin%2Fusers")
    );
}

#[tokio::test]
async fn agent_is_rejected_from_admin_namespace() {
    let (app, _state, _temp) = test_app();

    let res = app
        .oneshot(get("/admin/users", Some("auth_token=tok; user_role=AGENT")))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res).as_deref(), Some("/unauthorized"));
}

#[tokio::test]
async fn admin_role_is_rejected_from_operations_namespace() {
    let (app, _state, _temp) = test_app();

    let res = app
        .oneshot(get(
            "/gestion/controles",
            Some("auth_token=tok; user_role=ADMIN"),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res).as_deref(), Some("/unauthorized"));
}

#[tokio::test]
async fn matching_roles_are_admitted() {
    // Admitted requests reach the upstream relay, never a redirect
    let cases = [
        ("/admin/users", "auth_token=tok; user_role=super_admin"),
        ("/gestion/pv/42", "auth_token=tok; user_role=COMMISSAIRE"),
        ("/gestion/convocations", "auth_token=tok; user_role=agent"),
    ];

    for (path, cookies) in cases {
        let (app, _state, _temp) = test_app();
        let res = app.oneshot(get(path, Some(cookies))).await.unwrap();

        assert_ne!(
            res.status(),
            StatusCode::TEMPORARY_REDIRECT,
            "{path} should be admitted for {cookies}"
        );
        assert_eq!(location(&res), None, "{path} should not redirect");
    }
}

#[tokio::test]
async fn public_paths_pass_without_token() {
    for path in ["/login", "/register", "/unauthorized", "/docs/api"] {
        let (app, _state, _temp) = test_app();
        let res = app.oneshot(get(path, None)).await.unwrap();

        assert_ne!(
            res.status(),
            StatusCode::TEMPORARY_REDIRECT,
            "{path} must always be allowed"
        );
    }
}

#[tokio::test]
async fn unclassified_paths_are_default_open() {
    let (app, _state, _temp) = test_app();

    let res = app.oneshot(get("/objets-trouves", None)).await.unwrap();
    assert_ne!(res.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn token_without_role_goes_back_to_login() {
    let (app, _state, _temp) = test_app();

    let res = app
        .oneshot(get("/gestion/controles", Some("auth_token=tok")))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&res).as_deref(),
        Some("/login?next=%2Fgestion%2Fcontroles")
    );
}

#[tokio::test]
async fn health_is_live_without_credentials() {
    let (app, _state, _temp) = test_app();

    let res = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["service"], "guichet");
}

#[tokio::test]
async fn logout_clears_credentials_idempotently() {
    let (app, state, _temp) = test_app();
    state.session.store().set_token("tok").unwrap();
    state.session.store().set_role("AGENT").unwrap();

    for round in 0..2 {
        let res = app
            .clone()
            .oneshot(get("/auth/logout", Some("auth_token=tok; user_role=AGENT")))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK, "round {round}");

        let expired: Vec<String> = res
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .collect();
        assert_eq!(expired.len(), 2, "round {round}");
        assert!(expired.iter().all(|c| c.contains("Max-Age=0")));
        assert!(expired.iter().any(|c| c.starts_with("auth_token=")));
        assert!(expired.iter().any(|c| c.starts_with("user_role=")));

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], true, "round {round}");

        assert_eq!(state.session.store().token(), None, "round {round}");
        assert_eq!(state.session.store().role(), None, "round {round}");
    }
}

#[tokio::test]
async fn logout_without_token_is_gated_to_login() {
    let (app, _state, _temp) = test_app();

    let res = app.oneshot(get("/auth/logout", None)).await.unwrap();

    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&res).as_deref(),
        Some("/login?next=%2Fauth%2Flogout")
    );
}

#[tokio::test]
async fn root_without_token_is_gated_to_login() {
    let (app, _state, _temp) = test_app();

    let res = app.oneshot(get("/", None)).await.unwrap();

    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res).as_deref(), Some("/login"));
}
