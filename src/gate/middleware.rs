//! Route Gate middleware
//! Mission: Decide allow/redirect for every navigation before any handler runs

use super::classify::{decide, GateDecision};
use crate::session::cookies::cookie_value;
use crate::session::{ROLE_KEY, TOKEN_KEY};
use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, info};

/// Gate evaluated once per navigation. The decision is pure and synchronous;
/// only the request cookies feed it.
pub async fn route_gate(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();

    let cookie_header = req
        .headers()
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());

    let token = cookie_value(cookie_header.as_deref(), TOKEN_KEY);
    let role = cookie_value(cookie_header.as_deref(), ROLE_KEY);

    match decide(&path, token.as_deref(), role.as_deref()) {
        GateDecision::Allow => next.run(req).await,
        GateDecision::ToLogin { next: target } => {
            debug!(path, "Gate: no usable credentials, redirecting to login");
            Redirect::temporary(&login_url(target.as_deref())).into_response()
        }
        GateDecision::ToUnauthorized => {
            info!(
                path,
                role = role.as_deref().unwrap_or("-"),
                "⛔ Gate: role not admitted for namespace"
            );
            Redirect::temporary("/unauthorized").into_response()
        }
    }
}

/// Login target, preserving the originally requested path as a return
/// parameter when there is one.
pub fn login_url(next: Option<&str>) -> String {
    match next {
        Some(path) => format!("/login?next={}", urlencoding::encode(path)),
        None => "/login".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url_encodes_return_target() {
        assert_eq!(
            login_url(Some("/admin/users")),
            "/login?next=%2Fadmin%2Fusers"
        );
        assert_eq!(login_url(None), "/login");
    }

    #[test]
    fn test_login_url_handles_nested_paths() {
        assert_eq!(
            login_url(Some("/gestion/pv/42")),
            "/login?next=%2Fgestion%2Fpv%2F42"
        );
    }
}
