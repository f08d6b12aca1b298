//! Bootstrap Redirector
//! Mission: Land a freshly loaded session on the right area for its role
//!
//! Runs once per load of the root path. The gate has already checked token
//! presence against the cookie; this handler re-resolves the token with the
//! durable-store fallback and asks the backend who the caller actually is.

use crate::gate::Role;
use crate::session::cookies::expire_cookie;
use crate::session::{ROLE_KEY, TOKEN_KEY};
use crate::server::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use std::time::Duration;
use tracing::{info, warn};

/// Role-to-landing-page table. Unrecognized labels fall back to the
/// operations dashboard.
pub fn landing_for_role(label: &str) -> &'static str {
    match Role::parse(label) {
        Some(Role::Admin) | Some(Role::SuperAdmin) => "/admin/dashboard",
        Some(Role::Commissaire) => "/gestion/dashboard",
        Some(Role::Agent) => "/gestion/controles",
        None => "/gestion/dashboard",
    }
}

pub async fn bootstrap(State(state): State<AppState>, req: Request) -> Response {
    let cookie_header = req
        .headers()
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());

    let session = state.session.session(cookie_header.as_deref());

    if session.token().is_none() {
        // Grace delay so a login still settling does not see a redirect flash
        tokio::time::sleep(Duration::from_millis(state.config.login_grace_ms)).await;
        return Redirect::temporary("/login").into_response();
    }

    match state.api.whoami(&session).await {
        Ok(who) => {
            // Revalidation succeeded: refresh the cached label
            if let Err(e) = state.session.store().set_role(&who.role) {
                warn!("Failed to refresh cached role: {e}");
            }
            let landing = landing_for_role(&who.role);
            info!(role = %who.role, landing, "Session resolved, dispatching");
            Redirect::temporary(landing).into_response()
        }
        Err(e) if e.is_auth() => {
            info!("🔐 Token rejected by backend, clearing credentials: {e}");
            if let Err(err) = state.session.store().clear() {
                warn!("Failed to clear credential store: {err}");
            }
            let mut res = Redirect::temporary("/login").into_response();
            for cookie in [expire_cookie(TOKEN_KEY), expire_cookie(ROLE_KEY)] {
                if let Ok(value) = cookie.parse() {
                    res.headers_mut().append(header::SET_COOKIE, value);
                }
            }
            res
        }
        Err(e) => {
            // Possibly-transient failure: keep credentials that may still be
            // valid and send the caller back through login
            warn!("Whoami failed during bootstrap: {e}");
            Redirect::temporary("/login").into_response()
        }
    }
}
