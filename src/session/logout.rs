//! Logout action.
//!
//! Clears the durable credential mirror, expires both cookies, and always
//! answers 200 with a success envelope. Calling it twice produces the same
//! observable result.

use super::cookies::expire_cookie;
use super::{ROLE_KEY, TOKEN_KEY};
use crate::dispatch::Envelope;
use crate::server::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, warn};

pub async fn logout(State(state): State<AppState>) -> Response {
    if let Err(e) = state.session.store().clear() {
        // Still answer success: the cookies are expired below and a retry
        // of the store delete changes nothing observable
        warn!("Failed to clear credential store on logout: {e}");
    }

    info!("🗑️  Session terminated");

    let mut res = (
        StatusCode::OK,
        Json(Envelope::<()>::message("Session terminated")),
    )
        .into_response();

    for cookie in [expire_cookie(TOKEN_KEY), expire_cookie(ROLE_KEY)] {
        if let Ok(value) = cookie.parse() {
            res.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    res
}
