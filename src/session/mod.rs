//! Session management: credential persistence and per-request resolution.

pub mod cookies;
pub mod logout;
pub mod store;

pub use store::{CredentialStore, ROLE_KEY, TOKEN_KEY};

use cookies::cookie_value;

/// Single-instance session context, constructed at the application boundary
/// and threaded through to whichever component needs credentials.
pub struct SessionContext {
    store: CredentialStore,
}

impl SessionContext {
    pub fn new(store: CredentialStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Per-request credential view, built from the request's `Cookie` header.
    pub fn session(&self, cookie_header: Option<&str>) -> Session<'_> {
        Session {
            ctx: self,
            cookie_token: cookie_value(cookie_header, TOKEN_KEY),
            cookie_role: cookie_value(cookie_header, ROLE_KEY),
        }
    }
}

/// Per-request credentials. Reads prefer the request cookie and fall back to
/// the durable store; lookups happen on every call so a token refreshed
/// between requests is picked up without restarting anything.
pub struct Session<'a> {
    ctx: &'a SessionContext,
    cookie_token: Option<String>,
    cookie_role: Option<String>,
}

impl Session<'_> {
    pub fn token(&self) -> Option<String> {
        self.cookie_token
            .clone()
            .or_else(|| self.ctx.store.token())
    }

    pub fn role(&self) -> Option<String> {
        self.cookie_role.clone().or_else(|| self.ctx.store.role())
    }
}
