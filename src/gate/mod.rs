//! Route Gate: path classification and the admission middleware.

pub mod classify;
pub mod middleware;

pub use classify::{classify, decide, GateDecision, Role, RouteClass};
pub use middleware::{login_url, route_gate};
