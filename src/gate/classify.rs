//! Route classification and admission rules.
//!
//! Pure, synchronous decisions: no I/O, no persisted state. Every rejection
//! maps to a redirect, never an in-place error.

/// Role labels, uppercase-normalized before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    SuperAdmin,
    Commissaire,
    Agent,
}

impl Role {
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "SUPER_ADMIN" => Some(Role::SuperAdmin),
            "COMMISSAIRE" => Some(Role::Commissaire),
            "AGENT" => Some(Role::Agent),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::Commissaire => "COMMISSAIRE",
            Role::Agent => "AGENT",
        }
    }

    /// Administration namespace: administrator tier only.
    pub fn can_access_admin(self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    /// Operations namespace: field roles plus the principal administrator.
    pub fn can_access_operations(self) -> bool {
        matches!(self, Role::Commissaire | Role::Agent | Role::SuperAdmin)
    }
}

/// Exhaustive classification of an incoming path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Root,
    Public,
    Admin,
    Operations,
    Logout,
    Unclassified,
}

/// Paths that never require a token: login, registration, the unauthorized
/// notice, the developer bypass, and documentation.
const PUBLIC_PATHS: [&str; 5] = ["/login", "/register", "/unauthorized", "/dev-access", "/docs"];

fn under(path: &str, prefix: &str) -> bool {
    path == prefix || path.starts_with(prefix) && path.as_bytes()[prefix.len()] == b'/'
}

pub fn classify(path: &str) -> RouteClass {
    if path == "/" {
        return RouteClass::Root;
    }
    if PUBLIC_PATHS.iter().any(|p| under(path, p)) {
        return RouteClass::Public;
    }
    if under(path, "/admin") {
        return RouteClass::Admin;
    }
    if under(path, "/gestion") {
        return RouteClass::Operations;
    }
    if under(path, "/auth/logout") {
        return RouteClass::Logout;
    }
    RouteClass::Unclassified
}

/// Outcome of the gate for one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    /// Redirect to login, optionally preserving the requested path as a
    /// return target.
    ToLogin { next: Option<String> },
    ToUnauthorized,
}

/// Evaluate one navigation against the admission rules.
///
/// Token and role come from the request cookies only; the durable store is a
/// concern of the dispatcher and the bootstrap handler, keeping this function
/// free of I/O.
pub fn decide(path: &str, token: Option<&str>, role_label: Option<&str>) -> GateDecision {
    match classify(path) {
        // Default-open for unclassified routes, matching observed behavior.
        RouteClass::Public | RouteClass::Unclassified => GateDecision::Allow,

        // Token presence alone decides; the role dispatch happens in the
        // bootstrap redirector.
        RouteClass::Root => {
            if token.is_some() {
                GateDecision::Allow
            } else {
                GateDecision::ToLogin { next: None }
            }
        }

        class @ (RouteClass::Admin | RouteClass::Operations | RouteClass::Logout) => {
            if token.is_none() {
                return GateDecision::ToLogin {
                    next: Some(path.to_string()),
                };
            }

            // A token without a known role is insufficient, not ambiguous-allow.
            let Some(label) = role_label else {
                return GateDecision::ToLogin {
                    next: Some(path.to_string()),
                };
            };

            let allowed = match Role::parse(label) {
                Some(role) => match class {
                    RouteClass::Admin => role.can_access_admin(),
                    RouteClass::Operations => role.can_access_operations(),
                    RouteClass::Logout => true,
                    _ => unreachable!("protected classes only"),
                },
                None => false,
            };

            if allowed {
                GateDecision::Allow
            } else {
                GateDecision::ToUnauthorized
            }
        }
    }
}
