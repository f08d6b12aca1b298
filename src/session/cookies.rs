//! Cookie parsing and expiry helpers.
//!
//! The gate and the bootstrap handler only ever need two cookies, so this
//! stays a hand-parsed header rather than pulling in a cookie jar.

/// Extract a cookie value from a `Cookie` request header.
///
/// Malformed pairs and empty values are treated as absent.
pub fn cookie_value(header: Option<&str>, name: &str) -> Option<String> {
    let header = header?;

    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Build a `Set-Cookie` value that expires the named cookie.
pub fn expire_cookie(name: &str) -> String {
    format!("{name}=; Path=/; Max-Age=0; SameSite=Lax")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value_parses_pairs() {
        let header = Some("auth_token=abc123; user_role=AGENT");

        assert_eq!(
            cookie_value(header, "auth_token").as_deref(),
            Some("abc123")
        );
        assert_eq!(cookie_value(header, "user_role").as_deref(), Some("AGENT"));
        assert_eq!(cookie_value(header, "missing"), None);
    }

    #[test]
    fn test_cookie_value_absent_header() {
        assert_eq!(cookie_value(None, "auth_token"), None);
    }

    #[test]
    fn test_empty_cookie_value_is_absent() {
        assert_eq!(cookie_value(Some("auth_token=; a=b"), "auth_token"), None);
    }

    #[test]
    fn test_malformed_pairs_are_skipped() {
        let header = Some("garbage; auth_token=tok");
        assert_eq!(cookie_value(header, "auth_token").as_deref(), Some("tok"));
    }

    #[test]
    fn test_expire_cookie_sets_max_age_zero() {
        let value = expire_cookie("auth_token");
        assert!(value.starts_with("auth_token=;"));
        assert!(value.contains("Max-Age=0"));
    }
}
