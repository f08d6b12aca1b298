//! Application configuration

/// Runtime configuration, environment-driven with local defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Base URL of the console backend API.
    pub api_base_url: String,
    /// Console upstream that allowed navigations are forwarded to.
    pub upstream_url: String,
    pub credentials_db_path: String,
    /// Debounce before redirecting an unauthenticated root load to login.
    pub login_grace_ms: u64,
    pub api_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(3000);

        let api_base_url = std::env::var("CONSOLE_API_URL")
            .unwrap_or_else(|_| "http://localhost:8080/api".to_string());

        let upstream_url = std::env::var("CONSOLE_UPSTREAM_URL")
            .unwrap_or_else(|_| "http://localhost:3001".to_string());

        let credentials_db_path = std::env::var("CREDENTIALS_DB_PATH")
            .unwrap_or_else(|_| "./guichet_credentials.db".to_string());

        let login_grace_ms = std::env::var("LOGIN_REDIRECT_GRACE_MS")
            .unwrap_or_else(|_| "400".to_string())
            .parse()
            .unwrap_or(400);

        let api_timeout_secs = std::env::var("API_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        Ok(Self {
            port,
            api_base_url,
            upstream_url,
            credentials_db_path,
            login_grace_ms,
            api_timeout_secs,
        })
    }
}
