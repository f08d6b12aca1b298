//! Console API Client
//!
//! Generic verbs over the backend base URL. The bearer token is looked up
//! fresh on every call since a login or logout may have happened between
//! requests.

use super::DispatchError;
use crate::session::Session;
use anyhow::{Context, Result};
use reqwest::{header, Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// Identity of the current session as resolved by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct Whoami {
    pub role: String,
    #[serde(default)]
    pub username: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build API client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[inline]
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        session: &Session<'_>,
        path: &str,
        query: &[(&str, Option<String>)],
    ) -> Result<T, DispatchError> {
        self.request::<T, Value>(session, Method::GET, path, None, query)
            .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        session: &Session<'_>,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, DispatchError> {
        self.request(session, Method::POST, path, body, &[]).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        session: &Session<'_>,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, DispatchError> {
        self.request(session, Method::PUT, path, body, &[]).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        session: &Session<'_>,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, DispatchError> {
        self.request(session, Method::PATCH, path, body, &[]).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        session: &Session<'_>,
        path: &str,
    ) -> Result<T, DispatchError> {
        self.request::<T, Value>(session, Method::DELETE, path, None, &[])
            .await
    }

    /// Resolve the caller's identity - GET /auth/me
    pub async fn whoami(&self, session: &Session<'_>) -> Result<Whoami, DispatchError> {
        self.get(session, "/auth/me", &[]).await
    }

    async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        session: &Session<'_>,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: &[(&str, Option<String>)],
    ) -> Result<T, DispatchError> {
        let method_name = method.to_string();

        let mut req = self
            .client
            .request(method, self.url(path))
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = session.token() {
            req = req.bearer_auth(token);
        }

        let qp = filter_query(query);
        if !qp.is_empty() {
            req = req.query(&qp);
        }

        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| DispatchError::Transport(format!("{method_name} {path} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = server_message(&text)
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            return Err(DispatchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let value = resp.json::<Value>().await.map_err(|e| {
            DispatchError::Decode(format!("{method_name} {path}: invalid JSON response: {e}"))
        })?;

        serde_json::from_value(unwrap_envelope(value)).map_err(|e| {
            DispatchError::Decode(format!("{method_name} {path}: unexpected response shape: {e}"))
        })
    }
}

/// Drop query parameters with absent or empty values; they must never reach
/// the wire.
pub fn filter_query(params: &[(&str, Option<String>)]) -> Vec<(String, String)> {
    params
        .iter()
        .filter_map(|(key, value)| match value {
            Some(v) if !v.is_empty() => Some((key.to_string(), v.clone())),
            _ => None,
        })
        .collect()
}

/// Backend responses are either `{data, message}` envelopes or raw payloads;
/// both decode to the same caller-visible shape.
fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn server_message(text: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(text)
        .ok()
        .and_then(|body| body.message)
        .filter(|m| !m.is_empty())
}
