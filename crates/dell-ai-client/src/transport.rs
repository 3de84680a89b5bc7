use std::sync::Arc;

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;

use dell_ai_common::{HubError, Result};

use crate::config::ClientConfig;
use crate::credentials::CredentialProvider;

/// Single-attempt JSON transport to the Hub.
pub struct Transport {
    http: Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl Transport {
    pub fn new(config: &ClientConfig, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("dell-ai/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HubError::api(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialProvider> {
        &self.credentials
    }

    /// Issue one request against `{base_url}{path}` and decode the JSON body.
    ///
    /// When `authenticated` is set and no token is stored, fails with
    /// `HubError::Authentication` without touching the network.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, &str)]>,
        body: Option<&Value>,
        authenticated: bool,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        self.send(method, &url, path, query, body, authenticated)
            .await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::GET, path, None, None, true).await
    }

    /// Authenticated GET against an absolute URL outside the Hub (identity provider).
    pub async fn get_absolute<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.send(Method::GET, url, "/user", None, None, true).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        path: &str,
        query: Option<&[(&str, &str)]>,
        body: Option<&Value>,
        authenticated: bool,
    ) -> Result<T> {
        let mut builder = self.http.request(method.clone(), url);
        if authenticated {
            let token = self
                .credentials
                .token()?
                .ok_or_else(|| HubError::auth("Not logged in. Run `dell-ai auth login` first."))?;
            builder = builder.bearer_auth(token);
        }
        if let Some(q) = query {
            builder = builder.query(q);
        }
        if let Some(b) = body {
            builder = builder.json(b);
        }

        tracing::debug!(%method, url, "hub request");
        let resp = builder.send().await.map_err(transport_error)?;
        let status = resp.status();
        tracing::debug!(%method, url, status = status.as_u16(), "hub response");

        let text = resp.text().await.map_err(transport_error)?;
        if status.is_success() {
            return serde_json::from_str(&text).map_err(|e| HubError::Api {
                status: Some(status.as_u16()),
                message: format!("Invalid JSON response: {e}"),
                body: Some(text),
            });
        }

        Err(match status.as_u16() {
            401 | 403 => HubError::auth("Authentication failed. Please check your token."),
            404 => not_found(path),
            code => HubError::Api {
                status: Some(code),
                message: format!("API error ({code}): {}", summarize(&text)),
                body: Some(text),
            },
        })
    }
}

fn transport_error(e: reqwest::Error) -> HubError {
    if e.is_timeout() {
        HubError::api(format!("Request timed out: {e}"))
    } else if e.is_connect() {
        HubError::api(format!("Connection error: {e}"))
    } else {
        HubError::api(format!("Request failed: {e}"))
    }
}

/// `/models/org/name` -> ("models", "org/name").
fn not_found(path: &str) -> HubError {
    let trimmed = path.trim_start_matches('/');
    match trimmed.split_once('/') {
        Some((kind, id)) => HubError::not_found(kind, id),
        None => HubError::not_found("resource", trimmed),
    }
}

fn summarize(body: &str) -> String {
    const MAX: usize = 200;
    let body = body.trim();
    if body.is_empty() {
        return "<empty body>".to_string();
    }
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::StaticCredentials;
    use crate::testing::{spawn_hub, TOKEN};

    fn transport(base_url: &str, token: Option<&str>) -> Transport {
        let cfg = ClientConfig::default().with_base_url(base_url);
        let creds = Arc::new(StaticCredentials::new(token.map(str::to_string)));
        Transport::new(&cfg, creds).unwrap()
    }

    #[test]
    fn test_not_found_splits_path() {
        match not_found("/models/test-model") {
            HubError::ResourceNotFound {
                resource_type,
                resource_id,
            } => {
                assert_eq!(resource_type, "models");
                assert_eq!(resource_id, "test-model");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_summarize_truncates() {
        let long = "x".repeat(500);
        assert_eq!(summarize(&long).len(), 203);
        assert_eq!(summarize(""), "<empty body>");
    }

    #[tokio::test]
    async fn test_get_success_sends_bearer() {
        let hub = spawn_hub().await;
        let t = transport(&hub, Some(TOKEN));
        let v: Value = t.get("/models").await.unwrap();
        assert_eq!(v["models"][0], "org/model");
    }

    #[tokio::test]
    async fn test_missing_token_fails_before_network() {
        // Nothing listens here; reaching the network would yield an Api error.
        let t = transport("http://127.0.0.1:9", None);
        let err = t.get::<Value>("/models").await.unwrap_err();
        assert!(matches!(err, HubError::Authentication(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_authentication() {
        let hub = spawn_hub().await;
        let t = transport(&hub, Some("wrong-token"));
        let err = t.get::<Value>("/models").await.unwrap_err();
        assert!(
            matches!(err, HubError::Authentication(ref m) if m.contains("Authentication failed")),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn test_not_found_carries_resource() {
        let hub = spawn_hub().await;
        let t = transport(&hub, Some(TOKEN));
        let err = t.get::<Value>("/models/org/missing").await.unwrap_err();
        match err {
            HubError::ResourceNotFound {
                resource_type,
                resource_id,
            } => {
                assert_eq!(resource_type, "models");
                assert_eq!(resource_id, "org/missing");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_keeps_status_and_body() {
        let hub = spawn_hub().await;
        let t = transport(&hub, Some(TOKEN));
        let err = t.get::<Value>("/broken").await.unwrap_err();
        match err {
            HubError::Api {
                status,
                message,
                body,
            } => {
                assert_eq!(status, Some(500));
                assert!(message.contains("Internal Server Error"));
                assert_eq!(body.as_deref(), Some("Internal Server Error"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_api_error() {
        let hub = spawn_hub().await;
        let t = transport(&hub, Some(TOKEN));
        let err = t.get::<Value>("/garbage").await.unwrap_err();
        match err {
            HubError::Api { message, .. } => assert!(message.contains("Invalid JSON response")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_api_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let t = transport(&format!("http://{addr}"), Some(TOKEN));
        let err = t.get::<Value>("/models").await.unwrap_err();
        assert!(matches!(err, HubError::Api { status: None, .. }), "{err:?}");
    }

    #[tokio::test]
    async fn test_unauthenticated_request_skips_token() {
        let hub = spawn_hub().await;
        let t = transport(&hub, None);
        let v: Value = t
            .request(Method::GET, "/public/ping", None, None, false)
            .await
            .unwrap();
        assert_eq!(v["ok"], true);
    }

    #[tokio::test]
    async fn test_forbidden_maps_to_authentication() {
        let hub = spawn_hub().await;
        let t = transport(&hub, Some(TOKEN));
        let err = t.get::<Value>("/forbidden").await.unwrap_err();
        assert!(
            matches!(err, HubError::Authentication(ref m) if m.contains("Authentication failed")),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn test_query_params_are_sent() {
        let hub = spawn_hub().await;
        let t = transport(&hub, Some(TOKEN));
        let query = [("sku", "sku-a"), ("filter", "a b,c")];
        let v: Value = t
            .request(Method::GET, "/echo", Some(&query), None, true)
            .await
            .unwrap();
        assert_eq!(v["query"]["sku"], "sku-a");
        assert_eq!(v["query"]["filter"], "a b,c");
    }

    #[tokio::test]
    async fn test_json_body_is_sent() {
        let hub = spawn_hub().await;
        let t = transport(&hub, Some(TOKEN));
        let body = serde_json::json!({ "num_gpus": 4, "tags": ["a", "b"] });
        let v: Value = t
            .request(Method::POST, "/echo", Some(&[("dry_run", "true")]), Some(&body), true)
            .await
            .unwrap();
        assert_eq!(v["body"], body);
        assert_eq!(v["query"]["dry_run"], "true");
    }
}
