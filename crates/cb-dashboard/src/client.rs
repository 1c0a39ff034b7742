//! HTTP client for the Callboard gateway.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared_types::{Call, HealthResponse, LoginRequest, LoginResponse, PingResponse, Recording};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::requests::{ProbeOutcome, ProbeRequest};
use crate::session::Session;

/// Gateway client. Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: Client,
    base_url: String,
}

impl GatewayClient {
    /// Create a new gateway client.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of an endpoint path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /login`. Any non-2xx answer, a `success:false` body or a body
    /// lacking user or token yields no session.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ClientError> {
        let request = LoginRequest {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        };
        let response = self.http.post(self.url("/login")).json(&request).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            warn!(username, "Login rejected by gateway");
            return Err(ClientError::Unauthorized);
        }
        let body: LoginResponse = decode(response).await?;

        match (body.success, body.user, body.token) {
            (true, Some(user), Some(token)) if !token.is_empty() => {
                debug!(username = %user.username, role = %user.role, "Logged in");
                Ok(Session::new(self.clone(), user, token))
            }
            _ => Err(ClientError::Unauthorized),
        }
    }

    /// `GET /calls`
    pub async fn list_calls(&self, token: Option<&str>) -> Result<Vec<Call>, ClientError> {
        let response = authorize(self.http.get(self.url("/calls")), token)
            .send()
            .await?;
        decode(response).await
    }

    /// `GET /history`
    pub async fn list_recordings(&self, token: Option<&str>) -> Result<Vec<Recording>, ClientError> {
        let response = authorize(self.http.get(self.url("/history")), token)
            .send()
            .await?;
        decode(response).await
    }

    /// `GET /api/ping`
    pub async fn ping(&self) -> Result<PingResponse, ClientError> {
        let response = self.http.get(self.url("/api/ping")).send().await?;
        decode(response).await
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self.http.get(self.url("/health")).send().await?;
        decode(response).await
    }

    /// Send an arbitrary request and capture whatever comes back. Never
    /// fails: transport errors are reported in the outcome with status 0.
    pub async fn probe(&self, request: &ProbeRequest, token: Option<&str>) -> ProbeOutcome {
        let url = self.url(&request.endpoint);
        let mut builder = self
            .http
            .request(request.method.to_reqwest(), &url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(body) = request.wire_body() {
            builder = builder.body(body.to_string());
        }

        let result = async {
            let response = authorize(builder, token).send().await?;
            let status = response.status().as_u16();
            let text = response.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        }
        .await;

        match result {
            Ok((status, text)) => {
                debug!(method = %request.method, url = %url, status, "Probe answered");
                ProbeOutcome::answered(request.method, url, status, &text)
            }
            Err(e) => {
                warn!(method = %request.method, url = %url, error = %e, "Probe failed");
                ProbeOutcome::failed(request.method, url, e)
            }
        }
    }
}

fn authorize(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => builder.bearer_auth(token),
        None => builder,
    }
}

/// Map non-2xx to [`ClientError::Status`] and decode the body otherwise.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::{ProbeMethod, ProbePreset};
    use std::time::Duration;

    fn unreachable_client() -> GatewayClient {
        // Port 1 is reserved and refuses connections on loopback.
        let mut config = ClientConfig::new("http://127.0.0.1:1/");
        config.connect_timeout = Duration::from_millis(500);
        config.timeout = Duration::from_secs(2);
        GatewayClient::new(&config).unwrap()
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let client = unreachable_client();
        assert_eq!(client.base_url(), "http://127.0.0.1:1");
        assert_eq!(client.url("/call.php"), "http://127.0.0.1:1/call.php");
    }

    #[tokio::test]
    async fn test_login_network_failure_yields_no_session() {
        let result = unreachable_client().login("admin", "secret").await;
        assert!(matches!(result, Err(ClientError::Http(_))));
    }

    #[tokio::test]
    async fn test_probe_network_failure_is_status_zero() {
        let outcome = unreachable_client()
            .probe(&ProbePreset::VerificationCall.request(), None)
            .await;
        assert_eq!(outcome.status, 0);
        assert_eq!(outcome.method, ProbeMethod::Post);
        assert_eq!(outcome.endpoint, "http://127.0.0.1:1/call.php");
        assert!(outcome.error.unwrap().starts_with("Network error"));
    }
}
