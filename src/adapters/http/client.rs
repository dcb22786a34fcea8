//! Shared HTTP transport for the downstream services
//!
//! Owns timeouts, the bearer token, context headers and the retry policy so
//! the facade implementations only deal with request and response shapes.

use crate::adapters::traits::DownstreamResult;
use crate::config::{HttpConfig, RetryConfig, SecretString};
use crate::domain::errors::DownstreamError;
use crate::domain::{EndpointKey, RequestContext, Result, RouterError};
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::time::Duration;

/// HTTP client with retry and per-event headers
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    retry: RetryConfig,
    auth_token: Option<SecretString>,
}

impl HttpClient {
    /// Build the client from the `[http]` configuration section
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds));

        if !config.tls_verify {
            tracing::warn!("TLS certificate verification is disabled");
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            RouterError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            client,
            retry: config.retry.clone(),
            auth_token: config.auth_token.clone(),
        })
    }

    /// GET `url`, returning `None` on 404
    pub async fn get_optional(
        &self,
        endpoint: EndpointKey,
        ctx: &RequestContext,
        url: &str,
    ) -> DownstreamResult<Option<String>> {
        self.execute(endpoint, ctx, Method::GET, url, None).await
    }

    /// GET `url`; a 404 is an error
    pub async fn get(
        &self,
        endpoint: EndpointKey,
        ctx: &RequestContext,
        url: &str,
    ) -> DownstreamResult<String> {
        let body = self.get_optional(endpoint, ctx, url).await?;
        body.ok_or_else(|| not_found(endpoint))
    }

    /// POST `body` as JSON to `url`, returning the response text
    pub async fn post_json(
        &self,
        endpoint: EndpointKey,
        ctx: &RequestContext,
        url: &str,
        body: &Value,
    ) -> DownstreamResult<String> {
        let response = self
            .execute(endpoint, ctx, Method::POST, url, Some(body))
            .await?;
        response.ok_or_else(|| not_found(endpoint))
    }

    async fn execute(
        &self,
        endpoint: EndpointKey,
        ctx: &RequestContext,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> DownstreamResult<Option<String>> {
        tracing::debug!(
            endpoint = %endpoint,
            method = %method,
            url = %url,
            correlation_id = ctx.correlation_id(),
            "Calling downstream service"
        );

        self.retry_request(endpoint, || async {
            let mut request = self.request(method.clone(), url, ctx);
            if let Some(body) = body {
                request = request.json(body);
            }

            let resp = request
                .send()
                .await
                .map_err(|e| transport_error(endpoint, &e))?;

            let status = resp.status();
            if status == StatusCode::NOT_FOUND {
                return Ok(None);
            }

            let text = resp.text().await.map_err(|e| DownstreamError::InvalidResponse {
                endpoint,
                message: e.to_string(),
            })?;

            if status.is_success() {
                Ok(Some(text))
            } else if status.is_server_error() {
                Err(DownstreamError::ServerError {
                    endpoint,
                    status: status.as_u16(),
                    message: text,
                })
            } else if status.is_client_error() {
                Err(DownstreamError::ClientError {
                    endpoint,
                    status: status.as_u16(),
                    message: text,
                })
            } else {
                Err(DownstreamError::InvalidResponse {
                    endpoint,
                    message: format!("unexpected status {status}"),
                })
            }
        })
        .await
    }

    /// Request carrying the context headers and bearer token
    fn request(&self, method: Method, url: &str, ctx: &RequestContext) -> RequestBuilder {
        let mut request = self.client.request(method, url);

        for (name, value) in ctx.headers() {
            request = request.header(name.as_str(), value.as_str());
        }

        if let Some(ref token) = self.auth_token {
            let token: &str = token.expose_secret().as_ref();
            request = request.bearer_auth(token);
        }

        request
    }

    /// Retry a request with exponential backoff
    ///
    /// Only connection failures, timeouts and 5xx responses are retried.
    async fn retry_request<F, T, Fut>(&self, endpoint: EndpointKey, operation: F) -> DownstreamResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = DownstreamResult<T>>,
    {
        let max_retries = self.retry.max_retries;
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    attempt += 1;
                    if !e.is_retryable() || attempt >= max_retries {
                        return Err(e);
                    }

                    let delay_ms = backoff_delay_ms(&self.retry, attempt);

                    tracing::warn!(
                        endpoint = %endpoint,
                        attempt = attempt,
                        max_retries = max_retries,
                        delay_ms = delay_ms,
                        error = %e,
                        "Retrying request after error"
                    );

                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }
}

/// Delay before retry number `attempt` (1-based), capped at `max_delay_ms`
fn backoff_delay_ms(retry: &RetryConfig, attempt: usize) -> u64 {
    let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
    let delay = retry.initial_delay_ms as f64 * retry.backoff_multiplier.powi(exponent);
    if delay.is_finite() {
        (delay as u64).min(retry.max_delay_ms)
    } else {
        retry.max_delay_ms
    }
}

fn transport_error(endpoint: EndpointKey, error: &reqwest::Error) -> DownstreamError {
    if error.is_builder() {
        DownstreamError::InvalidRequest {
            endpoint,
            message: error.to_string(),
        }
    } else if error.is_timeout() {
        DownstreamError::Timeout {
            endpoint,
            message: error.to_string(),
        }
    } else {
        DownstreamError::ConnectionFailed {
            endpoint,
            message: error.to_string(),
        }
    }
}

fn not_found(endpoint: EndpointKey) -> DownstreamError {
    DownstreamError::ClientError {
        endpoint,
        status: StatusCode::NOT_FOUND.as_u16(),
        message: "not found".to_string(),
    }
}
