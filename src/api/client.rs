use crate::auth::TokenStore;
use crate::config::ApiConfig;
use crate::error::{ApiError, Result, RewrappedError};
use crate::metrics::ApiMetrics;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

pub type Query<'a> = [(&'a str, String)];

/// HTTP client for the Re-Wrapped backend.
///
/// Every call is a single request: no retries, no caching. Failures come back as
/// [`ApiError`] with the caller's context message prepended.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| RewrappedError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_http(http, &config.base_url, tokens))
    }

    pub fn with_http(http: reqwest::Client, base_url: &str, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, self.url(path))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        match self.tokens.get() {
            Ok(Some(token)) => builder.header(AUTHORIZATION, format!("Bearer {}", token)),
            Ok(None) => builder,
            Err(e) => {
                // A broken store means an anonymous request, not a failed one
                warn!("Could not read auth token: {}", e);
                builder
            }
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query<'_>,
        context: &str,
    ) -> Result<T> {
        let req = self.request(Method::GET, path).query(query);
        let resp = self.execute(Method::GET, path, req, context).await?;
        decode_json(resp, context).await
    }

    pub(crate) async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        context: &str,
    ) -> Result<T> {
        let mut req = self.request(method.clone(), path);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = self.execute(method, path, req, context).await?;
        decode_json(resp, context).await
    }

    pub(crate) async fn get_text(
        &self,
        path: &str,
        query: &Query<'_>,
        context: &str,
    ) -> Result<String> {
        let req = self.request(Method::GET, path).query(query);
        let resp = self.execute(Method::GET, path, req, context).await?;
        resp.text()
            .await
            .map_err(|e| ApiError::transport(context, e).into())
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        req: RequestBuilder,
        context: &str,
    ) -> Result<Response> {
        let started = Instant::now();
        ApiMetrics::record_request(method.as_str());

        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(e) => {
                ApiMetrics::record_error("transport");
                warn!(%method, path, "Request failed before a response: {}", e);
                return Err(ApiError::transport(context, e).into());
            }
        };

        ApiMetrics::record_response(started.elapsed().as_secs_f64());

        let status = resp.status();
        if status.is_success() {
            debug!(%method, path, status = status.as_u16(), "API request succeeded");
            return Ok(resp);
        }

        let bytes = resp.bytes().await.unwrap_or_default();
        let body: Option<Value> = serde_json::from_slice(&bytes).ok();
        let err = ApiError::from_response(context, status.as_u16(), body);

        ApiMetrics::record_error("status");
        warn!(
            %method,
            path,
            status = status.as_u16(),
            auth_error = err.is_auth_error(),
            "API error: {}",
            err.message
        );
        Err(err.into())
    }
}

async fn decode_json<T: DeserializeOwned>(resp: Response, context: &str) -> Result<T> {
    let status = resp.status().as_u16();
    resp.json::<T>()
        .await
        .map_err(|e| ApiError::decode(context, status, e).into())
}
