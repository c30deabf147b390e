//! HTTP gateway client.
//!
//! Centralizes the gateway base URL and the default headers. Every request is
//! a single attempt: no retry and no client-imposed timeout.

pub mod envelope;

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Url};
use serde_json::Value;

use crate::auth::SessionStore;
use crate::config::Config;
use crate::errors::{ClientError, Result};

/// Client for the single remote gateway origin.
#[derive(Clone)]
pub struct Gateway {
    http: reqwest::Client,
    base_url: String,
    base: Url,
    session: Arc<SessionStore>,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Gateway {
    /// Create a gateway client for `base_url` using the shared session.
    pub fn new(base_url: &str, session: Arc<SessionStore>) -> Result<Self> {
        Self::build(base_url, session, false)
    }

    /// Create a gateway client from the loaded configuration.
    pub fn from_config(config: &Config, session: Arc<SessionStore>) -> Result<Self> {
        Self::build(&config.gateway_url, session, config.accept_invalid_certs)
    }

    fn build(base_url: &str, session: Arc<SessionStore>, accept_invalid_certs: bool) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        let base = Url::parse(base_url)
            .map_err(|e| ClientError::Validation(format!("Invalid gateway URL {}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::Validation(format!(
                "Gateway URL cannot carry a path: {}",
                base_url
            )));
        }

        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
            base,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Absolute URL for a gateway path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Gateway path built from raw segments, each one percent-encoded.
    ///
    /// `["files", "q3 plan/v2.pdf"]` becomes `/files/q3%20plan%2Fv2.pdf`.
    pub fn segment_path(&self, segments: &[&str]) -> String {
        let mut url = self.base.clone();
        url.set_path("");
        if let Ok(mut path) = url.path_segments_mut() {
            path.clear().extend(segments);
        }
        url.path().to_string()
    }

    /// `Bearer <token>`, or the empty string when signed out.
    pub fn authorization(&self) -> String {
        match self.session.token() {
            Some(token) => format!("Bearer {}", token),
            None => String::new(),
        }
    }

    /// Default headers for authenticated JSON requests.
    ///
    /// The `Authorization` header is always present; it is empty when no
    /// token is stored.
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, self.authorization_value());
        headers
    }

    fn authorization_value(&self) -> HeaderValue {
        HeaderValue::from_str(&self.authorization()).unwrap_or_else(|_| {
            tracing::warn!("Stored token is not a valid header value; sending empty Authorization");
            HeaderValue::from_static("")
        })
    }

    /// Authenticated JSON request.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(
            %method,
            path,
            authenticated = self.session.is_authenticated(),
            "Gateway request"
        );
        self.http.request(method, self.url(path)).headers(self.headers())
    }

    /// JSON request without credentials.
    pub fn request_unauthenticated(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(%method, path, "Gateway request (unauthenticated)");
        self.http
            .request(method, self.url(path))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
    }

    /// Authenticated request that sets its own content type (multipart uploads).
    pub fn request_raw(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(%method, path, "Gateway request (raw)");
        self.http
            .request(method, self.url(path))
            .header(AUTHORIZATION, self.authorization_value())
    }

    /// Send a request and return its JSON payload.
    ///
    /// The body is parsed regardless of status; an empty body reads as
    /// `null`. A non-2xx status becomes a [`ClientError`] whose message comes
    /// from the payload, or `"<context>: <status>"`.
    pub async fn send(&self, request: RequestBuilder, context: &str) -> Result<Value> {
        let response = request.send().await.map_err(|e| network_error(e, context))?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| network_error(e, context))?;

        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            match serde_json::from_slice::<Value>(&bytes) {
                Ok(value) => value,
                Err(e) if status.is_success() => {
                    tracing::error!("{}: malformed payload: {}", context, e);
                    return Err(ClientError::Decode(format!("{}: malformed payload", context)));
                }
                Err(_) => Value::Null,
            }
        };

        if !status.is_success() {
            let err = ClientError::from_response(status, &body, context);
            tracing::error!(status = status.as_u16(), code = err.error_code(), "{}: {}", context, err);
            return Err(err);
        }

        Ok(body)
    }

    /// Send a request and return the raw body bytes on success.
    pub async fn send_for_bytes(&self, request: RequestBuilder, context: &str) -> Result<Vec<u8>> {
        let response = request.send().await.map_err(|e| network_error(e, context))?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| network_error(e, context))?;

        if !status.is_success() {
            let body = serde_json::from_slice::<Value>(&bytes).unwrap_or(Value::Null);
            let err = ClientError::from_response(status, &body, context);
            tracing::error!(status = status.as_u16(), code = err.error_code(), "{}: {}", context, err);
            return Err(err);
        }

        Ok(bytes.to_vec())
    }

    /// GET `path` with the given query pairs.
    pub async fn get(&self, path: &str, query: &[(&str, String)], context: &str) -> Result<Value> {
        let mut request = self.request(Method::GET, path);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.send(request, context).await
    }

    /// POST a JSON body to `path`.
    pub async fn post<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        context: &str,
    ) -> Result<Value> {
        let request = self.request(Method::POST, path).json(body);
        self.send(request, context).await
    }

    /// POST to `path` without a body.
    pub async fn post_empty(&self, path: &str, context: &str) -> Result<Value> {
        self.send(self.request(Method::POST, path), context).await
    }

    /// PUT a JSON body to `path`.
    pub async fn put<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        context: &str,
    ) -> Result<Value> {
        let request = self.request(Method::PUT, path).json(body);
        self.send(request, context).await
    }

    /// DELETE `path`.
    pub async fn delete(&self, path: &str, context: &str) -> Result<Value> {
        self.send(self.request(Method::DELETE, path), context).await
    }
}

fn network_error(err: reqwest::Error, context: &str) -> ClientError {
    tracing::error!("{}: {:?}", context, err);
    ClientError::Network(format!("{}: {}", context, err))
}
