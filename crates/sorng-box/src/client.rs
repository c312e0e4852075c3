//! HTTP client for the Box API v2.0.
//!
//! Wraps `reqwest::Client` with bearer-token auth, per-segment URL
//! encoding, and helpers for the HTTP verbs the Box REST surface uses.
//! Each helper sends exactly one request; a non-2xx status becomes a
//! [`BoxError`] through the fixed status table. Nothing is retried.

use std::time::Duration;

use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{multipart, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::{BoxError, BoxErrorKind, BoxResult};
use crate::types::{BoxConfig, OAuthToken};

/// Box HTTP client holding one OAuth2 token.
#[derive(Clone)]
pub struct BoxClient {
    inner: Client,
    token: Option<OAuthToken>,
    config: BoxConfig,
}

impl std::fmt::Debug for BoxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxClient")
            .field("name", &self.config.name)
            .field("api_url", &self.config.api_url)
            .field("token_preview", &self.masked_token())
            .finish()
    }
}

impl BoxClient {
    // ── Construction ─────────────────────────────────────────────

    /// Create a new client from config.
    pub fn new(config: BoxConfig) -> BoxResult<Self> {
        config.validate()?;
        let inner = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| BoxError::network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner,
            token: None,
            config,
        })
    }

    /// Client against the public Box endpoints with default settings.
    pub fn default_client() -> BoxResult<Self> {
        Self::new(BoxConfig::default())
    }

    // ── Token management ─────────────────────────────────────────

    pub fn set_token(&mut self, token: OAuthToken) {
        self.token = Some(token);
    }

    /// Install a bare access token, skipping the OAuth2 flow.
    pub fn set_access_token(&mut self, access_token: &str) {
        self.token = Some(OAuthToken::bearer(access_token));
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn token(&self) -> Option<&OAuthToken> {
        self.token.as_ref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.token.as_ref().map(|t| t.access_token.as_str())
    }

    /// Whether the client holds a non-empty, unexpired token.
    pub fn is_authenticated(&self) -> bool {
        self.token
            .as_ref()
            .map(|t| !t.access_token.is_empty() && !t.is_expired())
            .unwrap_or(false)
    }

    /// Masked token for logs.
    pub fn masked_token(&self) -> String {
        match self.access_token() {
            Some(t) if t.chars().count() > 8 => {
                let head: String = t.chars().take(4).collect();
                let tail: String = t.chars().skip(t.chars().count() - 4).collect();
                format!("{head}…{tail}")
            }
            Some(_) => "****".into(),
            None => "<none>".into(),
        }
    }

    pub fn config(&self) -> &BoxConfig {
        &self.config
    }

    // ── URL construction ─────────────────────────────────────────

    /// `{api_url}/{segments...}`, each segment percent-encoded.
    pub fn api_url(&self, segments: &[&str]) -> BoxResult<Url> {
        join_segments(&self.config.api_url, segments)
    }

    /// `{upload_url}/{segments...}`, each segment percent-encoded.
    pub fn upload_url(&self, segments: &[&str]) -> BoxResult<Url> {
        join_segments(&self.config.upload_url, segments)
    }

    // ── Request building ─────────────────────────────────────────

    fn auth_headers(&self) -> BoxResult<HeaderMap> {
        let token = self
            .token
            .as_ref()
            .filter(|t| !t.access_token.is_empty())
            .ok_or_else(|| BoxError::not_authenticated("No access token set"))?;
        if token.is_expired() {
            return Err(BoxError::new(
                BoxErrorKind::TokenExpired,
                "Access token has expired",
            ));
        }
        let mut headers = HeaderMap::new();
        let val = format!("Bearer {}", token.access_token);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&val)
                .map_err(|e| BoxError::invalid(format!("Invalid auth header: {e}")))?,
        );
        Ok(headers)
    }

    fn request(&self, method: Method, url: Url) -> BoxResult<RequestBuilder> {
        let headers = self.auth_headers()?;
        Ok(self.inner.request(method, url).headers(headers))
    }

    async fn send(&self, builder: RequestBuilder) -> BoxResult<Response> {
        let request = builder.build()?;
        debug!("Box API {} {}", request.method(), request.url());
        let resp = self.inner.execute(request).await?;
        check_status(resp).await
    }

    // ── Public HTTP verb helpers ─────────────────────────────────

    /// GET a JSON response.
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> BoxResult<T> {
        let resp = self.send(self.request(Method::GET, url)?).await?;
        read_json(resp).await
    }

    /// GET with query parameters, return JSON.
    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> BoxResult<T> {
        self.get_json(with_query(url, query)).await
    }

    /// PUT a JSON body, return JSON.
    pub async fn put_json<B, T>(&self, url: Url, body: &B) -> BoxResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .send(self.request(Method::PUT, url)?.json(body))
            .await?;
        read_json(resp).await
    }

    /// POST a JSON body, return JSON.
    pub async fn post_json<B, T>(&self, url: Url, body: &B) -> BoxResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .send(self.request(Method::POST, url)?.json(body))
            .await?;
        read_json(resp).await
    }

    /// DELETE; Box answers 204 with no body.
    pub async fn delete(&self, url: Url) -> BoxResult<()> {
        self.send(self.request(Method::DELETE, url)?).await?;
        Ok(())
    }

    /// DELETE with query parameters.
    pub async fn delete_with_query(&self, url: Url, query: &[(&str, &str)]) -> BoxResult<()> {
        self.delete(with_query(url, query)).await
    }

    /// GET and hand back the raw response (for content downloads).
    pub async fn get_response(&self, url: Url) -> BoxResult<Response> {
        self.send(self.request(Method::GET, url)?).await
    }

    /// POST a `multipart/form-data` body, return JSON.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        url: Url,
        form: multipart::Form,
    ) -> BoxResult<T> {
        let resp = self
            .send(self.request(Method::POST, url)?.multipart(form))
            .await?;
        read_json(resp).await
    }

    /// POST a form to an un-authenticated endpoint (the OAuth2 token URL).
    pub async fn post_form_unauthenticated<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> BoxResult<T> {
        let url = Url::parse(url)?;
        let resp = self.send(self.inner.post(url).form(params)).await?;
        read_json(resp).await
    }
}

/// Append percent-encoded path segments to a base URL.
///
/// `.` and `..` are rejected: the URL parser would drop or resolve them
/// and the request would land on a different route.
pub fn join_segments(base: &str, segments: &[&str]) -> BoxResult<Url> {
    if let Some(bad) = segments.iter().find(|s| matches!(**s, "." | "..")) {
        return Err(BoxError::invalid(format!("Invalid path segment '{bad}'")));
    }
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| BoxError::invalid(format!("{base} cannot be used as a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Append form-encoded query pairs to a URL.
pub fn with_query(mut url: Url, query: &[(&str, &str)]) -> Url {
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    url
}

async fn check_status(resp: Response) -> BoxResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let url = resp.url().clone();
    let body = resp.text().await.unwrap_or_default();
    warn!("Box API {} returned {}", url, status);
    Err(BoxError::from_response(status.as_u16(), &body))
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> BoxResult<T> {
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
