//! Reverse proxy for the upstream shape API.
//!
//! Client query parameters are forwarded as-is except `source_id` and
//! `secret`, which always come from server configuration. The upstream
//! response is buffered and replayed with its status and most headers.

use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::header::{CONTENT_ENCODING, CONTENT_LENGTH, TRANSFER_ENCODING};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use indexmap::IndexMap;
use reqwest::Url;

use crate::config::ShapeProxyConfig;

/// Client-level timeout for upstream requests.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("upstream request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("reading upstream body failed: {0}")]
    Body(#[source] reqwest::Error),
}

/// A fully buffered upstream response.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

#[derive(Debug, Clone)]
pub struct ShapeProxy {
    http: reqwest::Client,
    config: ShapeProxyConfig,
}

impl ShapeProxy {
    pub fn new(config: ShapeProxyConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(UPSTREAM_TIMEOUT).build()?;
        Ok(Self { http, config })
    }

    /// Upstream URL for the given client parameters. Later duplicates of a
    /// key replace earlier ones; credentials always win.
    pub fn target_url<I>(&self, params: I) -> Url
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut merged: IndexMap<String, String> = params.into_iter().collect();
        merged.insert("source_id".to_string(), self.config.source_id.clone());
        merged.insert("secret".to_string(), self.config.secret.clone());

        let mut url = self.config.upstream_url.clone();
        url.query_pairs_mut().extend_pairs(&merged);
        url
    }

    pub async fn forward<I>(&self, params: I) -> Result<UpstreamResponse, ProxyError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let url = self.target_url(params);
        tracing::debug!(
            upstream = %self.config.upstream_url,
            "Proxying shape request"
        );

        // reqwest errors embed the request URL, which carries the secret.
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ProxyError::Request(e.without_url()))?;
        let status = response.status();
        let headers = filter_headers(response.headers());
        let body = response
            .bytes()
            .await
            .map_err(|e| ProxyError::Body(e.without_url()))?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}

/// Headers that describe the upstream transfer, not the replayed body.
fn is_transfer_header(name: &HeaderName) -> bool {
    *name == CONTENT_ENCODING || *name == CONTENT_LENGTH || *name == TRANSFER_ENCODING
}

fn filter_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream {
        if !is_transfer_header(name) {
            headers.append(name.clone(), value.clone());
        }
    }
    headers
}
