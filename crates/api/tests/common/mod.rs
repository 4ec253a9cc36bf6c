#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request, Response};
use axum::Router;
use chrono::TimeDelta;
use http_body_util::BodyExt;
use reqwest::Url;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use ordo_api::auth::google::GoogleClient;
use ordo_api::auth::oauth::OAuthManager;
use ordo_api::auth::store::MemoryStore;
use ordo_api::config::{GoogleOAuthConfig, ServerConfig, ShapeProxyConfig};
use ordo_api::proxy::ShapeProxy;
use ordo_api::router::build_app_router;
use ordo_api::state::AppState;

pub const FRONTEND: &str = "http://localhost:5173";
pub const SOURCE_ID: &str = "test-source";
pub const SOURCE_SECRET: &str = "test-secret";

/// Nothing listens on the discard port, so calls here fail fast.
const UNREACHABLE: &str = "http://127.0.0.1:9";

fn url(raw: &str) -> Url {
    Url::parse(raw).unwrap()
}

/// Build a test `ServerConfig` whose outbound endpoints are unreachable.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: String::new(),
        cors_origins: vec![HeaderValue::from_static(FRONTEND)],
        request_timeout_secs: 30,
        frontend_url: url(FRONTEND),
        google: GoogleOAuthConfig {
            client_id: "test-client".to_string(),
            client_secret: "test-client-secret".to_string(),
            redirect_url: "http://localhost:8080/auth/google/callback".to_string(),
            auth_url: url("https://accounts.google.com/o/oauth2/auth"),
            token_url: url(&format!("{UNREACHABLE}/token")),
            userinfo_url: url(&format!("{UNREACHABLE}/userinfo")),
        },
        shape: ShapeProxyConfig {
            upstream_url: url(&format!("{UNREACHABLE}/v1/shape")),
            source_id: SOURCE_ID.to_string(),
            secret: SOURCE_SECRET.to_string(),
        },
    }
}

/// Point the Google token and userinfo endpoints at a fake provider.
pub fn with_google(mut config: ServerConfig, addr: SocketAddr) -> ServerConfig {
    config.google.token_url = url(&format!("http://{addr}/token"));
    config.google.userinfo_url = url(&format!("http://{addr}/userinfo"));
    config
}

/// Point the shape proxy at a fake upstream.
pub fn with_upstream(mut config: ServerConfig, upstream: &str) -> ServerConfig {
    config.shape.upstream_url = url(upstream);
    config
}

pub fn build_state(pool: PgPool, config: &ServerConfig, token_ttl: Option<TimeDelta>) -> AppState {
    let google = GoogleClient::new(config.google.clone()).unwrap();
    let mut oauth = OAuthManager::new(
        google,
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryStore::new()),
    );
    if let Some(ttl) = token_ttl {
        oauth = oauth.with_token_ttl(ttl);
    }

    AppState {
        pool,
        config: Arc::new(config.clone()),
        oauth: Arc::new(oauth),
        shape_proxy: ShapeProxy::new(config.shape.clone()).unwrap(),
    }
}

/// Build the full application router with all middleware layers.
pub fn build_app_with(pool: PgPool, config: ServerConfig) -> Router {
    let state = build_state(pool, &config, None);
    build_app_router(state, &config)
}

pub fn build_test_app(pool: PgPool) -> Router {
    build_app_with(pool, test_config())
}

/// Serve `router` on an ephemeral local port.
pub async fn spawn_server(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// An address that refuses connections.
pub async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_with_bearer(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn json_request(app: Router, method: Method, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    json_request(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    json_request(app, Method::PUT, uri, body).await
}

/// POST a raw (possibly malformed) JSON body.
pub async fn post_raw(app: Router, uri: &str, body: &'static str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

/// The `Location` header of a redirect, parsed.
pub fn location(response: &Response<Body>) -> Url {
    let raw = response
        .headers()
        .get(header::LOCATION)
        .expect("redirect must carry a Location header")
        .to_str()
        .unwrap();
    Url::parse(raw).unwrap()
}

pub fn query_param(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
