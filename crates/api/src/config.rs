use axum::http::HeaderValue;
use reqwest::Url;

use crate::auth::google::{GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL, GOOGLE_USERINFO_URL};

/// Upstream shape endpoint used when `SHAPE_UPSTREAM_URL` is not set.
pub const DEFAULT_SHAPE_UPSTREAM_URL: &str = "https://api.electric-sql.cloud/v1/shape";

/// Configuration could not be loaded from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Google OAuth client settings.
///
/// The endpoint URLs default to Google's and are only overridden in tests.
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub auth_url: Url,
    pub token_url: Url,
    pub userinfo_url: Url,
}

/// Upstream shape API settings. `source_id` and `secret` are injected into
/// every proxied request.
#[derive(Debug, Clone)]
pub struct ShapeProxyConfig {
    pub upstream_url: Url,
    pub source_id: String,
    pub secret: String,
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    pub database_url: String,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<HeaderValue>,
    /// HTTP request timeout in seconds (default: `60`).
    pub request_timeout_secs: u64,
    /// Where the OAuth callback sends the browser afterwards.
    pub frontend_url: Url,
    pub google: GoogleOAuthConfig,
    pub shape: ShapeProxyConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `DATABASE_URL`         | required                   |
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8080`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `60`                       |
    /// | `FRONTEND_URL`         | `http://localhost:5173`    |
    /// | `GOOGLE_CLIENT_ID`     | required                   |
    /// | `GOOGLE_CLIENT_SECRET` | required                   |
    /// | `GOOGLE_REDIRECT_URL`  | required                   |
    /// | `SOURCE_ID`            | required                   |
    /// | `SOURCE_SECRET`        | required                   |
    /// | `SHAPE_UPSTREAM_URL`   | Electric cloud shape API   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// All missing required variables are reported together.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut missing = Vec::new();
        let mut required = |key: &'static str| {
            var(key).unwrap_or_else(|| {
                missing.push(key);
                String::new()
            })
        };

        let database_url = required("DATABASE_URL");
        let client_id = required("GOOGLE_CLIENT_ID");
        let client_secret = required("GOOGLE_CLIENT_SECRET");
        let redirect_url = required("GOOGLE_REDIRECT_URL");
        let source_id = required("SOURCE_ID");
        let secret = required("SOURCE_SECRET");

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_port(var("PORT").as_deref().unwrap_or("8080"))?;

        let cors_origins = parse_origins(
            &var("CORS_ORIGINS").unwrap_or_else(|| "http://localhost:5173".into()),
        )?;

        let request_timeout_secs: u64 = match var("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    var: "REQUEST_TIMEOUT_SECS",
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => 60,
        };

        let frontend_url = parse_url(
            "FRONTEND_URL",
            &var("FRONTEND_URL").unwrap_or_else(|| "http://localhost:5173".into()),
        )?;

        let upstream_url = parse_url(
            "SHAPE_UPSTREAM_URL",
            &var("SHAPE_UPSTREAM_URL").unwrap_or_else(|| DEFAULT_SHAPE_UPSTREAM_URL.into()),
        )?;

        Ok(Self {
            host,
            port,
            database_url,
            cors_origins,
            request_timeout_secs,
            frontend_url,
            google: GoogleOAuthConfig {
                client_id,
                client_secret,
                redirect_url,
                auth_url: parse_url("GOOGLE_AUTH_URL", GOOGLE_AUTH_URL)?,
                token_url: parse_url("GOOGLE_TOKEN_URL", GOOGLE_TOKEN_URL)?,
                userinfo_url: parse_url("GOOGLE_USERINFO_URL", GOOGLE_USERINFO_URL)?,
            },
            shape: ShapeProxyConfig {
                upstream_url,
                source_id,
                secret,
            },
        })
    }
}

/// Accepts both `8080` and the `:8080` listen-address form.
fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix(':')
        .unwrap_or(trimmed)
        .parse()
        .map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
            var: "PORT",
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                var: "CORS_ORIGINS",
                value: origin.to_string(),
                reason: e.to_string(),
            })
        })
        .collect()
}

fn parse_url(var: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
        var,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
