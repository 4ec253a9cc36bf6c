//! Google OAuth2 authorization-code client.
//!
//! Builds the consent-screen URL, exchanges the returned code for an access
//! token (form POST with client credentials in the body), and fetches the
//! signed-in user's profile. No retries.

use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::Deserialize;

use crate::config::GoogleOAuthConfig;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

pub const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/userinfo.profile",
];

/// Client-level timeout for every identity provider call.
pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum GoogleError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },

    #[error("could not decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// Token endpoint response. Only `access_token` is used.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Profile returned by the userinfo endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub verified_email: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GoogleClient {
    http: reqwest::Client,
    config: GoogleOAuthConfig,
}

impl GoogleClient {
    pub fn new(config: GoogleOAuthConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(PROVIDER_TIMEOUT).build()?;
        Ok(Self { http, config })
    }

    /// Consent-screen URL for a login attempt identified by `state`.
    pub fn authorization_url(&self, state: &str) -> Url {
        let mut url = self.config.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_url)
            .append_pair("scope", &SCOPES.join(" "))
            .append_pair("state", state)
            .append_pair("access_type", "offline");
        url
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, GoogleError> {
        const ENDPOINT: &str = "token";

        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_url.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];

        let response = self
            .http
            .post(self.config.token_url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&form)
            .send()
            .await
            .map_err(|source| GoogleError::Transport {
                endpoint: ENDPOINT,
                source,
            })?;

        if !response.status().is_success() {
            return Err(GoogleError::Status {
                endpoint: ENDPOINT,
                status: response.status(),
            });
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|source| GoogleError::Decode {
                endpoint: ENDPOINT,
                source,
            })
    }

    /// Fetch the profile of the user the access token belongs to.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<GoogleProfile, GoogleError> {
        const ENDPOINT: &str = "userinfo";

        let response = self
            .http
            .get(self.config.userinfo_url.clone())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|source| GoogleError::Transport {
                endpoint: ENDPOINT,
                source,
            })?;

        if response.status() != StatusCode::OK {
            return Err(GoogleError::Status {
                endpoint: ENDPOINT,
                status: response.status(),
            });
        }

        response
            .json::<GoogleProfile>()
            .await
            .map_err(|source| GoogleError::Decode {
                endpoint: ENDPOINT,
                source,
            })
    }
}
