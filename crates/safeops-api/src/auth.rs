// Thin client for the hosted identity provider (`/auth/v1/`).
//
// Only the operations the SafeOps identity flow consumes: sign-up,
// password sign-in, sign-out, and current-user lookup. Token issuance,
// refresh, and password storage are the provider's concern.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::Error;
use crate::transport::TransportConfig;

// ── Wire types ───────────────────────────────────────────────────────

/// The provider's view of an authenticated user.
///
/// Distinct from the `users` profile relation — that row is owned by the
/// application and keyed to this id via `auth_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    /// Free-form metadata attached at sign-up (full name, role, ...).
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

/// An issued session.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub access_token: SecretString,
    #[serde(default)]
    pub refresh_token: Option<SecretString>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: AuthUser,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the auth API.
pub struct AuthClient {
    http: reqwest::Client,
    base_url: Url,
}

impl AuthClient {
    /// Build from the backend URL and the public API key.
    pub fn new(
        base_url: &str,
        api_key: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut key_value =
            HeaderValue::from_str(api_key.expose_secret()).map_err(|e| Error::Authentication {
                message: format!("invalid API key header value: {e}"),
            })?;
        key_value.set_sensitive(true);
        headers.insert("apikey", key_value);

        let http = transport.build_client(headers)?;

        let mut base_url = Url::parse(base_url)?;
        let path = base_url.path().trim_end_matches('/').to_owned();
        if path.ends_with("/auth/v1") {
            base_url.set_path(&format!("{path}/"));
        } else {
            base_url.set_path(&format!("{path}/auth/v1/"));
        }

        Ok(Self { http, base_url })
    }

    fn url(&self, path: &str) -> Url {
        self.base_url
            .join(path)
            .expect("path should be a valid relative URL")
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Register a new account, attaching free-form profile metadata.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
        metadata: serde_json::Value,
    ) -> Result<Session, Error> {
        let url = self.url("signup");
        debug!(%email, "POST {url}");

        let resp = self
            .http
            .post(url)
            .json(&json!({
                "email": email,
                "password": password.expose_secret(),
                "data": metadata,
            }))
            .send()
            .await?;
        Self::decode(resp).await
    }

    /// Password grant sign-in.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Session, Error> {
        let url = self.url("token?grant_type=password");
        debug!(%email, "POST {url}");

        let resp = self
            .http
            .post(url)
            .json(&json!({
                "email": email,
                "password": password.expose_secret(),
            }))
            .send()
            .await?;
        Self::decode(resp).await
    }

    /// Revoke the session behind `access_token`.
    pub async fn sign_out(&self, access_token: &SecretString) -> Result<(), Error> {
        let url = self.url("logout");
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .bearer_auth(access_token.expose_secret())
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Self::auth_error(resp).await)
        }
    }

    /// Fetch the user behind `access_token`.
    pub async fn get_user(&self, access_token: &SecretString) -> Result<AuthUser, Error> {
        let url = self.url("user");
        debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .bearer_auth(access_token.expose_secret())
            .send()
            .await?;
        Self::decode(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn decode<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        if !resp.status().is_success() {
            return Err(Self::auth_error(resp).await);
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    async fn auth_error(resp: reqwest::Response) -> Error {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::SessionExpired;
        }

        #[derive(Deserialize)]
        struct AuthErrorBody {
            #[serde(default, alias = "error_description", alias = "msg")]
            message: Option<String>,
        }

        let body = resp.text().await.unwrap_or_default();
        let parsed: AuthErrorBody =
            serde_json::from_str(&body).unwrap_or(AuthErrorBody { message: None });

        Error::Authentication {
            message: parsed.message.unwrap_or_else(|| status.to_string()),
        }
    }
}
