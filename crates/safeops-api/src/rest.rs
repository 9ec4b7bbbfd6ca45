// Relation-generic async client for the SafeOps data API.
//
// Base path: /rest/v1/{relation}
// Auth: `apikey` + `Authorization: Bearer` default headers.
// Writes request `Prefer: return=representation` so the backend echoes
// the persisted rows (server-assigned ids, timestamps, defaults).

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::query::Query;
use crate::transport::TransportConfig;

// ── Error response shape from the data API ───────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the relational data API.
///
/// Schema-agnostic: callers describe queries with [`Query`] and supply
/// row types via serde. One instance is shared by every domain service.
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RestClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from the backend URL and a service API key.
    ///
    /// The key is injected as `apikey` and `Authorization: Bearer`
    /// default headers on every request.
    pub fn from_api_key(
        base_url: &str,
        api_key: &secrecy::SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();

        let mut key_value = HeaderValue::from_str(api_key.expose_secret()).map_err(|e| {
            Error::Authentication {
                message: format!("invalid API key header value: {e}"),
            }
        })?;
        key_value.set_sensitive(true);
        headers.insert("apikey", key_value.clone());

        let mut bearer =
            HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret())).map_err(|e| {
                Error::Authentication {
                    message: format!("invalid API key header value: {e}"),
                }
            })?;
        bearer.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, bearer);

        let http = transport.build_client(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Build the base URL, ensuring it ends with `/rest/v1/`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with("/rest/v1") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/rest/v1/"));
        }

        Ok(url)
    }

    /// Join a relation name onto the base URL.
    fn url(&self, relation: &str) -> Url {
        // base_url always ends with `/rest/v1/`, so joining a bare
        // relation name works.
        self.base_url
            .join(relation)
            .expect("relation should be a valid relative URL")
    }

    // ── Gateway operations ───────────────────────────────────────────

    /// Fetch all rows matching the query.
    pub async fn select<T: DeserializeOwned>(&self, query: &Query) -> Result<Vec<T>, Error> {
        let url = self.url(query.relation());
        debug!(relation = query.relation(), "GET {url}");

        let resp = self.http.get(url).query(&query.params()).send().await?;
        self.decode(resp).await
    }

    /// Fetch exactly one row; [`Error::RowNotFound`] when nothing matches.
    pub async fn select_one<T: DeserializeOwned>(&self, query: &Query) -> Result<T, Error> {
        let mut rows: Vec<T> = self.select(&query.clone().limit(1)).await?;
        rows.pop().ok_or_else(|| Error::RowNotFound {
            relation: query.relation().to_owned(),
        })
    }

    /// Insert rows, returning them as persisted.
    pub async fn insert<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        relation: &str,
        rows: &[B],
    ) -> Result<Vec<T>, Error> {
        let url = self.url(relation);
        debug!(relation, count = rows.len(), "POST {url}");

        let resp = self
            .http
            .post(url)
            .header("Prefer", "return=representation")
            .json(rows)
            .send()
            .await?;
        self.decode(resp).await
    }

    /// Insert a single row, returning it as persisted.
    ///
    /// The body still travels as a one-element array — the gateway's
    /// insert shape is always row-set in, row-set out.
    pub async fn insert_one<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        relation: &str,
        row: &B,
    ) -> Result<T, Error> {
        let mut inserted = self.insert(relation, std::slice::from_ref(row)).await?;
        inserted.pop().ok_or_else(|| Error::RowNotFound {
            relation: relation.to_owned(),
        })
    }

    /// Partial update of all rows matching the query's filters.
    ///
    /// Fields absent from `patch` are left unchanged at the backend.
    /// Returns the post-update rows; an empty vec means no row matched.
    pub async fn update<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        query: &Query,
        patch: &B,
    ) -> Result<Vec<T>, Error> {
        let url = self.url(query.relation());
        debug!(relation = query.relation(), "PATCH {url}");

        let resp = self
            .http
            .patch(url)
            .query(&query.params())
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;
        self.decode(resp).await
    }

    /// Hard-delete all rows matching the query's filters.
    ///
    /// Constraint rejections (e.g. child rows still referencing the
    /// target) surface as [`Error::Api`].
    pub async fn delete(&self, query: &Query) -> Result<(), Error> {
        let url = self.url(query.relation());
        debug!(relation = query.relation(), "DELETE {url}");

        let resp = self.http.delete(url).query(&query.params()).send().await?;
        self.check_status(resp).await?;
        Ok(())
    }

    // ── Response handling ────────────────────────────────────────────

    async fn decode<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let resp = self.check_status(resp).await?;
        let body = resp.text().await?;

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    async fn check_status(&self, resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }

        let body = resp.text().await.unwrap_or_default();
        let parsed: ErrorResponse = serde_json::from_str(&body).unwrap_or(ErrorResponse {
            message: None,
            code: None,
            details: None,
        });

        let message = parsed
            .message
            .or(parsed.details)
            .unwrap_or_else(|| status.to_string());

        Err(Error::Api {
            message,
            code: parsed.code,
            status: status.as_u16(),
        })
    }
}
