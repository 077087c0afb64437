// Async HTTP client for the Headscale REST API.
//
// Base path: /api/v1/
// Auth: Authorization: Bearer <api key>

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::{ApiTransport, TransportConfig};

// ── Error response shape (gRPC gateway) ──────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Headscale REST API.
///
/// Injects the bearer token on every request and maps non-2xx responses
/// into typed [`Error`]s. Cheap to share behind an `Arc`.
pub struct HeadscaleClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HeadscaleClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a server URL, API key and transport config.
    pub fn from_api_key(
        base_url: &str,
        api_key: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
            .map_err(|e| Error::InvalidApiKey(format!("invalid header value: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base URL ends with `/` so relative joins keep any
    /// reverse-proxy path prefix (e.g. `https://host/headscale/`).
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response(resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| {
            let end = body.char_indices().nth(200).map_or(body.len(), |(i, _)| i);
            let preview = &body[..end];
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::Unauthorized;
        }

        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                }
            });

        if status == reqwest::StatusCode::FORBIDDEN {
            Error::Forbidden { message }
        } else {
            Error::Http {
                status: status.as_u16(),
                message,
            }
        }
    }
}

impl ApiTransport for HeadscaleClient {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={query:?}");

        let resp = self.http.get(url).query(query).send().await?;
        Self::handle_response(resp).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    async fn delete(&self, path: &str, query: &[(&str, String)]) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url} params={query:?}");

        let resp = self.http.delete(url).query(query).send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let url = HeadscaleClient::normalize_base_url("https://hs.example.com").unwrap();
        assert_eq!(url.as_str(), "https://hs.example.com/");
    }

    #[test]
    fn proxy_prefix_survives_join() {
        let client =
            HeadscaleClient::from_reqwest("https://example.com/headscale", reqwest::Client::new())
                .unwrap();
        let url = client.url("/api/v1/node").unwrap();
        assert_eq!(url.as_str(), "https://example.com/headscale/api/v1/node");
    }
}
