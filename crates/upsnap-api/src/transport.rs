// HTTP transport for the UpSnap backend.
//
// Owns the shared `reqwest::Client` and the backend base URL. Issues exactly
// one request per call and hands the raw response back untouched; status
// interpretation and decoding belong to the session and resource adapters.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::Error;

/// The raw backend response. The caller reads the body exactly once.
pub type RawResponse = reqwest::Response;

/// TLS verification mode.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (for self-signed home-lab hosts).
    DangerAcceptInvalid,
}

/// Settings for building the HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Deadline for a single request/response exchange.
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("upsnap-api/", env!("CARGO_PKG_VERSION")));

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

/// Single-request HTTP transport bound to one backend.
///
/// Cheap to clone and free of mutable state, so adapters built on it can be
/// driven from many tasks at once.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    base_url: Url,
}

impl Transport {
    /// Build a transport from a base URL and a `TransportConfig`.
    pub fn new(base_url: Url, config: &TransportConfig) -> Result<Self, Error> {
        let http = config.build_client()?;
        Self::with_client(http, base_url)
    }

    /// Wrap a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Result<Self, Error> {
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        Ok(Self { http, base_url })
    }

    /// Parse `raw` as the backend base URL and build a transport for it.
    pub fn from_str_url(raw: &str, config: &TransportConfig) -> Result<Self, Error> {
        Self::new(Url::parse(raw)?, config)
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build `{base}{path}[/{id}]`.
    ///
    /// The identifier is appended as a single percent-encoded path segment,
    /// so backend-defined ids never alter the route.
    pub fn endpoint(&self, path: &str, id: Option<&str>) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase)
            })?;
            segments
                .pop_if_empty()
                .extend(path.split('/').filter(|s| !s.is_empty()));
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    // ── Request ──────────────────────────────────────────────────────

    /// Issue one request.
    ///
    /// `Authorization: Bearer <token>` is attached only for a non-empty
    /// token. A JSON body sets `Content-Type: application/json`. Any
    /// status is returned as-is; only failures before a response exist
    /// (DNS, connect, timeout) become `Error::Transport`.
    pub async fn call<B>(
        &self,
        method: Method,
        url: Url,
        token: Option<&SecretString>,
        body: Option<&B>,
    ) -> Result<RawResponse, Error>
    where
        B: Serialize + ?Sized + Sync,
    {
        debug!("{method} {url}");

        let mut builder = self.http.request(method, url);

        if let Some(token) = token.map(|t| t.expose_secret()) {
            if !token.is_empty() {
                let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
                value.set_sensitive(true);
                builder = builder.header(AUTHORIZATION, value);
            }
        }

        if let Some(body) = body {
            builder = builder.json(body);
        }

        builder.send().await.map_err(Error::Transport)
    }

    /// Issue one request without a body.
    pub async fn call_empty(
        &self,
        method: Method,
        url: Url,
        token: Option<&SecretString>,
    ) -> Result<RawResponse, Error> {
        self.call::<()>(method, url, token, None).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn transport(base: &str) -> Transport {
        Transport::with_client(reqwest::Client::new(), Url::parse(base).unwrap()).unwrap()
    }

    #[test]
    fn endpoint_appends_collection_and_id() {
        let t = transport("http://upsnap.lan:8090");
        let url = t
            .endpoint("/api/collections/devices/records", Some("abc123"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://upsnap.lan:8090/api/collections/devices/records/abc123"
        );
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let t = transport("https://lab.example/upsnap/");
        let url = t
            .endpoint("/api/collections/device_groups/records", None)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://lab.example/upsnap/api/collections/device_groups/records"
        );
    }

    #[test]
    fn endpoint_encodes_identifier_as_one_segment() {
        let t = transport("http://h");
        let url = t
            .endpoint("/api/collections/devices/records", Some("a/b?c"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://h/api/collections/devices/records/a%2Fb%3Fc"
        );
    }

    #[test]
    fn cannot_be_a_base_url_is_rejected() {
        let result =
            Transport::with_client(reqwest::Client::new(), Url::parse("mailto:x@y").unwrap());
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
