//! Signed request execution with tracing instrumentation.
//!
//! This module provides [`CerbClient`], which signs every request with the
//! `Cerb-Auth` scheme, decodes the JSON envelope and maps failures onto
//! [`CerbError`].

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, DATE, HeaderMap, HeaderName, HeaderValue};
use tracing::{Span, debug, instrument, warn};
use url::Url;

use crate::credentials::Credentials;
use crate::envelope::Envelope;
use crate::error::{CerbError, ConfigError, TransportError};
use crate::form::FormPairs;
use crate::method::RestMethod;
use crate::signature::{SignatureContext, format_request_date};
use crate::{AUTH_HEADER, DEFAULT_BASE_URL};

/// Content type of every request body, including empty ones.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Endpoint probed on connect to learn the server version and build.
const PROBE_ENDPOINT: &str = "contexts/list";

/// Builder for configuring a [`CerbClient`].
///
/// The secret is digested when the builder is created; the builder never
/// holds the raw secret.
#[derive(Debug)]
pub struct CerbClientBuilder {
    credentials: Result<Credentials, ConfigError>,
    base_url: String,
    timeout: Option<Duration>,
    default_headers: HeaderMap,
}

impl CerbClientBuilder {
    fn new(access_key: impl Into<String>, secret: &str) -> Self {
        Self {
            credentials: Credentials::new(access_key, secret),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            default_headers: HeaderMap::new(),
        }
    }

    /// Sets the REST base URL (e.g. `https://cerb.example.com/rest/`).
    ///
    /// A missing trailing `/` is added when the client is built.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets an overall per-request timeout.
    ///
    /// No timeout is applied unless one is configured here.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds a header sent with every request.
    ///
    /// ## Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, CerbError> {
        let header_name = HeaderName::try_from(name.as_ref())
            .map_err(|e| ConfigError::invalid_header(name.as_ref(), e))?;
        let header_value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| ConfigError::invalid_header(name.as_ref(), e))?;
        self.default_headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Builds the client and probes `contexts/list` for version and build.
    ///
    /// ## Errors
    ///
    /// Returns an error if the configuration is invalid, the probe request
    /// fails, or the probe response lacks `__version` / `__build`.
    pub async fn connect(self) -> Result<CerbClient, CerbError> {
        let credentials = self.credentials?;

        let mut base = self.base_url;
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(ConfigError::InvalidUrl)?;

        let mut http = reqwest::Client::builder().default_headers(self.default_headers);
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http = http.build().map_err(ConfigError::HttpClient)?;

        let transport = Transport {
            http,
            base_url,
            credentials,
        };

        let probe = transport
            .send(
                RestMethod::Get,
                PROBE_ENDPOINT,
                &FormPairs::new(),
                &FormPairs::new(),
            )
            .await?;
        let version = probe.require_str("__version")?;
        let build = probe.require_str("__build")?;

        debug!(%version, %build, base_url = %transport.base_url, "Connected to Cerb");

        Ok(CerbClient {
            inner: Arc::new(ClientInner {
                transport,
                version,
                build,
            }),
        })
    }
}

/// Async client for the Cerb REST API.
///
/// Cloning is cheap; clones share the connection pool and the values
/// learned by the connect probe. The client holds no mutable state.
///
/// ## Examples
///
/// ```rust,ignore
/// use cerb::{CerbClient, FormPairs, RestMethod};
///
/// let client = CerbClient::connect("key", "secret", "https://cerb.example.com/rest/").await?;
/// let envelope = client
///     .send(RestMethod::Get, "records/ticket/1", &FormPairs::new(), &FormPairs::new())
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct CerbClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    transport: Transport,
    version: String,
    build: String,
}

impl CerbClient {
    /// Creates a builder for `access_key` and the raw `secret`.
    pub fn builder(access_key: impl Into<String>, secret: &str) -> CerbClientBuilder {
        CerbClientBuilder::new(access_key, secret)
    }

    /// Connects with default settings against `base_url`.
    ///
    /// ## Errors
    ///
    /// See [`CerbClientBuilder::connect`].
    pub async fn connect(
        access_key: impl Into<String>,
        secret: &str,
        base_url: impl Into<String>,
    ) -> Result<Self, CerbError> {
        Self::builder(access_key, secret)
            .base_url(base_url)
            .connect()
            .await
    }

    /// The server's `__version`, as reported by the connect probe.
    pub fn version(&self) -> &str {
        &self.inner.version
    }

    /// The server's `__build`, as reported by the connect probe.
    pub fn build(&self) -> &str {
        &self.inner.build
    }

    /// The normalized base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.inner.transport.base_url
    }

    pub fn access_key(&self) -> &str {
        self.inner.transport.credentials.access_key()
    }

    /// Sends a signed request and returns the decoded envelope.
    ///
    /// `endpoint` is relative to the base URL and excludes the `.json`
    /// suffix. `payload` is form-encoded as the body for every verb;
    /// `params` becomes the query string when non-empty.
    ///
    /// ## Errors
    ///
    /// - [`CerbError::Transport`] for network failures, undecodable bodies
    ///   and non-2xx responses without a failure envelope
    /// - [`CerbError::RemoteApi`] when `__status` is present and not `success`
    pub async fn send(
        &self,
        verb: RestMethod,
        endpoint: &str,
        payload: &FormPairs,
        params: &FormPairs,
    ) -> Result<Envelope, CerbError> {
        self.inner
            .transport
            .send(verb, endpoint, payload, params)
            .await
    }
}

/// Connection pool, base URL and credentials shared by every request.
#[derive(Debug)]
struct Transport {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

impl Transport {
    fn endpoint_url(&self, endpoint: &str, query: &str) -> Result<Url, ConfigError> {
        let mut url = format!("{}{}.json", self.base_url, endpoint.trim_start_matches('/'));
        if !query.is_empty() {
            url.push('?');
            url.push_str(query);
        }
        Ok(Url::parse(&url)?)
    }

    #[instrument(
        name = "cerb_request",
        skip(self, payload, params),
        fields(
            http.method = %verb,
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
        )
    )]
    async fn send(
        &self,
        verb: RestMethod,
        endpoint: &str,
        payload: &FormPairs,
        params: &FormPairs,
    ) -> Result<Envelope, CerbError> {
        let query = params.encode();
        let body = payload.encode();
        let url = self.endpoint_url(endpoint, &query)?;
        Span::current().record("http.url", url.as_str());

        // The same date string goes into the header and the signature.
        let date = format_request_date(Utc::now());
        let auth = SignatureContext {
            verb,
            date: &date,
            path: url.path(),
            query: &query,
            body: &body,
            secret_digest: self.credentials.secret_digest(),
        }
        .auth_header_value(self.credentials.access_key());

        let response = self
            .http
            .request(verb.to_reqwest(), url)
            .header(DATE, date)
            .header(CONTENT_LENGTH, body.len())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(AUTH_HEADER, auth)
            .body(body)
            .send()
            .await
            .map_err(TransportError::Request)?;

        let status = response.status();
        Span::current().record("http.status_code", status.as_u16());

        let bytes = response.bytes().await.map_err(TransportError::Request)?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            if let Ok(envelope) = Envelope::parse(&text) {
                envelope.check_status()?;
            }
            warn!(status = status.as_u16(), "Cerb returned a non-success status");
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
                body: text,
            }
            .into());
        }

        let text = String::from_utf8(bytes.to_vec()).map_err(TransportError::InvalidUtf8)?;
        let envelope = Envelope::parse(&text)?.check_status()?;

        debug!(status = status.as_u16(), "Cerb request completed");
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> Transport {
        Transport {
            http: reqwest::Client::new(),
            base_url: Url::parse(base).unwrap(),
            credentials: Credentials::new("key", "secret").unwrap(),
        }
    }

    #[test]
    fn test_endpoint_url_appends_json_suffix() {
        let t = transport("https://cerb.example.com/index.php/rest/");
        let url = t.endpoint_url("contexts/list", "").unwrap();
        assert_eq!(
            url.as_str(),
            "https://cerb.example.com/index.php/rest/contexts/list.json"
        );
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_endpoint_url_appends_query_only_when_present() {
        let t = transport("https://cerb.example.com/rest/");
        let url = t.endpoint_url("records/ticket/7", "expand=custom_").unwrap();
        assert_eq!(url.path(), "/rest/records/ticket/7.json");
        assert_eq!(url.query(), Some("expand=custom_"));
    }

    #[test]
    fn test_default_header_rejects_invalid_name() {
        let result = CerbClient::builder("key", "secret").default_header("bad header", "x");
        assert!(matches!(
            result,
            Err(CerbError::Config(ConfigError::InvalidHeader { .. }))
        ));
    }

    #[tokio::test]
    async fn test_connect_rejects_blank_access_key() {
        let result = CerbClient::builder("", "secret").connect().await;
        assert!(matches!(
            result,
            Err(CerbError::Config(ConfigError::MissingField { field: "access_key" }))
        ));
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_send_emits_tracing_events() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/contexts/list.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "__status": "success",
                "__version": "9.1",
                "__build": "1234"
            })))
            .mount(&mock_server)
            .await;

        let client = CerbClient::connect("key", "secret", mock_server.uri())
            .await
            .unwrap();
        assert_eq!(client.version(), "9.1");

        assert!(logs_contain("cerb_request"));
        assert!(logs_contain("Cerb request completed"));
        assert!(logs_contain("http.status_code"));
        assert!(!logs_contain("5ebe2294ecd0e0f08eab7690d2a6ee69"));
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_base_url() {
        let result = CerbClient::builder("key", "secret")
            .base_url("not a url")
            .connect()
            .await;
        assert!(matches!(
            result,
            Err(CerbError::Config(ConfigError::InvalidUrl(_)))
        ));
    }
}
