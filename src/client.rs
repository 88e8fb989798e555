//! Vanish async client implementation.

use crate::models::{
    DeleteEmailResponse, DeleteMailboxResponse, DomainsResponse, ErrorBody, GenerateRequest,
    GenerateResponse,
};
use crate::{AttachmentContent, EmailDetail, EmailSummary, Error, PaginatedEmailList, Result};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Request timeout used when the builder is not given one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Page size used by [`Client::list_emails`] callers that have no preference.
pub const DEFAULT_LIST_LIMIT: u32 = 20;

const USER_AGENT_VALUE: &str = concat!("vanish-client/", env!("CARGO_PKG_VERSION"));

/// Largest page the server accepts; used when draining a mailbox.
const MAX_LIST_LIMIT: u32 = 100;

/// Everything except RFC 3986 unreserved characters, so `@`, `+` and `/`
/// stay inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Async client for the Vanish temporary email service.
///
/// Use [`Client::new`] for defaults or [`Client::builder`] for custom settings
/// like an API key, timeout, proxy, or user agent. Configuration is fixed at
/// construction; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
    has_api_key: bool,
    timeout: Duration,
    proxy: Option<String>,
}

impl Client {
    /// Create a builder for configuring the client.
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    /// Create a new client without authentication and with the default timeout.
    ///
    /// No network request is made; reachability is not checked.
    ///
    /// # Examples
    /// ```no_run
    /// # use vanish_client::Client;
    /// # fn main() -> Result<(), vanish_client::Error> {
    /// let client = Client::new("https://api.vanish.host")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(base_url).build()
    }

    /// Base URL with trailing slashes removed.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Per-request timeout passed to the transport.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the proxy URL if one was configured.
    ///
    /// Returns `None` when no proxy was set on the builder.
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    /// Whether requests carry an `Authorization: Bearer` header.
    pub fn has_api_key(&self) -> bool {
        self.has_api_key
    }

    /// List the domains new addresses can be generated on.
    ///
    /// # Examples
    /// ```no_run
    /// # use vanish_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), vanish_client::Error> {
    /// let client = Client::new("https://api.vanish.host")?;
    /// for domain in client.get_domains().await? {
    ///     println!("{domain}");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_domains(&self) -> Result<Vec<String>> {
        let response: DomainsResponse = self
            .send_json(self.request(Method::GET, &["domains"]))
            .await?;
        Ok(response.domains)
    }

    /// Generate a unique temporary email address.
    ///
    /// # Arguments
    /// * `domain` - Domain to generate on; server picks one when `None`
    /// * `prefix` - Local-part prefix; server picks one when `None`
    ///
    /// Empty strings are treated like `None`. When neither is given the
    /// request is sent without a body.
    ///
    /// # Returns
    /// The full email address assigned by the server
    ///
    /// # Examples
    /// ```no_run
    /// # use vanish_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), vanish_client::Error> {
    /// let client = Client::new("https://api.vanish.host")?;
    /// let email = client.generate_email(None, Some("signup-test")).await?;
    /// println!("{email}");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn generate_email(
        &self,
        domain: Option<&str>,
        prefix: Option<&str>,
    ) -> Result<String> {
        let body = GenerateRequest {
            domain: domain.filter(|d| !d.is_empty()),
            prefix: prefix.filter(|p| !p.is_empty()),
        };

        let mut request = self.request(Method::POST, &["mailbox"]);
        if !body.is_empty() {
            request = request.body(serde_json::to_vec(&body)?);
        }

        let response: GenerateResponse = self.send_json(request).await?;
        Ok(response.email)
    }

    /// List one page of emails for a mailbox address.
    ///
    /// # Arguments
    /// * `address` - The full email address
    /// * `limit` - Page size; the server accepts 1-100 and enforces it
    /// * `cursor` - Cursor from a previous page's `next_cursor`, or `None` for the first page
    ///
    /// # Examples
    /// ```no_run
    /// # use vanish_client::{Client, DEFAULT_LIST_LIMIT};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), vanish_client::Error> {
    /// let client = Client::new("https://api.vanish.host")?;
    /// let page = client.list_emails("box@vanish.host", DEFAULT_LIST_LIMIT, None).await?;
    /// for email in &page.data {
    ///     println!("{}: {}", email.sender, email.subject);
    /// }
    /// if let Some(cursor) = page.next_cursor.as_deref() {
    ///     let next = client.list_emails("box@vanish.host", DEFAULT_LIST_LIMIT, Some(cursor)).await?;
    ///     println!("{} more", next.data.len());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_emails(
        &self,
        address: &str,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<PaginatedEmailList> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }

        self.send_json(self.request(Method::GET, &["mailbox", address]).query(&query))
            .await
    }

    /// Fetch every email in a mailbox by following pagination cursors.
    ///
    /// Issues one request per page of 100 until the server stops returning a cursor.
    pub async fn list_all_emails(&self, address: &str) -> Result<Vec<EmailSummary>> {
        let mut emails = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self
                .list_emails(address, MAX_LIST_LIMIT, cursor.as_deref())
                .await?;
            emails.extend(page.data);
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => return Ok(emails),
            }
        }
    }

    /// Fetch the full content of a specific email.
    ///
    /// # Arguments
    /// * `email_id` - The email ID from a listing
    ///
    /// # Examples
    /// ```no_run
    /// # use vanish_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), vanish_client::Error> {
    /// let client = Client::new("https://api.vanish.host")?;
    /// let detail = client.get_email("0b1c2d3e").await?;
    /// println!("{}", detail.text);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_email(&self, email_id: &str) -> Result<EmailDetail> {
        self.send_json(self.request(Method::GET, &["email", email_id]))
            .await
    }

    /// Download an attachment.
    ///
    /// The body is returned untouched together with the response headers.
    pub async fn get_attachment(
        &self,
        email_id: &str,
        attachment_id: &str,
    ) -> Result<AttachmentContent> {
        let response = self
            .send(self.request(
                Method::GET,
                &["email", email_id, "attachments", attachment_id],
            ))
            .await?;

        let headers = response.headers().clone();
        let data = response.bytes().await?.to_vec();
        Ok(AttachmentContent { data, headers })
    }

    /// Delete a specific email.
    ///
    /// # Returns
    /// The server's `success` flag, `false` when the field is missing
    pub async fn delete_email(&self, email_id: &str) -> Result<bool> {
        let response: DeleteEmailResponse = self
            .send_json(self.request(Method::DELETE, &["email", email_id]))
            .await?;
        Ok(response.success)
    }

    /// Delete all emails in a mailbox.
    ///
    /// # Returns
    /// Number of emails deleted, `0` when the field is missing
    ///
    /// # Examples
    /// ```no_run
    /// # use vanish_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), vanish_client::Error> {
    /// let client = Client::new("https://api.vanish.host")?;
    /// let deleted = client.delete_mailbox("box@vanish.host").await?;
    /// println!("{deleted}");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn delete_mailbox(&self, address: &str) -> Result<u64> {
        let response: DeleteMailboxResponse = self
            .send_json(self.request(Method::DELETE, &["mailbox", address]))
            .await?;
        Ok(response.deleted)
    }

    /// Start a request to the endpoint made of `segments`, each percent-encoded.
    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.http
            .request(method, self.endpoint(segments))
            .headers(self.headers.clone())
    }

    /// Join encoded path segments onto the base URL.
    fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.extend(utf8_percent_encode(segment, PATH_SEGMENT));
        }
        url
    }

    /// Send a request and turn non-2xx statuses into [`Error::Api`].
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = request.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        let response = self.http.execute(request).await?;
        let status = response.status();
        debug!(%method, %path, status = status.as_u16(), "vanish api response");

        if status.is_success() {
            Ok(response)
        } else {
            Err(Self::api_error(status, response).await)
        }
    }

    /// Send a request and decode its JSON body.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let body = self.send(request).await?.bytes().await?;
        serde_json::from_slice(&body).map_err(Into::into)
    }

    /// Build an API error from a failed response, preferring the body's `error` field.
    async fn api_error(status: StatusCode, response: Response) -> Error {
        let message = response
            .bytes()
            .await
            .ok()
            .and_then(|body| serde_json::from_slice::<ErrorBody>(&body).ok())
            .and_then(|body| body.error)
            .unwrap_or_else(|| {
                format!(
                    "HTTP Error {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                )
            });

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }
}

/// Create a client for `base_url`, authenticated when `api_key` is given.
///
/// Shorthand for the common builder chain.
pub fn create_client(base_url: impl Into<String>, api_key: Option<&str>) -> Result<Client> {
    let mut builder = ClientBuilder::new(base_url);
    if let Some(key) = api_key {
        builder = builder.api_key(key);
    }
    builder.build()
}

/// Builder for configuring a Vanish client.
///
/// Start with [`Client::builder`] to override defaults.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    proxy: Option<String>,
    danger_accept_invalid_certs: bool,
    user_agent: String,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// Defaults:
    /// - No API key
    /// - 30 second timeout
    /// - No proxy
    /// - `danger_accept_invalid_certs = false`
    /// - `vanish-client/<version>` user agent
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            proxy: None,
            danger_accept_invalid_certs: false,
            user_agent: USER_AGENT_VALUE.to_string(),
        }
    }

    /// Send `Authorization: Bearer <key>` with every request.
    ///
    /// An empty key is ignored.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        let key = api_key.into();
        self.api_key = (!key.is_empty()).then_some(key);
        self
    }

    /// Set the per-request timeout (default: 30 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a proxy URL (e.g., "http://127.0.0.1:8080" or "socks5://127.0.0.1:9050").
    ///
    /// This uses reqwest's proxy support for all requests.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Control whether to accept invalid TLS certificates (default: false).
    ///
    /// Only meant for self-hosted deployments with self-signed certificates.
    pub fn danger_accept_invalid_certs(mut self, value: bool) -> Self {
        self.danger_accept_invalid_certs = value;
        self
    }

    /// Override the default user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the client.
    ///
    /// The base URL is checked for syntax only; no network request is made.
    ///
    /// # Examples
    /// ```no_run
    /// # use vanish_client::Client;
    /// # use std::time::Duration;
    /// # fn main() -> Result<(), vanish_client::Error> {
    /// let client = Client::builder("https://api.vanish.host/")
    ///     .api_key("your-key")
    ///     .timeout(Duration::from_secs(10))
    ///     .user_agent("my-app/1.0")
    ///     .build()?;
    /// assert_eq!(client.base_url(), "https://api.vanish.host");
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<Client> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .danger_accept_invalid_certs(self.danger_accept_invalid_certs);

        if let Some(proxy_url) = &self.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url).map_err(Error::Build)?);
        }

        let http = builder.build().map_err(Error::Build)?;

        let base_url = self.base_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|err| Error::InvalidUrl {
            url: self.base_url.clone(),
            reason: err.to_string(),
        })?;

        Ok(Client {
            http,
            base_url,
            headers: self.headers()?,
            has_api_key: self.api_key.is_some(),
            timeout: self.timeout,
            proxy: self.proxy,
        })
    }

    /// Headers sent with every request.
    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent)
                .map_err(|_| Error::InvalidHeader("user agent"))?,
        );

        if let Some(key) = &self.api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|_| Error::InvalidHeader("api key"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use percent_encoding::percent_decode_str;

    fn client(base_url: &str) -> Client {
        Client::new(base_url).unwrap()
    }

    #[test]
    fn strips_trailing_slashes() {
        assert_eq!(client("http://localhost:3000/").base_url(), "http://localhost:3000");
        assert_eq!(client("http://localhost:3000//").base_url(), "http://localhost:3000");
        assert_eq!(client("http://localhost:3000").base_url(), "http://localhost:3000");
    }

    #[test]
    fn address_stays_one_path_segment() {
        let url = client("http://localhost").endpoint(&["mailbox", "a+b/c@example.com"]);
        assert_eq!(url, "http://localhost/mailbox/a%2Bb%2Fc%40example.com");
    }

    #[test]
    fn encoded_segment_round_trips() {
        for address in [
            "a+b@example.com",
            "first.last@vanish.host",
            "we!rd#?&=%@example.com",
            "ünï@example.com",
            "tilde~under_score-dash@example.com",
        ] {
            let encoded = utf8_percent_encode(address, PATH_SEGMENT).to_string();
            assert!(!encoded.contains('@') && !encoded.contains('/'));
            let decoded = percent_decode_str(&encoded).decode_utf8().unwrap();
            assert_eq!(decoded, address);
        }
    }

    #[test]
    fn unreserved_characters_are_not_escaped() {
        let encoded = utf8_percent_encode("a-b.c_d~e", PATH_SEGMENT).to_string();
        assert_eq!(encoded, "a-b.c_d~e");
    }

    #[test]
    fn builder_defaults() {
        let client = client("http://localhost");
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);
        assert!(!client.has_api_key());
        assert_eq!(client.proxy(), None);
        assert!(!client.headers.contains_key(AUTHORIZATION));
        assert_eq!(client.headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn api_key_sets_sensitive_bearer_header() {
        let client = Client::builder("http://localhost")
            .api_key("secret")
            .build()
            .unwrap();
        let value = &client.headers[AUTHORIZATION];
        assert_eq!(value, "Bearer secret");
        assert!(value.is_sensitive());
        assert!(client.has_api_key());
    }

    #[test]
    fn empty_api_key_is_ignored() {
        let client = create_client("http://localhost", Some("")).unwrap();
        assert!(!client.has_api_key());
    }

    #[test]
    fn malformed_base_url_is_rejected_at_build() {
        let err = Client::new("not a url").unwrap_err();
        assert!(matches!(&err, Error::InvalidUrl { url, .. } if url == "not a url"));
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn invalid_api_key_is_rejected() {
        let err = Client::builder("http://localhost")
            .api_key("bad\nkey")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidHeader("api key")));
    }
}
