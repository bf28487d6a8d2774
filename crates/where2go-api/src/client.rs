// Request client
//
// Wraps `reqwest::Client` with base-origin concatenation, the shared
// cookie jar, and JSON envelope parsing. Endpoint methods live in
// `user.rs` and `catalog.rs` as inherent impls so this module stays focused
// on transport mechanics.

use std::sync::Arc;

use reqwest::Method;
use reqwest::cookie::{CookieStore, Jar};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::envelope::{ApiResponse, RawEnvelope};
use crate::error::Error;
use crate::transport::TransportConfig;

/// Outcome of a single backend round-trip.
///
/// `Err` is a transport-level failure (no envelope). `Ok` carries the parsed
/// envelope, whose `success` flag the caller still has to check.
pub type RequestResult<T> = Result<ApiResponse<T>, Error>;

/// HTTP client for the Where2Go admin backend.
///
/// Single attempt per call: no retries, no cancellation. Every failure is
/// logged with the URL that was attempted and returned to the caller.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    /// Cookie jar reference, used to export and re-import the session cookie.
    cookie_jar: Arc<Jar>,
}

impl ApiClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// If the config has no cookie jar one is created: the backend keeps the
    /// session in a cookie, so credentials must be included on every call.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let cookie_jar = transport
            .cookie_jar
            .clone()
            .unwrap_or_else(|| Arc::new(Jar::default()));
        let config = TransportConfig {
            cookie_jar: Some(Arc::clone(&cookie_jar)),
            ..transport.clone()
        };
        let http = config.build_client()?;
        Ok(Self {
            http,
            base_url,
            cookie_jar,
        })
    }

    /// The configured backend origin.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Session cookie ───────────────────────────────────────────────

    /// The `Cookie` header value the jar would send to the backend, if any.
    pub fn cookie_header(&self) -> Option<String> {
        let cookies = self.cookie_jar.cookies(&self.base_url)?;
        cookies.to_str().ok().map(String::from)
    }

    /// Seed the jar from a previously exported `Cookie` header value.
    ///
    /// Returns the number of cookies restored.
    pub fn restore_cookies(&self, header: &str) -> usize {
        let mut restored = 0;
        for pair in header.split(';').map(str::trim).filter(|p| p.contains('=')) {
            self.cookie_jar.add_cookie_str(pair, &self.base_url);
            restored += 1;
        }
        debug!(restored, "restored session cookies");
        restored
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Concatenate the base origin with a relative API path.
    ///
    /// Exactly one `/` separates the two, whatever either side carries.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// `{collection}/{id}` with `id` as a single percent-encoded segment.
    ///
    /// Slashes, `?` and `#` in the id stay inside the segment, so an id can
    /// never leave its collection or add a query.
    pub fn entity_url(&self, collection: &str, id: &str) -> Result<Url, Error> {
        let mut url = self.url(collection)?;
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and parse the envelope.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> RequestResult<T> {
        let url = self.checked(self.url(path), path)?;
        self.request::<T, ()>(Method::GET, url, None).await
    }

    /// GET a single record of `collection` by id.
    pub async fn get_entity<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> RequestResult<T> {
        let url = self.checked(self.entity_url(collection, id), collection)?;
        self.request::<T, ()>(Method::GET, url, None).await
    }

    /// Send a POST request with a JSON body and parse the envelope.
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync + ?Sized),
    ) -> RequestResult<T> {
        let url = self.checked(self.url(path), path)?;
        self.request(Method::POST, url, Some(body)).await
    }

    /// Send a POST request without a body and parse the envelope.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> RequestResult<T> {
        let url = self.checked(self.url(path), path)?;
        self.request::<T, ()>(Method::POST, url, None).await
    }

    fn checked(&self, url: Result<Url, Error>, path: &str) -> Result<Url, Error> {
        url.inspect_err(|e| {
            warn!(base = %self.base_url, path, error = %e, "invalid request URL");
        })
    }

    /// The single choke point every call goes through.
    async fn request<T, B>(&self, method: Method, url: Url, body: Option<&B>) -> RequestResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        debug!("{} {}", method, url);

        let mut builder = self.http.request(method, url.clone());
        if let Some(body) = body {
            let payload = serde_json::to_vec(body).map_err(Error::Serialization)?;
            builder = builder.body(payload);
        }

        let result = match builder.send().await {
            Ok(resp) => parse_envelope(resp).await,
            Err(e) => Err(Error::Transport(e)),
        };

        if let Err(ref e) = result {
            warn!(url = %url, error = %e, "error occurred while fetching data");
        }
        result
    }
}

/// Parse the response body as an envelope.
///
/// The HTTP status is ignored: the backend reports failures via
/// `success: false`, often with a 4xx status, and that is still a parsed
/// response. Only a non-JSON body, or a successful envelope whose `data`
/// does not fit `T`, is a deserialization error.
async fn parse_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> RequestResult<T> {
    let status = resp.status();
    let body = resp.text().await.map_err(Error::Transport)?;

    serde_json::from_str::<RawEnvelope>(&body)
        .and_then(RawEnvelope::decode)
        .map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (HTTP {status}, body preview: {preview:?})"),
                body: body.clone(),
            }
        })
}
