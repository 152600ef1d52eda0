//! HTTP access to the console API

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::Method;
use reqwest::RequestBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::TokenProvider;
use crate::error::ApiError;
use crate::error::Error;

/// Shared handle on the console API. Clones share one connection pool.
///
/// ```no_run
/// use std::time::Duration;
///
/// use alfa_lib::AlfaClient;
///
/// # fn main() -> Result<(), alfa_lib::error::Error> {
/// let client = AlfaClient::builder()
///     .url("http://localhost:5000/api")
///     .timeout(Duration::from_secs(15))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AlfaClient {
    inner: Arc<AlfaClientInner>,
}

struct AlfaClientInner {
    base_url: Url,
    token_provider: Option<Arc<dyn TokenProvider>>,
    http_client: Client,
    timeout: Option<Duration>,
}

impl AlfaClient {
    pub fn builder() -> AlfaClientBuilder<Missing> {
        AlfaClientBuilder::new()
    }

    /// Returns the API base URL. Always ends with `/`.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// A client sharing this one's connection pool that authenticates with
    /// `provider`.
    pub fn with_token_provider<T: TokenProvider + 'static>(&self, provider: T) -> AlfaClient {
        AlfaClient {
            inner: Arc::new(AlfaClientInner {
                base_url: self.inner.base_url.clone(),
                token_provider: Some(Arc::new(provider)),
                http_client: self.inner.http_client.clone(),
                timeout: self.inner.timeout,
            }),
        }
    }

    /// Resolves `path` against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", path, e)))
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, Error> {
        let mut url = self.endpoint(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        let request = self.request(Method::GET, url);
        self.send(request).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, Error> {
        let request = self.request(Method::POST, self.endpoint(path)?).json(body);
        self.send(request).await
    }

    pub(crate) async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, Error> {
        let request = self.request(Method::PUT, self.endpoint(path)?).json(body);
        self.send(request).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let request = self.request(Method::DELETE, self.endpoint(path)?);
        self.send(request).await
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        log::debug!("{} {}", method, url);
        let request = self.inner.http_client.request(method, url);
        match self.inner.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, mut request: RequestBuilder) -> Result<T, Error> {
        if let Some(provider) = &self.inner.token_provider {
            let token = provider.get_token().await?;
            request = request.bearer_auth(token.value());
        }

        let response = request.send().await.map_err(|e| self.network_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.network_error(e))?;

        if !status.is_success() {
            log::debug!("API returned {}: {}", status, body);
            return Err(ApiError::from_response(status.as_u16(), status.canonical_reason(), &body).into());
        }

        serde_json::from_str(&body).map_err(|e| ApiError::parse_with_body(e.to_string(), body).into())
    }

    fn network_error(&self, error: reqwest::Error) -> ApiError {
        match self.inner.timeout {
            Some(timeout) if error.is_timeout() => ApiError::Timeout(timeout),
            _ => ApiError::Network(error),
        }
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Builder state: base URL not given yet.
pub struct Missing;

/// Builder state: base URL given.
pub struct Set<T>(T);

/// Configures an [`AlfaClient`]. `build` only exists after `url`.
pub struct AlfaClientBuilder<U> {
    url: U,
    token_provider: Option<Arc<dyn TokenProvider>>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl AlfaClientBuilder<Missing> {
    pub fn new() -> Self {
        Self {
            url: Missing,
            token_provider: None,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the API base URL, e.g. `http://localhost:5000/api`.
    pub fn url(self, url: impl Into<String>) -> AlfaClientBuilder<Set<String>> {
        AlfaClientBuilder {
            url: Set(url.into()),
            token_provider: self.token_provider,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for AlfaClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> AlfaClientBuilder<U> {
    /// Attaches a bearer token to every request.
    pub fn token_provider<T: TokenProvider + 'static>(mut self, provider: T) -> Self {
        self.token_provider = Some(Arc::new(provider));
        self
    }

    /// Per-request deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// TCP connect deadline. Ignored when [`Self::http_client`] is given.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Reuse an existing `reqwest` client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl AlfaClientBuilder<Set<String>> {
    /// Fails on a URL that cannot serve as a base.
    pub fn build(self) -> Result<AlfaClient, Error> {
        let mut base_url = Url::parse(&self.url.0).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.url.0, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(self.url.0).into());
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let builder = match self.connect_timeout {
                    Some(connect) => Client::builder().connect_timeout(connect),
                    None => Client::builder(),
                };
                builder.build().map_err(ApiError::from)?
            }
        };

        Ok(AlfaClient {
            inner: Arc::new(AlfaClientInner {
                base_url,
                token_provider: self.token_provider,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}
