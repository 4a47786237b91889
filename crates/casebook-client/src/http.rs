//! reqwest-backed [`Transport`].

use std::sync::Arc;

use casebook_model::Envelope;
use casebook_sync::{Method, Request, SyncError, Transport};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, Response, Url};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::rate_limit::RateLimiter;

/// Talks to the backing API over HTTP.
///
/// Cheap to clone; clones share the connection pool and the rate limiter.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base: Url,
    limiter: Option<Arc<RateLimiter>>,
}

impl HttpTransport {
    /// Build a transport from `config`.
    ///
    /// # Errors
    ///
    /// Fails if the base URL does not parse or the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(config.base_url.clone()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base,
            limiter: None,
        })
    }

    /// Throttle every request through `limiter`, keyed by request path.
    #[must_use]
    pub fn with_rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// The API base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Absolute URL for `request`, including its query string.
    ///
    /// # Errors
    ///
    /// Fails if the path cannot be joined onto the base URL.
    pub fn url_for(&self, request: &Request) -> Result<Url> {
        let mut url = self
            .base
            .join(&request.path)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", request.path)))?;
        if let Some(id) = &request.item {
            if id.is_empty() || id == "." || id == ".." {
                return Err(ClientError::InvalidUrl(format!("invalid id '{id}'")));
            }
            url.path_segments_mut()
                .map_err(|()| ClientError::InvalidUrl(request.path.clone()))?
                .pop_if_empty()
                .push(id);
        }
        if !request.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(request.query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    fn prepare(&self, request: &Request) -> Result<reqwest::RequestBuilder> {
        if let Some(limiter) = &self.limiter {
            limiter.check(&request.rate_key())?;
        }
        let url = self.url_for(request)?;
        let builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Put => self.client.put(url),
            Method::Delete => self.client.delete(url),
        };
        Ok(match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        })
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        request: Request,
    ) -> impl Future<Output = casebook_sync::Result<Envelope>> + Send + 'static {
        let prepared = self.prepare(&request);
        let path = request.target();
        let method = request.method;
        let signal = request.signal;

        async move {
            let builder = prepared?;
            debug!(%method, %path, "sending request");
            let outcome = tokio::select! {
                biased;
                () = aborted(signal) => {
                    trace!(%method, %path, "request aborted");
                    return Err(SyncError::Cancelled);
                }
                outcome = execute(builder) => outcome,
            };
            outcome.map_err(SyncError::from)
        }
    }
}

async fn aborted(signal: Option<CancellationToken>) {
    match signal {
        Some(token) => token.cancelled().await,
        None => std::future::pending().await,
    }
}

async fn execute(builder: reqwest::RequestBuilder) -> Result<Envelope> {
    let response = builder.send().await?;
    read_envelope(response).await
}

/// Turn a response into an envelope, classifying non-success statuses.
async fn read_envelope(response: Response) -> Result<Envelope> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if status.is_success() {
        return Ok(serde_json::from_slice(&bytes)?);
    }

    let message = serde_json::from_slice::<Envelope>(&bytes)
        .ok()
        .and_then(|envelope| envelope.error);
    debug!(%status, ?message, "backend returned error status");
    Err(ClientError::from_status(status, message))
}
