//! MyParcel async client implementation.

use crate::codec;
use crate::models::{CreatedShipment, FetchResult, Shipment};
use crate::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const BASE_URL: &str = "https://api.myparcel.nl";
const SHIPMENT_CONTENT_TYPE: &str = "application/vnd.shipment+json;version=1.1;charset=utf-8";
const USER_AGENT_VALUE: &str = concat!("myparcel-client/", env!("CARGO_PKG_VERSION"));

/// Async client for the MyParcel shipment API.
///
/// Configuration is fixed once built. Cloning is cheap and clones share one
/// connection pool, so a single client can serve concurrent tasks. To rotate
/// the API key, rebuild with [`Client::to_builder`].
#[derive(Debug, Clone)]
pub struct Client {
    inner: Arc<Inner>,
    timeout: Option<Duration>,
}

#[derive(Debug)]
struct Inner {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    headers: HeaderMap,
    proxy: Option<String>,
    user_agent: String,
    base64_api_key: bool,
    validate_locally: bool,
}

impl Client {
    /// Create a builder for configuring the client.
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Create a client with default settings.
    ///
    /// # Examples
    /// ```no_run
    /// # use myparcel_client::Client;
    /// # fn main() -> Result<(), myparcel_client::Error> {
    /// let client = Client::new("my-api-key")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(api_key).build()
    }

    /// A builder carrying this client's configuration.
    ///
    /// Use it to swap the API key without touching the client in use:
    /// ```no_run
    /// # use myparcel_client::Client;
    /// # fn main() -> Result<(), myparcel_client::Error> {
    /// # let client = Client::new("old-key")?;
    /// let rotated = client.to_builder().api_key("new-key").build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn to_builder(&self) -> ClientBuilder {
        let inner = &self.inner;
        ClientBuilder {
            api_key: SecretString::from(inner.api_key.expose_secret().to_owned()),
            base_url: inner.base_url.clone(),
            user_agent: inner.user_agent.clone(),
            proxy: inner.proxy.clone(),
            timeout: self.timeout,
            base64_api_key: inner.base64_api_key,
            validate_locally: inner.validate_locally,
        }
    }

    /// A handle on the same client whose calls give up after `timeout`.
    ///
    /// An expired deadline surfaces as [`Error::Transport`]. Dropping the
    /// future of any call cancels it as well.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            timeout: Some(timeout),
        }
    }

    /// The API base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Get the proxy URL if one was configured.
    pub fn proxy(&self) -> Option<&str> {
        self.inner.proxy.as_deref()
    }

    /// Create one shipment and return the id the API assigned to it.
    ///
    /// Both `200 OK` and `201 Created` count as success.
    ///
    /// # Examples
    /// ```no_run
    /// # use myparcel_client::{Address, Carrier, Client, Shipment};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), myparcel_client::Error> {
    /// let client = Client::new("my-api-key")?;
    /// let recipient = Address::new("NL", "Amsterdam", "Damrak", "Piet Jansen")
    ///     .number("1")
    ///     .postal_code("1012LG");
    /// let id = client
    ///     .create_shipment(&Shipment::new(recipient, Carrier::PostNl))
    ///     .await?;
    /// println!("{id}");
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip_all, fields(reference = shipment.reference_identifier.as_deref()))]
    pub async fn create_shipment(&self, shipment: &Shipment) -> Result<u64> {
        let created = self.create_shipments(std::slice::from_ref(shipment)).await?;
        created
            .first()
            .map(|c| c.id)
            .ok_or_else(|| Error::Decoding("response contained no shipment ids".to_string()))
    }

    /// Create several shipments in one call.
    ///
    /// The API answers with one entry per shipment; they are returned as-is so
    /// callers can match them to their references.
    #[instrument(skip_all, fields(count = shipments.len()))]
    pub async fn create_shipments(&self, shipments: &[Shipment]) -> Result<Vec<CreatedShipment>> {
        if self.inner.validate_locally {
            for shipment in shipments {
                shipment.validate()?;
            }
        }

        let body = codec::encode_create_request(shipments)?;
        let url = format!("{}/shipments", self.inner.base_url);
        debug!(%url, bytes = body.len(), "creating shipments");

        let request = self.request(self.inner.http.post(&url)).body(body);
        let bytes = self
            .send(request, &[StatusCode::OK, StatusCode::CREATED])
            .await?;

        let created = codec::decode_create_response(&bytes)?;
        debug!(ids = ?created.iter().map(|c| c.id).collect::<Vec<_>>(), "shipments created");
        Ok(created)
    }

    /// Fetch a shipment by id.
    ///
    /// # Examples
    /// ```no_run
    /// # use myparcel_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), myparcel_client::Error> {
    /// let client = Client::new("my-api-key")?;
    /// let found = client.get_shipment(12345).await?;
    /// for shipment in &found.shipments {
    ///     println!("{:?} {:?}", shipment.id, shipment.barcode);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self))]
    pub async fn get_shipment(&self, id: u64) -> Result<FetchResult> {
        let url = format!("{}/shipments/{id}", self.inner.base_url);
        debug!(%url, "fetching shipment");

        let request = self.request(self.inner.http.get(&url));
        let bytes = self.send(request, &[StatusCode::OK]).await?;

        let result = codec::decode_fetch_response(&bytes)?;
        debug!(results = result.results, "shipment fetched");
        Ok(result)
    }

    /// Attach the common headers and the per-call deadline.
    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.headers(self.inner.headers.clone());
        match self.timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }

    /// Send the request and return the body of an accepted response.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        accepted: &[StatusCode],
    ) -> Result<Vec<u8>> {
        let response = request.send().await?;
        let status = response.status();

        if accepted.contains(&status) {
            return Ok(response.bytes().await?.to_vec());
        }

        let body = String::from_utf8_lossy(&response.bytes().await?).into_owned();
        warn!(status = status.as_u16(), %body, "MyParcel API rejected request");
        Err(Error::Remote {
            status: status.as_u16(),
            body,
        })
    }
}

/// Builder for configuring a MyParcel client.
///
/// Start with [`Client::builder`] to override defaults.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    api_key: SecretString,
    base_url: String,
    user_agent: String,
    proxy: Option<String>,
    timeout: Option<Duration>,
    base64_api_key: bool,
    validate_locally: bool,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// Defaults:
    /// - The production API at `https://api.myparcel.nl`
    /// - User agent `myparcel-client/<version>`
    /// - No proxy and no timeout
    /// - API key sent as given
    /// - Local validation enabled
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: BASE_URL.to_string(),
            user_agent: USER_AGENT_VALUE.to_string(),
            proxy: None,
            timeout: None,
            base64_api_key: false,
            validate_locally: true,
        }
    }

    /// Replace the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = SecretString::from(api_key.into());
        self
    }

    /// Override the API base URL.
    ///
    /// Useful for testing against a local server.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the default user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set a proxy URL (e.g., "socks5://127.0.0.1:1080").
    ///
    /// This uses reqwest's proxy support for all requests.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Default deadline for every call. [`Client::with_timeout`] overrides it
    /// per call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Base64-encode the API key before sending it as the bearer token.
    ///
    /// Off by default. Turn it on only for accounts whose key the API expects
    /// in encoded form; encoding a key that is already encoded breaks it.
    pub fn base64_api_key(mut self, value: bool) -> Self {
        self.base64_api_key = value;
        self
    }

    /// Control whether shipments are checked before sending (default: true).
    ///
    /// With `false`, every rule is left to the API, which answers with
    /// [`Error::Remote`].
    pub fn validate_locally(mut self, value: bool) -> Self {
        self.validate_locally = value;
        self
    }

    /// Build the client.
    ///
    /// No request is made; a bad key only shows up on the first call.
    pub fn build(self) -> Result<Client> {
        let mut builder = reqwest::Client::builder();

        if let Some(proxy_url) = &self.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| Error::Configuration(format!("proxy {proxy_url}: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let http = builder
            .build()
            .map_err(|e| Error::Configuration(e.to_string()))?;
        let headers = self.headers()?;

        Ok(Client {
            inner: Arc::new(Inner {
                http,
                base_url: self.base_url,
                api_key: self.api_key,
                headers,
                proxy: self.proxy,
                user_agent: self.user_agent,
                base64_api_key: self.base64_api_key,
                validate_locally: self.validate_locally,
            }),
            timeout: self.timeout,
        })
    }

    /// Build headers for API requests.
    fn headers(&self) -> Result<HeaderMap> {
        let key = self.api_key.expose_secret();
        let token = if self.base64_api_key {
            BASE64.encode(key)
        } else {
            key.to_string()
        };

        let mut authorization = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| Error::InvalidHeader("authorization"))?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(SHIPMENT_CONTENT_TYPE));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent).map_err(|_| Error::InvalidHeader("user-agent"))?,
        );
        Ok(headers)
    }
}
