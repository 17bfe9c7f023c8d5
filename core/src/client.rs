//! One-call facade over `BitlyApi` and a `Transport`.
//!
//! # Design
//! `Client` owns immutable credentials and a transport and nothing else, so a
//! shared `&Client` can serve concurrent callers. Every operation is exactly
//! one build, one GET and one parse; failures surface immediately.

use tracing::debug;

use crate::api::{BitlyApi, OP_EXPAND, OP_PRO_DOMAIN, OP_SHORTEN, OP_VALIDATE};
use crate::config::Config;
use crate::error::BitlyError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{Credentials, ExpandKey, Expansion, ShortenOptions, ShortenedUrl};

#[cfg(feature = "ureq")]
use crate::transport::UreqTransport;

#[cfg(feature = "ureq")]
#[derive(Debug, Clone)]
pub struct Client<T = UreqTransport> {
    api: BitlyApi,
    transport: T,
}

#[cfg(not(feature = "ureq"))]
#[derive(Debug, Clone)]
pub struct Client<T> {
    api: BitlyApi,
    transport: T,
}

#[cfg(feature = "ureq")]
impl Client<UreqTransport> {
    /// Client against the public service. No request is made until the first
    /// operation, so bad credentials only show up then.
    pub fn new(login: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_config(Credentials::new(login, api_key), Config::default())
    }

    pub fn with_config(credentials: Credentials, config: Config) -> Self {
        let transport = UreqTransport::new(config.timeout);
        Self::with_transport(credentials, &config, transport)
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(credentials: Credentials, config: &Config, transport: T) -> Self {
        Self {
            api: BitlyApi::new(&config.api_url, credentials),
            transport,
        }
    }

    pub fn login(&self) -> &str {
        self.api.credentials().login()
    }

    pub fn api_key(&self) -> &str {
        self.api.credentials().api_key()
    }

    pub fn api(&self) -> &BitlyApi {
        &self.api
    }

    /// Shorten `long_url`. Whether the hash is new is taken from the service
    /// on every call; nothing is cached.
    pub fn shorten(
        &self,
        long_url: &str,
        options: &ShortenOptions,
    ) -> Result<ShortenedUrl, BitlyError> {
        let request = self.api.build_shorten(long_url, options);
        let url = self.api.parse_shorten(self.send(OP_SHORTEN, &request)?)?;
        debug!(
            user_hash = url.user_hash(),
            new_hash = url.is_new_hash(),
            "shortened url"
        );
        Ok(url)
    }

    /// Check a third-party login/API key pair. Invalid credentials yield
    /// `Ok(false)`.
    pub fn validate(&self, x_login: &str, x_api_key: &str) -> Result<bool, BitlyError> {
        let request = self.api.build_validate(x_login, x_api_key);
        self.api.parse_validate(self.send(OP_VALIDATE, &request)?)
    }

    /// Alias of [`Client::validate`].
    pub fn is_valid(&self, x_login: &str, x_api_key: &str) -> Result<bool, BitlyError> {
        self.validate(x_login, x_api_key)
    }

    /// Whether `domain` is a pro domain. A malformed domain is a service
    /// error, not `Ok(false)`.
    pub fn bitly_pro_domain(&self, domain: &str) -> Result<bool, BitlyError> {
        let request = self.api.build_bitly_pro_domain(domain);
        self.api.parse_bitly_pro_domain(self.send(OP_PRO_DOMAIN, &request)?)
    }

    /// Resolve short URLs or hashes back to their long URLs, in input order.
    pub fn expand(&self, keys: &[ExpandKey]) -> Result<Vec<Expansion>, BitlyError> {
        let request = self.api.build_expand(keys);
        self.api.parse_expand(self.send(OP_EXPAND, &request)?)
    }

    fn send(&self, operation: &str, request: &HttpRequest) -> Result<HttpResponse, BitlyError> {
        debug!(operation, login = self.login(), url = %request.url, "sending request");
        let response = self.transport.get(request)?;
        debug!(operation, status = response.status, "received response");
        Ok(response)
    }
}
