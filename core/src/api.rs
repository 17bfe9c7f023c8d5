//! Stateless request builder and response parser for the bit.ly v3 API.
//!
//! # Design
//! `BitlyApi` holds only the API base URL and the signing credentials. Each
//! operation is split into a `build_*` method that produces an `HttpRequest`
//! and a `parse_*` method that consumes an `HttpResponse`. The caller (or
//! `Client`) executes the GET in between, keeping this layer deterministic.

use serde::de::DeserializeOwned;

use crate::envelope::parse_envelope;
use crate::error::BitlyError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{
    Credentials, ExpandData, ExpandKey, Expansion, ProDomainData, ShortenData, ShortenOptions,
    ShortenedUrl, ValidateData,
};

pub const OP_SHORTEN: &str = "shorten";
pub const OP_VALIDATE: &str = "validate";
pub const OP_PRO_DOMAIN: &str = "bitly_pro_domain";
pub const OP_EXPAND: &str = "expand";

#[derive(Debug, Clone)]
pub struct BitlyApi {
    base_url: String,
    credentials: Credentials,
}

impl BitlyApi {
    pub fn new(base_url: &str, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Assemble a signed request: `login` and `apiKey` first, then `params`
    /// in the order given.
    pub fn build_request<K, V>(&self, operation: &str, params: &[(K, V)]) -> HttpRequest
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Vec::with_capacity(params.len() + 2);
        query.push(("login".to_string(), self.credentials.login().to_string()));
        query.push(("apiKey".to_string(), self.credentials.api_key().to_string()));
        query.extend(
            params
                .iter()
                .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string())),
        );
        HttpRequest {
            url: format!("{}/{operation}", self.base_url),
            query,
        }
    }

    pub fn build_shorten(&self, long_url: &str, options: &ShortenOptions) -> HttpRequest {
        let mut params = vec![("longUrl", long_url)];
        if let Some(domain) = &options.domain {
            params.push(("domain", domain.as_str()));
        }
        if let Some(x_login) = &options.x_login {
            params.push(("x_login", x_login.as_str()));
        }
        if let Some(x_api_key) = &options.x_api_key {
            params.push(("x_apiKey", x_api_key.as_str()));
        }
        self.build_request(OP_SHORTEN, &params)
    }

    pub fn build_validate(&self, x_login: &str, x_api_key: &str) -> HttpRequest {
        self.build_request(OP_VALIDATE, &[("x_login", x_login), ("x_apiKey", x_api_key)])
    }

    pub fn build_bitly_pro_domain(&self, domain: &str) -> HttpRequest {
        self.build_request(OP_PRO_DOMAIN, &[("domain", domain)])
    }

    pub fn build_expand(&self, keys: &[ExpandKey]) -> HttpRequest {
        let params: Vec<(&str, &str)> = keys.iter().map(|k| (k.param_name(), k.value())).collect();
        self.build_request(OP_EXPAND, &params)
    }

    pub fn parse_shorten(&self, response: HttpResponse) -> Result<ShortenedUrl, BitlyError> {
        decode_data::<ShortenData>(OP_SHORTEN, &response).map(ShortenedUrl::from)
    }

    /// `false` is a successful answer; only envelope or transport failures
    /// are errors.
    pub fn parse_validate(&self, response: HttpResponse) -> Result<bool, BitlyError> {
        decode_data::<ValidateData>(OP_VALIDATE, &response).map(|d| d.valid)
    }

    pub fn parse_bitly_pro_domain(&self, response: HttpResponse) -> Result<bool, BitlyError> {
        decode_data::<ProDomainData>(OP_PRO_DOMAIN, &response).map(|d| d.bitly_pro_domain)
    }

    pub fn parse_expand(&self, response: HttpResponse) -> Result<Vec<Expansion>, BitlyError> {
        let data = decode_data::<ExpandData>(OP_EXPAND, &response)?;
        Ok(data.expand.into_iter().map(Expansion::from).collect())
    }
}

/// Unwrap the envelope and decode its `data` into the operation's wire type.
fn decode_data<T: DeserializeOwned>(
    operation: &'static str,
    response: &HttpResponse,
) -> Result<T, BitlyError> {
    let envelope = parse_envelope(operation, response)?;
    serde_json::from_value(envelope.data).map_err(|e| BitlyError::malformed(operation, e.to_string()))
}
