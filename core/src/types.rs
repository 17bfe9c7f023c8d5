//! Domain types for the bit.ly v3 API.
//!
//! # Design
//! Entities expose read-only accessors; their fields are only ever filled
//! from a decoded `data` payload. Wire structs (`*Data`) mirror the service's
//! snake_case JSON and are decoded with serde, so a missing or mistyped field
//! fails the whole mapping instead of producing a half-populated value.

use std::fmt;

use serde::{Deserialize, Deserializer};

/// Account credentials used to sign every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    login: String,
    api_key: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            api_key: api_key.into(),
        }
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Optional parameters for `shorten`. Absent fields send nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortenOptions {
    /// Short domain to issue the hash under, e.g. `j.mp`.
    pub domain: Option<String>,
    /// Act on behalf of this account. Must be paired with `x_api_key`.
    pub x_login: Option<String>,
    pub x_api_key: Option<String>,
}

impl ShortenOptions {
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn x_login(mut self, x_login: impl Into<String>) -> Self {
        self.x_login = Some(x_login.into());
        self
    }

    pub fn x_api_key(mut self, x_api_key: impl Into<String>) -> Self {
        self.x_api_key = Some(x_api_key.into());
        self
    }
}

/// A short link to resolve with `expand`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpandKey {
    /// A full short URL such as `http://bit.ly/9uX1TE`.
    ShortUrl(String),
    /// A bare hash such as `9uX1TE`.
    Hash(String),
}

impl ExpandKey {
    /// Query parameter name the service expects for this key.
    pub fn param_name(&self) -> &'static str {
        match self {
            ExpandKey::ShortUrl(_) => "shortUrl",
            ExpandKey::Hash(_) => "hash",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            ExpandKey::ShortUrl(v) | ExpandKey::Hash(v) => v,
        }
    }
}

/// The result of shortening a long URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenedUrl {
    long_url: String,
    short_url: String,
    user_hash: String,
    global_hash: String,
    new_hash: bool,
}

impl ShortenedUrl {
    /// The canonical long URL as the service recorded it.
    pub fn long_url(&self) -> &str {
        &self.long_url
    }

    pub fn short_url(&self) -> &str {
        &self.short_url
    }

    /// Hash scoped to the requesting account.
    pub fn user_hash(&self) -> &str {
        &self.user_hash
    }

    /// Hash shared by every account that shortened this long URL.
    pub fn global_hash(&self) -> &str {
        &self.global_hash
    }

    /// True iff this call created the hash, as reported by the service.
    pub fn is_new_hash(&self) -> bool {
        self.new_hash
    }
}

/// `data` payload of a successful `shorten` call.
#[derive(Debug, Deserialize)]
pub(crate) struct ShortenData {
    long_url: String,
    url: String,
    hash: String,
    global_hash: String,
    #[serde(deserialize_with = "flag")]
    new_hash: bool,
}

impl From<ShortenData> for ShortenedUrl {
    fn from(data: ShortenData) -> Self {
        Self {
            long_url: data.long_url,
            short_url: data.url,
            user_hash: data.hash,
            global_hash: data.global_hash,
            new_hash: data.new_hash,
        }
    }
}

/// `data` payload of a successful `validate` call.
#[derive(Debug, Deserialize)]
pub(crate) struct ValidateData {
    #[serde(deserialize_with = "flag")]
    pub valid: bool,
}

/// `data` payload of a successful `bitly_pro_domain` call.
#[derive(Debug, Deserialize)]
pub(crate) struct ProDomainData {
    #[serde(deserialize_with = "flag")]
    pub bitly_pro_domain: bool,
}

/// A short link resolved by `expand`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExpandedUrl {
    /// Echo of the short URL, when the lookup was by short URL.
    #[serde(default)]
    pub short_url: Option<String>,
    /// Echo of the hash, when the lookup was by hash.
    #[serde(default)]
    pub hash: Option<String>,
    pub long_url: String,
    pub user_hash: String,
    pub global_hash: String,
}

/// Outcome of one `expand` lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    Found(ExpandedUrl),
    /// The service could not resolve `key`; `error` is its reason, e.g.
    /// `NOT_FOUND`.
    NotFound { key: String, error: String },
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExpandData {
    pub expand: Vec<ExpandItem>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ExpandItem {
    Missing {
        #[serde(default)]
        short_url: Option<String>,
        #[serde(default)]
        hash: Option<String>,
        error: String,
    },
    Found(ExpandedUrl),
}

impl From<ExpandItem> for Expansion {
    fn from(item: ExpandItem) -> Self {
        match item {
            ExpandItem::Found(url) => Expansion::Found(url),
            ExpandItem::Missing {
                short_url,
                hash,
                error,
            } => Expansion::NotFound {
                key: short_url.or(hash).unwrap_or_default(),
                error,
            },
        }
    }
}

/// Accept a JSON boolean or an integer flag (0 is false).
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(n) => n != 0,
    })
}
