//! In-process emulation of the bit.ly v3 API.
//!
//! Every route answers HTTP 200 with the `{status_code, status_txt, data}`
//! envelope, reporting failures inside the body the way the real service
//! does. Shortened links live in memory for the lifetime of the router.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Short domains every account may use. The first is the default.
pub const PUBLIC_DOMAINS: [&str; 2] = ["bit.ly", "j.mp"];

const HASH_LEN: usize = 6;
const BASE62: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    pub status_code: u16,
    pub status_txt: String,
    pub data: Value,
}

impl Envelope {
    fn ok(data: Value) -> Json<Self> {
        Json(Self {
            status_code: 200,
            status_txt: "OK".to_string(),
            data,
        })
    }

    fn error(status_txt: &str) -> Json<Self> {
        tracing::debug!(status_txt, "rejecting request");
        Json(Self {
            status_code: 500,
            status_txt: status_txt.to_string(),
            data: Value::Null,
        })
    }
}

#[derive(Clone, Debug)]
struct Link {
    long_url: String,
    user_hash: String,
    global_hash: String,
}

/// Accounts, domains and every link issued so far.
#[derive(Debug, Default)]
pub struct ServiceState {
    accounts: HashMap<String, String>,
    pro_domains: HashSet<String>,
    entitlements: HashMap<String, HashSet<String>>,
    global_hashes: HashMap<String, String>,
    user_hashes: HashMap<(String, String), String>,
    links: HashMap<String, Link>,
}

impl ServiceState {
    /// The accounts and domains the client test suites expect.
    pub fn seeded() -> Self {
        Self::default()
            .with_account("test_account", "test_key")
            .with_account("other_account", "other_apiKey")
            .with_account("correct", "well_done")
            .with_pro_domain("nyti.ms")
    }

    pub fn with_account(mut self, login: &str, api_key: &str) -> Self {
        self.accounts.insert(login.to_string(), api_key.to_string());
        self
    }

    pub fn with_pro_domain(mut self, domain: &str) -> Self {
        self.pro_domains.insert(domain.to_string());
        self
    }

    /// Allow `login` to issue links under the pro domain `domain`.
    pub fn with_entitlement(mut self, login: &str, domain: &str) -> Self {
        self.entitlements
            .entry(login.to_string())
            .or_default()
            .insert(domain.to_string());
        self
    }

    fn authenticates(&self, login: &str, api_key: &str) -> bool {
        self.accounts.get(login).is_some_and(|key| key == api_key)
    }

    fn may_use_domain(&self, login: &str, domain: &str) -> bool {
        PUBLIC_DOMAINS.contains(&domain)
            || self
                .entitlements
                .get(login)
                .is_some_and(|domains| domains.contains(domain))
    }

    fn is_short_domain(&self, domain: &str) -> bool {
        PUBLIC_DOMAINS.contains(&domain) || self.pro_domains.contains(domain)
    }

    fn fresh_hash(&self) -> String {
        loop {
            let hash = base62(Uuid::new_v4().as_u128());
            if !self.links.contains_key(&hash) {
                return hash;
            }
        }
    }

    /// Returns the user's link for `long_url` and whether it was just created.
    fn shorten(&mut self, login: &str, long_url: &str) -> (Link, bool) {
        let key = (login.to_string(), long_url.to_string());
        if let Some(hash) = self.user_hashes.get(&key) {
            if let Some(link) = self.links.get(hash) {
                return (link.clone(), false);
            }
        }

        let global_hash = match self.global_hashes.get(long_url) {
            Some(hash) => hash.clone(),
            None => {
                let hash = self.fresh_hash();
                self.global_hashes.insert(long_url.to_string(), hash.clone());
                self.links.insert(
                    hash.clone(),
                    Link {
                        long_url: long_url.to_string(),
                        user_hash: hash.clone(),
                        global_hash: hash.clone(),
                    },
                );
                hash
            }
        };
        let link = Link {
            long_url: long_url.to_string(),
            user_hash: self.fresh_hash(),
            global_hash,
        };
        self.links.insert(link.user_hash.clone(), link.clone());
        self.user_hashes.insert(key, link.user_hash.clone());
        (link, true)
    }
}

fn base62(mut n: u128) -> String {
    let mut out = String::with_capacity(HASH_LEN);
    for _ in 0..HASH_LEN {
        out.push(BASE62[(n % 62) as usize] as char);
        n /= 62;
    }
    out
}

pub type Db = Arc<RwLock<ServiceState>>;

/// Query pairs in request order; repeated names are kept.
struct Params(Vec<(String, String)>);

impl Params {
    fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }
}

pub fn app() -> Router {
    app_with(ServiceState::seeded())
}

pub fn app_with(state: ServiceState) -> Router {
    let db: Db = Arc::new(RwLock::new(state));
    Router::new()
        .route("/v3/shorten", get(shorten))
        .route("/v3/validate", get(validate))
        .route("/v3/bitly_pro_domain", get(bitly_pro_domain))
        .route("/v3/expand", get(expand))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Check `login`/`apiKey`, returning the error text on failure.
fn authenticate(state: &ServiceState, params: &Params) -> Result<String, &'static str> {
    let login = params.get("login").ok_or("MISSING_ARG_LOGIN")?;
    let api_key = params.get("apiKey").ok_or("MISSING_ARG_APIKEY")?;
    if !state.authenticates(login, api_key) {
        return Err("INVALID_LOGIN");
    }
    Ok(login.to_string())
}

async fn shorten(
    State(db): State<Db>,
    Query(query): Query<Vec<(String, String)>>,
) -> Json<Envelope> {
    let params = Params(query);
    let mut state = db.write().await;

    let mut login = match authenticate(&state, &params) {
        Ok(login) => login,
        Err(e) => return Envelope::error(e),
    };
    match (params.get("x_login"), params.get("x_apiKey")) {
        (Some(x_login), Some(x_api_key)) if state.authenticates(x_login, x_api_key) => {
            login = x_login.to_string();
        }
        (Some(_), _) => return Envelope::error("INVALID_X_APIKEY"),
        (None, Some(_)) => return Envelope::error("INVALID_X_LOGIN"),
        (None, None) => {}
    }

    let Some(long_url) = params.get("longUrl") else {
        return Envelope::error("MISSING_ARG_LONGURL");
    };
    if !(long_url.starts_with("http://") || long_url.starts_with("https://")) {
        return Envelope::error("INVALID_URI");
    }

    let domain = params.get("domain").unwrap_or(PUBLIC_DOMAINS[0]);
    if !state.may_use_domain(&login, domain) {
        return Envelope::error("INVALID_DOMAIN");
    }

    let (link, created) = state.shorten(&login, long_url);
    tracing::info!(login = %login, hash = %link.user_hash, created, "shortened");
    Envelope::ok(json!({
        "long_url": link.long_url,
        "url": format!("http://{domain}/{}", link.user_hash),
        "hash": link.user_hash,
        "global_hash": link.global_hash,
        "new_hash": u8::from(created),
    }))
}

async fn validate(
    State(db): State<Db>,
    Query(query): Query<Vec<(String, String)>>,
) -> Json<Envelope> {
    let params = Params(query);
    let state = db.read().await;
    if let Err(e) = authenticate(&state, &params) {
        return Envelope::error(e);
    }
    let Some(x_login) = params.get("x_login") else {
        return Envelope::error("MISSING_ARG_X_LOGIN");
    };
    let Some(x_api_key) = params.get("x_apiKey") else {
        return Envelope::error("MISSING_ARG_X_APIKEY");
    };
    let valid = state.authenticates(x_login, x_api_key);
    Envelope::ok(json!({ "valid": u8::from(valid) }))
}

fn is_domain_name(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

async fn bitly_pro_domain(
    State(db): State<Db>,
    Query(query): Query<Vec<(String, String)>>,
) -> Json<Envelope> {
    let params = Params(query);
    let state = db.read().await;
    if let Err(e) = authenticate(&state, &params) {
        return Envelope::error(e);
    }
    let Some(domain) = params.get("domain") else {
        return Envelope::error("MISSING_ARG_DOMAIN");
    };
    if !is_domain_name(domain) {
        return Envelope::error("INVALID_BITLY_PRO_DOMAIN");
    }
    Envelope::ok(json!({
        "domain": domain,
        "bitly_pro_domain": state.pro_domains.contains(domain),
    }))
}

async fn expand(
    State(db): State<Db>,
    Query(query): Query<Vec<(String, String)>>,
) -> Json<Envelope> {
    let params = Params(query);
    let state = db.read().await;
    if let Err(e) = authenticate(&state, &params) {
        return Envelope::error(e);
    }

    let mut results = Vec::new();
    for (name, value) in &params.0 {
        let (echo, hash) = match name.as_str() {
            "shortUrl" => (json!({ "short_url": value }), short_url_hash(&state, value)),
            "hash" => (json!({ "hash": value }), Some(value.as_str())),
            _ => continue,
        };
        let mut item = echo;
        match hash.and_then(|h| state.links.get(h)) {
            Some(link) => {
                item["long_url"] = json!(link.long_url);
                item["user_hash"] = json!(link.user_hash);
                item["global_hash"] = json!(link.global_hash);
            }
            None => item["error"] = json!("NOT_FOUND"),
        }
        results.push(item);
    }
    if results.is_empty() {
        return Envelope::error("MISSING_ARG_SHORTURL_OR_HASH");
    }
    Envelope::ok(json!({ "expand": results }))
}

/// The hash segment of a short URL on one of the service's domains.
fn short_url_hash<'a>(state: &ServiceState, short_url: &'a str) -> Option<&'a str> {
    let rest = short_url
        .strip_prefix("http://")
        .or_else(|| short_url.strip_prefix("https://"))?;
    let (domain, hash) = rest.split_once('/')?;
    (state.is_short_domain(domain) && !hash.is_empty()).then_some(hash)
}
