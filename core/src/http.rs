//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `BitlyApi` builds `HttpRequest`
//! values and parses `HttpResponse` values without touching the network; a
//! `Transport` (or any caller) performs the actual GET.
//!
//! Every service call is a GET, so a request is just a URL plus an ordered
//! list of query pairs. Keeping the pairs unencoded lets tests assert on
//! parameters directly, while `to_url` produces the exact wire form.

use url::form_urlencoded;

/// An HTTP GET request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl HttpRequest {
    /// Value of the first query pair named `name`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Render the query string, percent-encoding names and values.
    ///
    /// Pair order is preserved, so the output is deterministic for a given
    /// request.
    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish()
    }

    /// Full request URL including the encoded query string.
    pub fn to_url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        format!("{}?{}", self.url, self.query_string())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(query: &[(&str, &str)]) -> HttpRequest {
        HttpRequest {
            url: "http://api.bit.ly/v3/shorten".to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn reserved_characters_in_values_are_encoded() {
        let req = request(&[("longUrl", "http://betaworks.com/?a=1&b=2")]);
        assert_eq!(
            req.query_string(),
            "longUrl=http%3A%2F%2Fbetaworks.com%2F%3Fa%3D1%26b%3D2"
        );
    }

    #[test]
    fn pair_order_is_preserved() {
        let req = request(&[("login", "test_account"), ("apiKey", "test_key"), ("domain", "j.mp")]);
        assert_eq!(
            req.to_url(),
            "http://api.bit.ly/v3/shorten?login=test_account&apiKey=test_key&domain=j.mp"
        );
    }

    #[test]
    fn empty_query_renders_bare_url() {
        let req = request(&[]);
        assert_eq!(req.to_url(), "http://api.bit.ly/v3/shorten");
    }

    #[test]
    fn param_returns_first_match() {
        let req = request(&[("hash", "a"), ("hash", "b")]);
        assert_eq!(req.param("hash"), Some("a"));
        assert_eq!(req.param("shortUrl"), None);
    }

    #[test]
    fn success_covers_2xx_only() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(302, "").is_success());
        assert!(!HttpResponse::new(500, "").is_success());
    }
}
