//! Decoding of the uniform `{status_code, status_txt, data}` response wrapper.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{BitlyError, TransportError};
use crate::http::HttpResponse;

/// The status code the service uses for a successful call.
pub const STATUS_OK: i64 = 200;

/// A successful envelope, ready for entity mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub status_code: i64,
    pub status_txt: String,
    pub data: Value,
}

#[derive(Deserialize)]
struct RawEnvelope {
    status_code: i64,
    status_txt: String,
    #[serde(default)]
    data: Option<Value>,
}

/// Turn a raw response into a successful envelope or a classified error.
///
/// The envelope is authoritative when present: the service reports its own
/// failures inside a JSON body, whatever the HTTP status line says.
pub fn parse_envelope(
    operation: &'static str,
    response: &HttpResponse,
) -> Result<ResponseEnvelope, BitlyError> {
    let value: Value = match serde_json::from_str(&response.body) {
        Ok(value) => value,
        Err(e) if response.is_success() => {
            return Err(TransportError::Decode(e.to_string()).into());
        }
        Err(_) => return Err(unexpected_status(response)),
    };

    let raw: RawEnvelope = match serde_json::from_value(value) {
        Ok(raw) => raw,
        Err(e) if response.is_success() => {
            return Err(BitlyError::malformed(operation, format!("invalid envelope: {e}")));
        }
        Err(_) => return Err(unexpected_status(response)),
    };

    if raw.status_code != STATUS_OK {
        tracing::debug!(
            operation,
            status_code = raw.status_code,
            status_txt = %raw.status_txt,
            "service reported failure"
        );
        return Err(BitlyError::Service {
            status_code: raw.status_code,
            status_txt: raw.status_txt,
        });
    }

    let data = raw
        .data
        .ok_or_else(|| BitlyError::malformed(operation, "missing field `data`"))?;

    Ok(ResponseEnvelope {
        status_code: raw.status_code,
        status_txt: raw.status_txt,
        data,
    })
}

/// A non-2xx reply that is not a service envelope, e.g. a proxy error page.
fn unexpected_status(response: &HttpResponse) -> BitlyError {
    TransportError::UnexpectedStatus {
        status: response.status,
        body: response.body.clone(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(body: &str) -> HttpResponse {
        HttpResponse::new(200, body)
    }

    #[test]
    fn success_envelope_keeps_data() {
        let env = parse_envelope(
            "validate",
            &ok(r#"{"status_code":200,"status_txt":"OK","data":{"valid":1}}"#),
        )
        .unwrap();
        assert_eq!(env.status_txt, "OK");
        assert_eq!(env.data["valid"], 1);
    }

    #[test]
    fn non_200_envelope_is_service_error() {
        let err = parse_envelope(
            "bitly_pro_domain",
            &ok(r#"{"status_code":500,"status_txt":"INVALID_BITLY_PRO_DOMAIN","data":null}"#),
        )
        .unwrap_err();
        assert_eq!(
            err,
            BitlyError::Service {
                status_code: 500,
                status_txt: "INVALID_BITLY_PRO_DOMAIN".to_string()
            }
        );
    }

    #[test]
    fn envelope_wins_over_http_status() {
        let response = HttpResponse::new(
            403,
            r#"{"status_code":403,"status_txt":"RATE_LIMIT_EXCEEDED","data":null}"#,
        );
        let err = parse_envelope("shorten", &response).unwrap_err();
        assert_eq!(err.status_code(), Some(403));
    }

    #[test]
    fn missing_data_on_success_is_malformed() {
        let err = parse_envelope("shorten", &ok(r#"{"status_code":200,"status_txt":"OK"}"#))
            .unwrap_err();
        assert!(matches!(
            err,
            BitlyError::MalformedResponse { operation: "shorten", .. }
        ));

        let err = parse_envelope(
            "shorten",
            &ok(r#"{"status_code":200,"status_txt":"OK","data":null}"#),
        )
        .unwrap_err();
        assert!(matches!(err, BitlyError::MalformedResponse { .. }));
    }

    #[test]
    fn json_without_envelope_fields_is_malformed() {
        let err = parse_envelope("shorten", &ok(r#"{"hello":"world"}"#)).unwrap_err();
        assert!(matches!(err, BitlyError::MalformedResponse { .. }));
    }

    #[test]
    fn non_json_body_is_transport_decode_failure() {
        let err = parse_envelope("shorten", &ok("<html>oops</html>")).unwrap_err();
        assert!(matches!(
            err,
            BitlyError::Transport(TransportError::Decode(_))
        ));
    }

    #[test]
    fn non_json_error_page_is_unexpected_status() {
        let err =
            parse_envelope("shorten", &HttpResponse::new(502, "Bad Gateway")).unwrap_err();
        assert_eq!(
            err,
            BitlyError::Transport(TransportError::UnexpectedStatus {
                status: 502,
                body: "Bad Gateway".to_string()
            })
        );
    }

    #[test]
    fn non_2xx_json_without_envelope_is_unexpected_status() {
        let body = r#"{"message":"bad gateway"}"#;
        let err = parse_envelope("shorten", &HttpResponse::new(502, body)).unwrap_err();
        assert_eq!(
            err,
            BitlyError::Transport(TransportError::UnexpectedStatus {
                status: 502,
                body: body.to_string()
            })
        );
    }
}
