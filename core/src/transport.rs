//! The seam between `Client` and the network.
//!
//! Anything that can perform a GET for an `HttpRequest` can back a `Client`,
//! which keeps tests free to script responses. `UreqTransport` is the
//! blocking implementation used by default.

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes a single GET round-trip. Implementations must not retry.
pub trait Transport: Send + Sync {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).get(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::ureq_transport::UreqTransport;

#[cfg(feature = "ureq")]
mod ureq_transport {
    use std::time::Duration;

    use super::Transport;
    use crate::error::TransportError;
    use crate::http::{HttpRequest, HttpResponse};

    /// Blocking transport on a shared `ureq` agent.
    ///
    /// HTTP error statuses are returned as data so the envelope parser can
    /// read the service's own failure report.
    #[derive(Debug, Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl UreqTransport {
        pub fn new(timeout: Duration) -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .timeout_global(Some(timeout))
                .build()
                .new_agent();
            Self { agent }
        }
    }

    impl Transport for UreqTransport {
        fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            let mut response = self
                .agent
                .get(&request.to_url())
                .call()
                .map_err(map_error)?;
            let status = response.status().as_u16();
            let body = response.body_mut().read_to_string().map_err(map_error)?;
            Ok(HttpResponse { status, body })
        }
    }

    fn map_error(e: ureq::Error) -> TransportError {
        match e {
            ureq::Error::Timeout(_) => TransportError::Timeout,
            other => TransportError::Connection(other.to_string()),
        }
    }
}
