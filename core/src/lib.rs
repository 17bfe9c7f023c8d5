//! Synchronous client for the bit.ly v3 URL-shortening API.
//!
//! # Overview
//! `BitlyApi` builds signed `HttpRequest` values and parses `HttpResponse`
//! values without touching the network (host-does-IO pattern). `Client`
//! composes it with a `Transport` for one-call operations.
//!
//! # Design
//! - Both `BitlyApi` and `Client` are stateless beyond immutable credentials.
//! - Every response goes through the envelope parser, which classifies
//!   failures as transport, service, or malformed-response errors.
//! - Each operation decodes its `data` payload into a typed wire struct and
//!   maps it to a public entity.
//!
//! ```rust,no_run
//! use bitly_core::{Client, ShortenOptions};
//!
//! let client = Client::new("test_account", "test_key");
//! let url = client.shorten("http://betaworks.com/", &ShortenOptions::default())?;
//! println!("{} new={}", url.short_url(), url.is_new_hash());
//! # Ok::<(), bitly_core::BitlyError>(())
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use api::BitlyApi;
pub use client::Client;
pub use config::Config;
pub use envelope::ResponseEnvelope;
pub use error::{BitlyError, ConfigError, TransportError};
pub use http::{HttpRequest, HttpResponse};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{Credentials, ExpandKey, ExpandedUrl, Expansion, ShortenOptions, ShortenedUrl};
