#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for docaudit
//!
//! This crate turns an identifier into an object URL and asks the remote
//! store, by metadata-only HEAD request, whether that object exists. Retries,
//! timeouts and status classification live here so that callers only ever
//! see a final [`Outcome`](docaudit_types::Outcome).

mod client;
mod prober;
mod resolver;
mod retry;

pub use client::{NetClient, NetConfig};
pub use prober::{ExistenceProber, HeadTransport, ProbeReport, TransportFailure};
pub use resolver::ObjectUrlResolver;
pub use retry::RetryPolicy;

use docaudit_config::Config;
use docaudit_errors::{Error, NetworkError};
use url::Url;

/// Build a prober backed by a pooled HTTP client from configuration
///
/// # Errors
///
/// Returns an error if the base URL is invalid or the HTTP client cannot be
/// constructed.
pub fn prober_from_config(config: &Config) -> Result<ExistenceProber<NetClient>, Error> {
    let client = NetClient::new(&NetConfig::from(config))?;
    let resolver = ObjectUrlResolver::new(&config.store.base_url, &config.store.suffix)?;
    Ok(ExistenceProber::new(
        client,
        resolver,
        RetryPolicy::from(&config.verify),
    ))
}

/// Parse and validate a URL
///
/// # Errors
///
/// Returns an error if the URL string is malformed or invalid according to RFC 3986.
pub fn parse_url(url: &str) -> Result<Url, Error> {
    Url::parse(url).map_err(|e| NetworkError::InvalidUrl(e.to_string()).into())
}
