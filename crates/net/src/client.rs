//! HTTP client with connection pooling

use async_trait::async_trait;
use docaudit_config::Config;
use docaudit_errors::{Error, NetworkError};
use reqwest::Client;
use std::time::Duration;

use crate::prober::{HeadTransport, TransportFailure};

/// Network client configuration
#[derive(Debug, Clone)]
pub struct NetConfig {
    /// Default request timeout; probes override it per attempt
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub pool_idle_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub user_agent: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(5),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 30,
            user_agent: format!("docaudit/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl From<&Config> for NetConfig {
    fn from(config: &Config) -> Self {
        let defaults = Self::default();
        Self {
            timeout: config.verify.timeout(),
            connect_timeout: Duration::from_secs(config.store.connect_timeout),
            pool_idle_timeout: Duration::from_secs(config.store.pool_idle_timeout),
            // Enough idle connections to keep every worker on a warm socket
            pool_max_idle_per_host: config
                .store
                .pool_max_idle_per_host
                .max(config.verify.concurrency),
            user_agent: config
                .store
                .user_agent
                .clone()
                .unwrap_or(defaults.user_agent),
        }
    }
}

/// HTTP client wrapper shared by every probe
///
/// Cloning is cheap; all clones share one connection pool.
#[derive(Clone)]
pub struct NetClient {
    client: Client,
}

impl NetClient {
    /// Create a new network client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to initialize.
    pub fn new(config: &NetConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| NetworkError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }

    /// Create with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created with default settings.
    pub fn with_defaults() -> Result<Self, Error> {
        Self::new(&NetConfig::default())
    }
}

#[async_trait]
impl HeadTransport for NetClient {
    async fn head(&self, url: &str, timeout: Duration) -> Result<u16, TransportFailure> {
        match self.client.head(url).timeout(timeout).send().await {
            Ok(response) => Ok(response.status().as_u16()),
            Err(e) if e.is_timeout() => Err(TransportFailure::Timeout),
            Err(e) => Err(TransportFailure::Request(describe(&e))),
        }
    }
}

/// Flatten a reqwest error and its sources into one line
fn describe(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
