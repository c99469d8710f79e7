//! Validated settings for the services and clients.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::limit::MAX_CONNECTIONS;

/// Address services bind to.
pub const LISTEN_HOST: &str = "0.0.0.0";

/// Host clients connect to unless told otherwise.
pub const DEFAULT_HOST: &str = "localhost";

/// Parse a TCP port, accepting only `1..=65535`.
///
/// Usable directly as a clap `value_parser`.
pub fn parse_port(raw: &str) -> Result<u16> {
    let port: u32 = raw
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("port {raw:?} is not a number")))?;

    match u16::try_from(port) {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(Error::Config(format!("port {port} is outside 1-65535"))),
    }
}

/// Service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
    /// Connections served in parallel before new ones are refused
    pub max_connections: usize,
    /// Per-connection read/write deadline; `None` blocks forever
    pub io_timeout: Option<Duration>,
}

impl ServerConfig {
    /// Settings for `port` with the default cap and no deadline.
    pub fn new(port: u16) -> Self {
        Self { port, max_connections: MAX_CONNECTIONS, io_timeout: None }
    }

    /// Override the concurrency cap.
    pub fn with_max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }

    /// Set a read/write deadline for every served connection.
    pub fn with_io_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.io_timeout = timeout;
        self
    }

    /// Check the settings are usable.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(Error::Config("port must be between 1 and 65535".to_string()));
        }
        if self.max_connections == 0 {
            return Err(Error::Config("max connections must be at least 1".to_string()));
        }
        if self.io_timeout == Some(Duration::ZERO) {
            return Err(Error::Config("timeout must be greater than zero".to_string()));
        }
        Ok(())
    }

    /// `host:port` the listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{LISTEN_HOST}:{}", self.port)
    }
}

/// Client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// File holding the text to transform
    pub text_path: PathBuf,
    /// File holding the key
    pub key_path: PathBuf,
    /// Service host
    pub host: String,
    /// Service port
    pub port: u16,
}

impl ClientConfig {
    /// `host:port` of the service.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
