//! Fetcher and connectivity seams
//!
//! The pagination session only talks to these traits, so tests can swap in
//! scripted fetchers and probes.

use crate::error::FailureCause;
use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::debug;

/// Loads one page of items
///
/// Failures are returned as values. Implementations own their timeout and
/// transport retry policy.
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    /// Fetch page `page` (1-based)
    async fn fetch(&self, page: u32) -> Result<Vec<T>, FailureCause>;
}

/// Reports whether the network is reachable
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    /// Check connectivity now
    async fn is_connected(&self) -> bool;
}

/// Probe that always reports a connection
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

#[async_trait]
impl ConnectivityProbe for AlwaysOnline {
    async fn is_connected(&self) -> bool {
        true
    }
}

/// Probe that opens a TCP connection to a well-known address
#[derive(Debug, Clone)]
pub struct TcpProbe {
    addr: String,
    timeout: Duration,
}

impl TcpProbe {
    /// Create a probe for `addr` (`host:port`)
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            timeout,
        }
    }

    /// Target address
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

#[async_trait]
impl ConnectivityProbe for TcpProbe {
    async fn is_connected(&self) -> bool {
        let connected = matches!(
            tokio::time::timeout(self.timeout, TcpStream::connect(&self.addr)).await,
            Ok(Ok(_))
        );
        debug!(addr = %self.addr, connected, "Connectivity probe");
        connected
    }
}
