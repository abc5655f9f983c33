//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use header_rules::RuleSet;

/// Settings needed to build the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) rules: Arc<RuleSet>,
}

impl ServerConfig {
    /// Construct a server configuration enforcing `rules`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, rules: RuleSet) -> Self {
        Self {
            bind_addr,
            rules: Arc::new(rules),
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
