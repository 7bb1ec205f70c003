//! Egress Routes
//!
//! Outbound fetches are spread over a fixed pool of forward proxies plus a
//! direct connection. Routes are handed out by position, cycling when a
//! request has more dates than the pool has routes.

use std::fmt;

/// Outbound path for one upstream fetch
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EgressRoute {
    /// No proxy
    Direct,

    /// HTTP forward proxy URL (e.g., "http://10.0.0.1:8443")
    Proxy(String),
}

impl EgressRoute {
    /// Proxy route from a bare `host:port` pair
    pub fn proxy(host_port: &str) -> Self {
        let host_port = host_port.trim();
        if host_port.contains("://") {
            Self::Proxy(host_port.to_string())
        } else {
            Self::Proxy(format!("http://{host_port}"))
        }
    }
}

impl fmt::Display for EgressRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Proxy(url) => write!(f, "{url}"),
        }
    }
}

/// Ordered route pool: direct first, then proxies in configuration order
#[derive(Clone, Debug)]
pub struct RoutePool {
    routes: Vec<EgressRoute>,
}

impl RoutePool {
    pub fn new(proxies: impl IntoIterator<Item = EgressRoute>) -> Self {
        let mut routes = vec![EgressRoute::Direct];
        routes.extend(
            proxies
                .into_iter()
                .filter(|route| *route != EgressRoute::Direct),
        );
        Self { routes }
    }

    /// Pool with only the direct route
    pub fn direct() -> Self {
        Self::new(std::iter::empty())
    }

    /// Route assigned to the `index`-th date of a request
    pub fn route_for(&self, index: usize) -> &EgressRoute {
        &self.routes[index % self.routes.len()]
    }

    pub fn routes(&self) -> &[EgressRoute] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Never true: the direct route is always present
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for RoutePool {
    fn default() -> Self {
        Self::direct()
    }
}
