//! Database endpoints and their connection strings.

use std::fmt;

use crate::config::{DEFAULT_LOCAL_URL, DEFAULT_ONLINE_URL};

/// One of the two database targets a `ConnectionManager` can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// The local store; the system of record.
    Local,
    /// The shared remote store that is kept in sync on a best-effort basis.
    Online,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Local => "local",
            Endpoint::Online => "online",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection strings for both endpoints.
///
/// The strings are opaque sqlx SQLite URLs such as `sqlite:./hotel_local.db`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub local_url: String,
    pub online_url: String,
}

impl ConnectionConfig {
    pub fn new(local_url: impl Into<String>, online_url: impl Into<String>) -> Self {
        Self {
            local_url: local_url.into(),
            online_url: online_url.into(),
        }
    }

    /// Returns the connection string selected by `endpoint`.
    pub fn url_for(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Local => &self.local_url,
            Endpoint::Online => &self.online_url,
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LOCAL_URL, DEFAULT_ONLINE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_endpoint() {
        let config = ConnectionConfig::new("sqlite:a.db", "sqlite:b.db");
        assert_eq!(config.url_for(Endpoint::Local), "sqlite:a.db");
        assert_eq!(config.url_for(Endpoint::Online), "sqlite:b.db");
    }

    #[test]
    fn test_endpoint_display() {
        assert_eq!(Endpoint::Local.to_string(), "local");
        assert_eq!(Endpoint::Online.to_string(), "online");
    }
}
