//! Connection configuration.

use serde::Deserialize;

const fn default_max_connections() -> u32 {
    5
}

/// Settings consumed by [`Connection::connect`](crate::Connection::connect).
///
/// Deserializable so deployments can load it from their config format of
/// choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionSettings {
    /// Database URL, e.g. `sqlite://garnet.db` or `sqlite::memory:`.
    pub url: String,
    /// Maximum pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl ConnectionSettings {
    /// Creates settings for the given URL with default pool sizing.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
        }
    }
}
