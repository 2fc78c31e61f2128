//! Engine configuration
//!
//! Cache, wildcard, and table-name settings consumed by the engine and
//! the catalog cache. Model types are fixed at compile time; only the
//! knobs a deployment actually varies live here.

use std::time::Duration;

/// Configuration for the Warden engine.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use warden_rbac::RbacConfig;
///
/// let config = RbacConfig::default()
///     .with_permissions_ttl(Duration::from_secs(600));
/// assert!(config.cache_enabled);
/// assert!(config.wildcards_enabled);
/// ```
#[derive(Debug, Clone)]
pub struct RbacConfig {
    /// Whether catalog caching is enabled. When disabled, every catalog
    /// read goes straight to storage and nothing is cached.
    pub cache_enabled: bool,

    /// Time-to-live for the cached permission catalog (default: 1 hour).
    pub permissions_ttl: Duration,

    /// Time-to-live for the cached role catalog (default: 1 hour).
    pub roles_ttl: Duration,

    /// Whether wildcard prefix grants apply in permission checks.
    pub wildcards_enabled: bool,

    /// Name of the roles table in the backing store.
    pub roles_table: String,

    /// Name of the permissions table in the backing store.
    pub permissions_table: String,
}

impl Default for RbacConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            permissions_ttl: Duration::from_secs(3600),
            roles_ttl: Duration::from_secs(3600),
            wildcards_enabled: true,
            roles_table: "roles".to_string(),
            permissions_table: "permissions".to_string(),
        }
    }
}

impl RbacConfig {
    /// Build a configuration from the environment.
    ///
    /// Reads `WARDEN_PERMISSIONS_CACHE_TTL` and `WARDEN_ROLES_CACHE_TTL`
    /// (seconds), falling back to the defaults for anything unset or
    /// unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ttl) = env_seconds("WARDEN_PERMISSIONS_CACHE_TTL") {
            config.permissions_ttl = ttl;
        }
        if let Some(ttl) = env_seconds("WARDEN_ROLES_CACHE_TTL") {
            config.roles_ttl = ttl;
        }

        config
    }

    /// Disable catalog caching.
    pub fn without_cache(mut self) -> Self {
        self.cache_enabled = false;
        self
    }

    /// Disable wildcard matching in permission checks.
    pub fn without_wildcards(mut self) -> Self {
        self.wildcards_enabled = false;
        self
    }

    /// Set the permission catalog TTL.
    pub fn with_permissions_ttl(mut self, ttl: Duration) -> Self {
        self.permissions_ttl = ttl;
        self
    }

    /// Set the role catalog TTL.
    pub fn with_roles_ttl(mut self, ttl: Duration) -> Self {
        self.roles_ttl = ttl;
        self
    }
}

fn env_seconds(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RbacConfig::default();
        assert!(config.cache_enabled);
        assert!(config.wildcards_enabled);
        assert_eq!(config.permissions_ttl, Duration::from_secs(3600));
        assert_eq!(config.roles_ttl, Duration::from_secs(3600));
        assert_eq!(config.roles_table, "roles");
        assert_eq!(config.permissions_table, "permissions");
    }

    #[test]
    fn test_builders() {
        let config = RbacConfig::default()
            .without_cache()
            .without_wildcards()
            .with_roles_ttl(Duration::from_secs(60));
        assert!(!config.cache_enabled);
        assert!(!config.wildcards_enabled);
        assert_eq!(config.roles_ttl, Duration::from_secs(60));
    }
}
