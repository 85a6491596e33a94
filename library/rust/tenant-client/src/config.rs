use std::time::Duration;

/// CachedTenantResolver のキャッシュ設定。
#[derive(Debug, Clone)]
pub struct TenantClientConfig {
    pub cache_ttl: Duration,
    pub cache_max_capacity: u64,
}

impl TenantClientConfig {
    pub fn new() -> Self {
        Self {
            cache_ttl: Duration::from_secs(300),
            cache_max_capacity: 1000,
        }
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn cache_max_capacity(mut self, capacity: u64) -> Self {
        self.cache_max_capacity = capacity;
        self
    }
}

impl Default for TenantClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
