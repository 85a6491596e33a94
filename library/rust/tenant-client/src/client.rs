use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use moka::sync::Cache;

use crate::config::TenantClientConfig;
use crate::error::TenantError;
use crate::tenant::{normalize_domain, Tenant, TenantId, TenantStatus};

/// TenantResolver はテナントドメインからテナント ID を解決する。
/// 解決失敗は呼び出し側でサーバーエラーとして扱われる。
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait TenantResolver: Send + Sync {
    fn id_for(&self, tenant_domain: &str) -> Result<TenantId, TenantError>;
}

pub struct InMemoryTenantResolver {
    tenants: RwLock<HashMap<String, Tenant>>,
}

impl InMemoryTenantResolver {
    pub fn new() -> Self {
        Self {
            tenants: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_tenants(tenants: Vec<Tenant>) -> Self {
        let map = tenants
            .into_iter()
            .map(|t| (normalize_domain(&t.domain), t))
            .collect();
        Self {
            tenants: RwLock::new(map),
        }
    }

    pub fn add_tenant(&self, tenant: Tenant) -> Result<(), TenantError> {
        let mut tenants = self
            .tenants
            .write()
            .map_err(|e| TenantError::ServerError(e.to_string()))?;
        tenants.insert(normalize_domain(&tenant.domain), tenant);
        Ok(())
    }
}

impl Default for InMemoryTenantResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TenantResolver for InMemoryTenantResolver {
    fn id_for(&self, tenant_domain: &str) -> Result<TenantId, TenantError> {
        k1s0_validation::validate_tenant_domain(tenant_domain)
            .map_err(|e| TenantError::InvalidDomain(e.to_string()))?;

        let tenants = self
            .tenants
            .read()
            .map_err(|e| TenantError::ServerError(e.to_string()))?;
        let tenant = tenants
            .get(&normalize_domain(tenant_domain))
            .ok_or_else(|| TenantError::NotFound(tenant_domain.to_string()))?;
        match tenant.status {
            TenantStatus::Active => Ok(tenant.id),
            TenantStatus::Suspended | TenantStatus::Deleted => {
                Err(TenantError::Suspended(tenant_domain.to_string()))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// CachedTenantResolver: moka による解決結果キャッシュ
// ---------------------------------------------------------------------------

/// 下位の `TenantResolver` の成功結果のみを TTL 付きでキャッシュする。
/// エラーはキャッシュしない。
pub struct CachedTenantResolver {
    inner: Arc<dyn TenantResolver>,
    cache: Cache<String, TenantId>,
}

impl CachedTenantResolver {
    pub fn new(inner: Arc<dyn TenantResolver>, config: &TenantClientConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.cache_max_capacity)
            .time_to_live(config.cache_ttl)
            .build();
        Self { inner, cache }
    }

    /// 指定ドメインのキャッシュを破棄する。
    pub fn invalidate(&self, tenant_domain: &str) {
        self.cache.invalidate(&normalize_domain(tenant_domain));
    }
}

impl TenantResolver for CachedTenantResolver {
    fn id_for(&self, tenant_domain: &str) -> Result<TenantId, TenantError> {
        let key = normalize_domain(tenant_domain);
        if let Some(id) = self.cache.get(&key) {
            return Ok(id);
        }
        let id = self.inner.id_for(tenant_domain)?;
        tracing::debug!(tenant_domain = %key, tenant_id = %id, "tenant id resolved");
        self.cache.insert(key, id);
        Ok(id)
    }
}
