use std::sync::Arc;

use k1s0_tenant_client::TenantResolver;

use crate::domain::entity::{NotificationChannel, Scenario};
use crate::domain::error::TemplateError;
use crate::domain::service::LayeredResolver;
use crate::infrastructure::cache::TenantCacheRegistry;
use crate::usecase::resolve_tenant;

/// DeleteScenarioUseCase はシナリオと、その組織・全アプリケーションのテンプレートを削除する。
///
/// 削除後の解決は組み込みデフォルト (あれば) か NotFound になる。
pub struct DeleteScenarioUseCase {
    resolver: Arc<LayeredResolver>,
    tenants: Arc<dyn TenantResolver>,
    caches: Option<Arc<TenantCacheRegistry>>,
}

impl DeleteScenarioUseCase {
    pub fn new(
        resolver: Arc<LayeredResolver>,
        tenants: Arc<dyn TenantResolver>,
        caches: Option<Arc<TenantCacheRegistry>>,
    ) -> Self {
        Self {
            resolver,
            tenants,
            caches,
        }
    }

    /// 永続ストアから削除した場合は true。
    pub fn execute(
        &self,
        scenario: &str,
        channel: NotificationChannel,
        tenant_domain: &str,
    ) -> Result<bool, TemplateError> {
        let scenario = Scenario::parse(scenario)?;
        let tenant = resolve_tenant(self.tenants.as_ref(), tenant_domain)?;

        let removed = self.resolver.remove_scenario(&scenario, channel, tenant)?;
        if removed {
            if let Some(caches) = &self.caches {
                caches.partition(tenant).invalidate_scenario(scenario.key(), channel);
            }
        }
        Ok(removed)
    }
}
