use std::sync::Arc;

use k1s0_tenant_client::TenantResolver;

use crate::domain::entity::{Locale, NotificationChannel, Scenario, TemplateKey, TemplateScope};
use crate::domain::error::TemplateError;
use crate::domain::service::{LayeredResolver, ResolveRequest};
use crate::infrastructure::cache::TenantCacheRegistry;
use crate::usecase::resolve_tenant;

/// AddDefaultTemplatesUseCase は組み込みデフォルトテンプレートをテナントの永続ストアへ複製する。
///
/// 既に存在するテンプレートは上書きしない。
pub struct AddDefaultTemplatesUseCase {
    resolver: Arc<LayeredResolver>,
    tenants: Arc<dyn TenantResolver>,
    caches: Option<Arc<TenantCacheRegistry>>,
}

impl AddDefaultTemplatesUseCase {
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

    /// 追加したテンプレート数を返す。
    pub fn execute(
        &self,
        channel: NotificationChannel,
        tenant_domain: &str,
    ) -> Result<usize, TemplateError> {
        let tenant = resolve_tenant(self.tenants.as_ref(), tenant_domain)?;
        let scope = TemplateScope::organization(tenant);

        let mut added = 0;
        for template in self.resolver.defaults().templates(channel) {
            let request = ResolveRequest {
                scenario: Scenario::parse(&template.scenario)?,
                locale: Locale::parse(&template.locale)?,
                channel,
                scope: scope.clone(),
            };
            if self.resolver.durable_template_exists(&request)? {
                continue;
            }
            self.resolver.ensure_scenario(&request.scenario, channel, tenant)?;
            self.resolver.upsert(&template, &scope)?;
            if let Some(caches) = &self.caches {
                caches
                    .partition(tenant)
                    .invalidate(&TemplateKey::new(&request.scenario, channel, None));
            }
            added += 1;
        }
        tracing::info!(channel = %channel, tenant = %tenant, added, "default templates added");
        Ok(added)
    }
}
