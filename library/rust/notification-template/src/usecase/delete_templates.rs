use std::sync::Arc;

use k1s0_tenant_client::TenantResolver;

use crate::domain::entity::{NotificationChannel, Scenario, TemplateKey, TemplateScope};
use crate::domain::error::TemplateError;
use crate::domain::service::LayeredResolver;
use crate::infrastructure::cache::TenantCacheRegistry;
use crate::usecase::resolve_tenant;

#[derive(Debug, Clone)]
pub struct DeleteTemplatesInput {
    pub scenario: String,
    pub channel: NotificationChannel,
    pub tenant_domain: String,
    pub application: Option<String>,
}

/// DeleteTemplatesUseCase は 1 スコープ内のシナリオの全ロケールを削除する。
/// シナリオ自体と他スコープのテンプレートは残る。
pub struct DeleteTemplatesUseCase {
    resolver: Arc<LayeredResolver>,
    tenants: Arc<dyn TenantResolver>,
    caches: Option<Arc<TenantCacheRegistry>>,
}

impl DeleteTemplatesUseCase {
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

    /// 削除件数を返す。
    pub fn execute(&self, input: &DeleteTemplatesInput) -> Result<usize, TemplateError> {
        let scenario = Scenario::parse(&input.scenario)?;
        if let Some(app) = &input.application {
            k1s0_validation::validate_application_id(app)?;
        }
        let tenant = resolve_tenant(self.tenants.as_ref(), &input.tenant_domain)?;
        let scope = TemplateScope::new(tenant, input.application.as_deref())?;

        let count = self.resolver.delete_all(&scenario, input.channel, &scope)?;
        if let Some(caches) = &self.caches {
            caches
                .partition(tenant)
                .invalidate(&TemplateKey::new(&scenario, input.channel, scope.application()));
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::DefaultLocales;
    use crate::domain::repository::scenario_catalog::MockScenarioCatalog;
    use crate::domain::repository::template_store::MockTemplateStore;
    use crate::domain::service::DefaultTemplateCatalog;
    use k1s0_tenant_client::{MockTenantResolver, TenantId};

    #[test]
    fn test_delete_templates_returns_count() {
        let mut scenarios = MockScenarioCatalog::new();
        scenarios.expect_exists().returning(|_, _, _| Ok(true));
        let mut store = MockTemplateStore::new();
        store
            .expect_delete_all()
            .withf(|s, ch, scope| {
                s.key() == "welcome"
                    && *ch == NotificationChannel::Email
                    && scope.application().is_none()
            })
            .times(1)
            .returning(|_, _, _| Ok(3));
        let mut tenants = MockTenantResolver::new();
        tenants.expect_id_for().returning(|_| Ok(TenantId(1)));
        let resolver = Arc::new(LayeredResolver::new(
            Arc::new(store),
            Arc::new(scenarios),
            Arc::new(DefaultTemplateCatalog::empty()),
            DefaultLocales::default(),
        ));

        let count = DeleteTemplatesUseCase::new(resolver, Arc::new(tenants), None)
            .execute(&DeleteTemplatesInput {
                scenario: "Welcome".to_string(),
                channel: NotificationChannel::Email,
                tenant_domain: "acme.com".to_string(),
                application: None,
            })
            .unwrap();
        assert_eq!(count, 3);
    }
}
