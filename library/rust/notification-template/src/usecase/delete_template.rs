use std::sync::Arc;

use k1s0_tenant_client::TenantResolver;

use crate::domain::entity::{Locale, NotificationChannel, Scenario, TemplateKey, TemplateScope};
use crate::domain::error::TemplateError;
use crate::domain::repository::TemplateLocator;
use crate::domain::service::LayeredResolver;
use crate::infrastructure::cache::TenantCacheRegistry;
use crate::usecase::resolve_tenant;

#[derive(Debug, Clone)]
pub struct DeleteTemplateInput {
    pub scenario: String,
    pub locale: String,
    pub channel: NotificationChannel,
    pub tenant_domain: String,
    pub application: Option<String>,
}

/// DeleteTemplateUseCase はテンプレートを 1 件削除するユースケース。
/// 組み込みデフォルトは削除対象にならない。
pub struct DeleteTemplateUseCase {
    resolver: Arc<LayeredResolver>,
    tenants: Arc<dyn TenantResolver>,
    caches: Option<Arc<TenantCacheRegistry>>,
}

impl DeleteTemplateUseCase {
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

    /// 削除した場合は true。
    pub fn execute(&self, input: &DeleteTemplateInput) -> Result<bool, TemplateError> {
        let scenario = Scenario::parse(&input.scenario)?;
        let locale = Locale::parse(&input.locale)?;
        if let Some(app) = &input.application {
            k1s0_validation::validate_application_id(app)?;
        }
        let tenant = resolve_tenant(self.tenants.as_ref(), &input.tenant_domain)?;
        let locator = TemplateLocator::new(
            scenario,
            locale,
            input.channel,
            TemplateScope::new(tenant, input.application.as_deref())?,
        );

        let deleted = self.resolver.delete(&locator)?;
        if deleted {
            if let Some(caches) = &self.caches {
                caches.partition(tenant).invalidate(&TemplateKey::new(
                    &locator.scenario,
                    locator.channel,
                    locator.scope.application(),
                ));
            }
        }
        Ok(deleted)
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
    fn test_delete_passes_application_scope() {
        let mut store = MockTemplateStore::new();
        store
            .expect_delete()
            .withf(|l| l.scope.application() == Some("portal") && l.locale.as_str() == "fr-fr")
            .times(1)
            .returning(|_| Ok(true));
        let mut tenants = MockTenantResolver::new();
        tenants.expect_id_for().returning(|_| Ok(TenantId(1)));
        let resolver = Arc::new(LayeredResolver::new(
            Arc::new(store),
            Arc::new(MockScenarioCatalog::new()),
            Arc::new(DefaultTemplateCatalog::empty()),
            DefaultLocales::default(),
        ));

        let deleted = DeleteTemplateUseCase::new(resolver, Arc::new(tenants), None)
            .execute(&DeleteTemplateInput {
                scenario: "sms-otp".to_string(),
                locale: "fr_FR".to_string(),
                channel: NotificationChannel::Sms,
                tenant_domain: "acme.com".to_string(),
                application: Some("portal".to_string()),
            })
            .unwrap();
        assert!(deleted);
    }
}
