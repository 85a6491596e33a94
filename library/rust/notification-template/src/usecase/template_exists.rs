use std::sync::Arc;

use k1s0_tenant_client::TenantResolver;

use crate::domain::error::TemplateError;
use crate::domain::service::LayeredResolver;
use crate::usecase::resolve_template::ResolveTemplateInput;

/// TemplateExistsUseCase は要求ロケールのテンプレートがいずれかの階層にあるかを返す。
/// ロケールフォールバックは行わない。
pub struct TemplateExistsUseCase {
    resolver: Arc<LayeredResolver>,
    tenants: Arc<dyn TenantResolver>,
}

impl TemplateExistsUseCase {
    pub fn new(resolver: Arc<LayeredResolver>, tenants: Arc<dyn TenantResolver>) -> Self {
        Self { resolver, tenants }
    }

    pub fn execute(&self, input: &ResolveTemplateInput) -> Result<bool, TemplateError> {
        let request = input.to_request(self.tenants.as_ref())?;
        self.resolver.template_exists(&request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{DefaultLocales, NotificationChannel, NotificationTemplate};
    use crate::domain::repository::scenario_catalog::MockScenarioCatalog;
    use crate::domain::repository::template_store::MockTemplateStore;
    use crate::domain::service::DefaultTemplateCatalog;
    use k1s0_tenant_client::{MockTenantResolver, TenantId};

    #[test]
    fn test_exists_in_store_for_application() {
        let mut store = MockTemplateStore::new();
        store
            .expect_read()
            .withf(|l| l.scope.application() == Some("portal") && l.scope.tenant == TenantId(4))
            .returning(|_| Ok(Some(NotificationTemplate::sms("sms-otp", "fr-fr", "code"))));
        let mut tenants = MockTenantResolver::new();
        tenants.expect_id_for().returning(|_| Ok(TenantId(4)));

        let resolver = Arc::new(LayeredResolver::new(
            Arc::new(store),
            Arc::new(MockScenarioCatalog::new()),
            Arc::new(DefaultTemplateCatalog::empty()),
            DefaultLocales::default(),
        ));
        let uc = TemplateExistsUseCase::new(resolver, Arc::new(tenants));
        let exists = uc
            .execute(&ResolveTemplateInput {
                scenario: "sms-otp".to_string(),
                locale: "fr-fr".to_string(),
                channel: NotificationChannel::Sms,
                tenant_domain: "acme.com".to_string(),
                application: Some("portal".to_string()),
            })
            .unwrap();
        assert!(exists);
    }
}
