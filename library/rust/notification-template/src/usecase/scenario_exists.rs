use std::sync::Arc;

use k1s0_tenant_client::TenantResolver;

use crate::domain::entity::{NotificationChannel, Scenario};
use crate::domain::error::TemplateError;
use crate::domain::service::LayeredResolver;
use crate::usecase::resolve_tenant;

/// ScenarioExistsUseCase はシナリオが永続ストアまたは組み込みカタログにあるかを返す。
pub struct ScenarioExistsUseCase {
    resolver: Arc<LayeredResolver>,
    tenants: Arc<dyn TenantResolver>,
}

impl ScenarioExistsUseCase {
    pub fn new(resolver: Arc<LayeredResolver>, tenants: Arc<dyn TenantResolver>) -> Self {
        Self { resolver, tenants }
    }

    pub fn execute(
        &self,
        scenario: &str,
        channel: NotificationChannel,
        tenant_domain: &str,
    ) -> Result<bool, TemplateError> {
        let scenario = Scenario::parse(scenario)?;
        let tenant = resolve_tenant(self.tenants.as_ref(), tenant_domain)?;
        self.resolver.scenario_exists(&scenario, channel, tenant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{DefaultLocales, NotificationTemplate};
    use crate::domain::repository::scenario_catalog::MockScenarioCatalog;
    use crate::domain::repository::template_store::MockTemplateStore;
    use crate::domain::service::DefaultTemplateCatalog;
    use crate::domain::ErrorKind;
    use k1s0_tenant_client::{MockTenantResolver, TenantId};

    fn tenants() -> Arc<dyn TenantResolver> {
        let mut mock = MockTenantResolver::new();
        mock.expect_id_for().returning(|_| Ok(TenantId(9)));
        Arc::new(mock)
    }

    fn use_case(scenarios: MockScenarioCatalog) -> ScenarioExistsUseCase {
        let defaults = DefaultTemplateCatalog::new(
            vec![NotificationTemplate::email("account-lock", "en-us", "Locked", "body")],
            &DefaultLocales::default(),
        )
        .unwrap();
        let resolver = Arc::new(LayeredResolver::new(
            Arc::new(MockTemplateStore::new()),
            Arc::new(scenarios),
            Arc::new(defaults),
            DefaultLocales::default(),
        ));
        ScenarioExistsUseCase::new(resolver, tenants())
    }

    #[test]
    fn test_exists_in_durable_store_for_tenant() {
        let mut scenarios = MockScenarioCatalog::new();
        scenarios
            .expect_exists()
            .withf(|s, c, t| {
                s.key() == "welcomeemail" && *c == NotificationChannel::Email && *t == TenantId(9)
            })
            .returning(|_, _, _| Ok(true));

        let exists = use_case(scenarios)
            .execute("Welcome Email", NotificationChannel::Email, "acme.com")
            .unwrap();
        assert!(exists);
    }

    #[test]
    fn test_exists_only_in_catalog() {
        let mut scenarios = MockScenarioCatalog::new();
        scenarios.expect_exists().returning(|_, _, _| Ok(false));

        let exists = use_case(scenarios)
            .execute("account-lock", NotificationChannel::Email, "acme.com")
            .unwrap();
        assert!(exists);
    }

    #[test]
    fn test_missing_everywhere() {
        let mut scenarios = MockScenarioCatalog::new();
        scenarios.expect_exists().returning(|_, _, _| Ok(false));

        let exists = use_case(scenarios)
            .execute("promo", NotificationChannel::Email, "acme.com")
            .unwrap();
        assert!(!exists);
    }

    #[test]
    fn test_invalid_name_is_client_error() {
        let mut scenarios = MockScenarioCatalog::new();
        scenarios.expect_exists().never();

        let err = use_case(scenarios)
            .execute("reset/password", NotificationChannel::Email, "acme.com")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Client);
    }
}
