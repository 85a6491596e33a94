use std::sync::Arc;

use k1s0_tenant_client::TenantResolver;

use crate::domain::entity::{NotificationTemplate, Scenario, TemplateKey, TemplateScope};
use crate::domain::error::TemplateError;
use crate::domain::service::LayeredResolver;
use crate::infrastructure::cache::TenantCacheRegistry;
use crate::usecase::resolve_tenant;

#[derive(Debug, Clone)]
pub struct UpsertTemplateInput {
    pub template: NotificationTemplate,
    pub tenant_domain: String,
    pub application: Option<String>,
}

/// UpsertTemplateUseCase はテンプレートを追加または更新するユースケース。
///
/// シナリオが未登録なら先に登録する。永続化の完了後にキャッシュを無効化する。
/// 登録と書き込みの間にシナリオが削除された場合は 1 度だけ登録からやり直す。
pub struct UpsertTemplateUseCase {
    resolver: Arc<LayeredResolver>,
    tenants: Arc<dyn TenantResolver>,
    caches: Option<Arc<TenantCacheRegistry>>,
}

impl UpsertTemplateUseCase {
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

    pub fn execute(&self, input: &UpsertTemplateInput) -> Result<(), TemplateError> {
        input.template.validate_for_write()?;
        let scenario = Scenario::parse(&input.template.scenario)?;
        if let Some(app) = &input.application {
            k1s0_validation::validate_application_id(app)?;
        }
        let tenant = resolve_tenant(self.tenants.as_ref(), &input.tenant_domain)?;
        let scope = TemplateScope::new(tenant, input.application.as_deref())?;
        let channel = input.template.channel;

        self.resolver.ensure_scenario(&scenario, channel, tenant)?;
        match self.resolver.upsert(&input.template, &scope) {
            Err(TemplateError::ScenarioNotFound { .. }) => {
                tracing::debug!(
                    scenario = %scenario,
                    tenant = %tenant,
                    "scenario removed during upsert, retrying"
                );
                self.resolver.ensure_scenario(&scenario, channel, tenant)?;
                self.resolver.upsert(&input.template, &scope)?;
            }
            result => result?,
        }

        if let Some(caches) = &self.caches {
            caches
                .partition(tenant)
                .invalidate(&TemplateKey::new(&scenario, channel, scope.application()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{DefaultLocales, Locale, NotificationChannel};
    use crate::domain::repository::scenario_catalog::MockScenarioCatalog;
    use crate::domain::repository::template_store::MockTemplateStore;
    use crate::domain::repository::StoreError;
    use crate::domain::service::DefaultTemplateCatalog;
    use k1s0_tenant_client::{MockTenantResolver, TenantId};

    fn tenants() -> Arc<dyn TenantResolver> {
        let mut mock = MockTenantResolver::new();
        mock.expect_id_for().returning(|_| Ok(TenantId(1)));
        Arc::new(mock)
    }

    fn resolver(store: MockTemplateStore, scenarios: MockScenarioCatalog) -> Arc<LayeredResolver> {
        Arc::new(LayeredResolver::new(
            Arc::new(store),
            Arc::new(scenarios),
            Arc::new(DefaultTemplateCatalog::empty()),
            DefaultLocales::default(),
        ))
    }

    fn input() -> UpsertTemplateInput {
        UpsertTemplateInput {
            template: NotificationTemplate::sms("sms-otp", "en-us", "new code"),
            tenant_domain: "acme.com".to_string(),
            application: None,
        }
    }

    #[test]
    fn test_upsert_registers_missing_scenario_and_invalidates() {
        let mut scenarios = MockScenarioCatalog::new();
        scenarios.expect_exists().returning(|_, _, _| Ok(false));
        scenarios.expect_add().times(1).returning(|_, _, _| Ok(()));
        let mut store = MockTemplateStore::new();
        store.expect_write().times(1).returning(|_, _| Ok(()));

        let caches = Arc::new(TenantCacheRegistry::new(100, 60));
        let scenario = Scenario::parse("sms-otp").unwrap();
        let key = TemplateKey::new(&scenario, NotificationChannel::Sms, None);
        let en = Locale::parse("en-us").unwrap();
        caches
            .partition(TenantId(1))
            .put(&key, &en, NotificationTemplate::sms("sms-otp", "en-us", "old code"));

        let uc =
            UpsertTemplateUseCase::new(resolver(store, scenarios), tenants(), Some(caches.clone()));
        uc.execute(&input()).unwrap();

        assert!(caches.partition(TenantId(1)).get(&key, &en).is_none());
    }

    #[test]
    fn test_upsert_store_failure_keeps_cache() {
        let mut scenarios = MockScenarioCatalog::new();
        scenarios.expect_exists().returning(|_, _, _| Ok(true));
        let mut store = MockTemplateStore::new();
        store
            .expect_write()
            .returning(|_, _| Err(StoreError::Unavailable("disk full".to_string())));

        let caches = Arc::new(TenantCacheRegistry::new(100, 60));
        let scenario = Scenario::parse("sms-otp").unwrap();
        let key = TemplateKey::new(&scenario, NotificationChannel::Sms, None);
        let en = Locale::parse("en-us").unwrap();
        caches
            .partition(TenantId(1))
            .put(&key, &en, NotificationTemplate::sms("sms-otp", "en-us", "old code"));

        let uc =
            UpsertTemplateUseCase::new(resolver(store, scenarios), tenants(), Some(caches.clone()));
        assert!(uc.execute(&input()).is_err());
        assert!(caches.partition(TenantId(1)).get(&key, &en).is_some());
    }

    /// 登録直後にシナリオが削除されても再登録して書き込みが成功すること。
    #[test]
    fn test_upsert_retries_when_scenario_removed_concurrently() {
        let mut scenarios = MockScenarioCatalog::new();
        scenarios.expect_exists().times(2).returning(|_, _, _| Ok(false));
        scenarios.expect_add().times(2).returning(|_, _, _| Ok(()));
        let mut store = MockTemplateStore::new();
        let mut first = true;
        store.expect_write().times(2).returning(move |t, _| {
            if std::mem::take(&mut first) {
                Err(StoreError::UnknownScenario(t.scenario_key()))
            } else {
                Ok(())
            }
        });

        let uc = UpsertTemplateUseCase::new(resolver(store, scenarios), tenants(), None);
        uc.execute(&input()).unwrap();
    }

    #[test]
    fn test_upsert_repeatedly_removed_scenario_is_not_found() {
        let mut scenarios = MockScenarioCatalog::new();
        scenarios.expect_exists().returning(|_, _, _| Ok(true));
        let mut store = MockTemplateStore::new();
        store
            .expect_write()
            .times(2)
            .returning(|t, _| Err(StoreError::UnknownScenario(t.scenario_key())));

        let uc = UpsertTemplateUseCase::new(resolver(store, scenarios), tenants(), None);
        let err = uc.execute(&input()).unwrap_err();
        assert_eq!(err.kind(), crate::domain::ErrorKind::NotFound);
    }

    #[test]
    fn test_upsert_invalid_template_touches_nothing() {
        let mut tenants = MockTenantResolver::new();
        tenants.expect_id_for().never();
        let uc = UpsertTemplateUseCase::new(
            resolver(MockTemplateStore::new(), MockScenarioCatalog::new()),
            Arc::new(tenants),
            None,
        );
        let mut input = input();
        input.template.subject = Some("subject".to_string());

        let err = uc.execute(&input).unwrap_err();
        assert!(matches!(err, TemplateError::InvalidInput { field: "subject", .. }));
    }
}
