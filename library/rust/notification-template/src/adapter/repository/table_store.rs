use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use k1s0_tenant_client::TenantId;

use crate::domain::entity::{NotificationChannel, NotificationTemplate, Scenario, TemplateScope};
use crate::domain::repository::{ScenarioCatalog, StoreError, TemplateLocator, TemplateStore};

type ScenarioId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ScenarioRowKey {
    tenant: TenantId,
    channel: NotificationChannel,
    key: String,
}

#[derive(Debug, Clone)]
struct ScenarioRow {
    id: ScenarioId,
    display_name: String,
}

/// テーブル群。シナリオ表と、シナリオ ID をキーにした組織テンプレート表・
/// アプリケーションテンプレート表からなる。
#[derive(Debug, Default)]
struct Tables {
    next_id: ScenarioId,
    scenarios: HashMap<ScenarioRowKey, ScenarioRow>,
    // (scenario_id, locale)
    org_templates: HashMap<(ScenarioId, String), NotificationTemplate>,
    // (scenario_id, application, locale)
    app_templates: HashMap<(ScenarioId, String, String), NotificationTemplate>,
}

impl Tables {
    fn scenario(
        &self,
        scenario: &Scenario,
        channel: NotificationChannel,
        tenant: TenantId,
    ) -> Option<&ScenarioRow> {
        self.scenarios.get(&ScenarioRowKey {
            tenant,
            channel,
            key: scenario.key().to_string(),
        })
    }

    fn templates_of(&self, id: ScenarioId, scope: &TemplateScope) -> Vec<NotificationTemplate> {
        match scope.application() {
            None => self
                .org_templates
                .iter()
                .filter(|((sid, _), _)| *sid == id)
                .map(|(_, t)| t.clone())
                .collect(),
            Some(app) => self
                .app_templates
                .iter()
                .filter(|((sid, a, _), _)| *sid == id && a == app)
                .map(|(_, t)| t.clone())
                .collect(),
        }
    }
}

/// TableTemplateStore はリレーショナルなテーブル構成を模したインメモリストア。
///
/// すべての変更を 1 つの書き込みロックの下で行うため、シナリオ削除に伴う
/// テンプレートの連鎖削除は呼び出し側から原子的に見える。
#[derive(Debug, Default)]
pub struct TableTemplateStore {
    tables: RwLock<Tables>,
}

impl TableTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_tables(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables.read().map_err(StoreError::poisoned)
    }

    fn write_tables(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables.write().map_err(StoreError::poisoned)
    }
}

impl TemplateStore for TableTemplateStore {
    fn read(&self, locator: &TemplateLocator) -> Result<Option<NotificationTemplate>, StoreError> {
        let tables = self.read_tables()?;
        let row = tables.scenario(&locator.scenario, locator.channel, locator.scope.tenant);
        let Some(row) = row else {
            return Ok(None);
        };
        let locale = locator.locale.as_str().to_string();
        let template = match locator.scope.application() {
            None => tables.org_templates.get(&(row.id, locale)),
            Some(app) => tables.app_templates.get(&(row.id, app.to_string(), locale)),
        };
        Ok(template.cloned())
    }

    fn write(
        &self,
        template: &NotificationTemplate,
        scope: &TemplateScope,
    ) -> Result<(), StoreError> {
        let scenario_key = template.scenario_key();
        let mut tables = self.write_tables()?;
        let row = tables
            .scenarios
            .get(&ScenarioRowKey {
                tenant: scope.tenant,
                channel: template.channel,
                key: scenario_key,
            })
            .cloned()
            .ok_or_else(|| StoreError::UnknownScenario(template.scenario.clone()))?;

        let mut stored = template.clone();
        stored.scenario = row.display_name;
        match scope.application() {
            None => {
                tables
                    .org_templates
                    .insert((row.id, stored.locale.clone()), stored);
            }
            Some(app) => {
                tables
                    .app_templates
                    .insert((row.id, app.to_string(), stored.locale.clone()), stored);
            }
        }
        Ok(())
    }

    fn delete(&self, locator: &TemplateLocator) -> Result<bool, StoreError> {
        let mut tables = self.write_tables()?;
        let Some(id) = tables
            .scenario(&locator.scenario, locator.channel, locator.scope.tenant)
            .map(|row| row.id)
        else {
            return Ok(false);
        };
        let locale = locator.locale.as_str().to_string();
        let removed = match locator.scope.application() {
            None => tables.org_templates.remove(&(id, locale)),
            Some(app) => tables.app_templates.remove(&(id, app.to_string(), locale)),
        };
        Ok(removed.is_some())
    }

    fn list(
        &self,
        scenario: &Scenario,
        channel: NotificationChannel,
        scope: &TemplateScope,
    ) -> Result<Vec<NotificationTemplate>, StoreError> {
        let tables = self.read_tables()?;
        Ok(tables
            .scenario(scenario, channel, scope.tenant)
            .map(|row| tables.templates_of(row.id, scope))
            .unwrap_or_default())
    }

    fn list_all(
        &self,
        channel: NotificationChannel,
        tenant: TenantId,
    ) -> Result<Vec<NotificationTemplate>, StoreError> {
        let tables = self.read_tables()?;
        let org = TemplateScope::organization(tenant);
        Ok(tables
            .scenarios
            .iter()
            .filter(|(k, _)| k.tenant == tenant && k.channel == channel)
            .flat_map(|(_, row)| tables.templates_of(row.id, &org))
            .collect())
    }

    fn delete_all(
        &self,
        scenario: &Scenario,
        channel: NotificationChannel,
        scope: &TemplateScope,
    ) -> Result<usize, StoreError> {
        let mut tables = self.write_tables()?;
        let Some(id) = tables.scenario(scenario, channel, scope.tenant).map(|row| row.id) else {
            return Ok(0);
        };
        let count = match scope.application() {
            None => {
                let before = tables.org_templates.len();
                tables.org_templates.retain(|(sid, _), _| *sid != id);
                before - tables.org_templates.len()
            }
            Some(app) => {
                let before = tables.app_templates.len();
                tables
                    .app_templates
                    .retain(|(sid, a, _), _| !(*sid == id && a == app));
                before - tables.app_templates.len()
            }
        };
        Ok(count)
    }
}

impl ScenarioCatalog for TableTemplateStore {
    fn add(
        &self,
        scenario: &Scenario,
        channel: NotificationChannel,
        tenant: TenantId,
    ) -> Result<(), StoreError> {
        let mut tables = self.write_tables()?;
        let key = ScenarioRowKey {
            tenant,
            channel,
            key: scenario.key().to_string(),
        };
        if tables.scenarios.contains_key(&key) {
            return Ok(());
        }
        tables.next_id += 1;
        let row = ScenarioRow {
            id: tables.next_id,
            display_name: scenario.display_name().to_string(),
        };
        tables.scenarios.insert(key, row);
        Ok(())
    }

    fn exists(
        &self,
        scenario: &Scenario,
        channel: NotificationChannel,
        tenant: TenantId,
    ) -> Result<bool, StoreError> {
        Ok(self.read_tables()?.scenario(scenario, channel, tenant).is_some())
    }

    fn list(
        &self,
        channel: NotificationChannel,
        tenant: TenantId,
    ) -> Result<Vec<String>, StoreError> {
        let tables = self.read_tables()?;
        Ok(tables
            .scenarios
            .iter()
            .filter(|(k, _)| k.tenant == tenant && k.channel == channel)
            .map(|(_, row)| row.display_name.clone())
            .collect())
    }

    fn remove(
        &self,
        scenario: &Scenario,
        channel: NotificationChannel,
        tenant: TenantId,
    ) -> Result<bool, StoreError> {
        let mut tables = self.write_tables()?;
        let Some(row) = tables.scenarios.remove(&ScenarioRowKey {
            tenant,
            channel,
            key: scenario.key().to_string(),
        }) else {
            return Ok(false);
        };
        tables.org_templates.retain(|(sid, _), _| *sid != row.id);
        tables.app_templates.retain(|(sid, _, _), _| *sid != row.id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Locale;

    const TENANT: TenantId = TenantId(1);

    fn scenario(name: &str) -> Scenario {
        Scenario::parse(name).unwrap()
    }

    fn locator(name: &str, locale: &str, application: Option<&str>) -> TemplateLocator {
        TemplateLocator::new(
            scenario(name),
            Locale::parse(locale).unwrap(),
            NotificationChannel::Sms,
            TemplateScope::new(TENANT, application).unwrap(),
        )
    }

    fn store_with(name: &str) -> TableTemplateStore {
        let store = TableTemplateStore::new();
        store.add(&scenario(name), NotificationChannel::Sms, TENANT).unwrap();
        store
    }

    #[test]
    fn test_write_requires_registered_scenario() {
        let store = TableTemplateStore::new();
        let result = store.write(
            &NotificationTemplate::sms("sms-otp", "en-us", "code"),
            &TemplateScope::organization(TENANT),
        );
        assert!(matches!(result, Err(StoreError::UnknownScenario(_))));
    }

    #[test]
    fn test_write_then_read_uses_scenario_display_name() {
        let store = store_with("SMS OTP");
        store
            .write(
                &NotificationTemplate::sms("smsotp", "en-us", "code"),
                &TemplateScope::organization(TENANT),
            )
            .unwrap();
        let template = store.read(&locator("sms otp", "en-us", None)).unwrap().unwrap();
        assert_eq!(template.scenario, "SMS OTP");
        assert_eq!(template.body, "code");
    }

    #[test]
    fn test_application_scope_does_not_fall_back_to_org() {
        let store = store_with("sms-otp");
        store
            .write(
                &NotificationTemplate::sms("sms-otp", "en-us", "org"),
                &TemplateScope::organization(TENANT),
            )
            .unwrap();
        assert!(store.read(&locator("sms-otp", "en-us", Some("portal"))).unwrap().is_none());
    }

    #[test]
    fn test_tenants_are_isolated() {
        let store = store_with("sms-otp");
        store
            .write(
                &NotificationTemplate::sms("sms-otp", "en-us", "tenant 1"),
                &TemplateScope::organization(TENANT),
            )
            .unwrap();
        let other = TemplateLocator::new(
            scenario("sms-otp"),
            Locale::parse("en-us").unwrap(),
            NotificationChannel::Sms,
            TemplateScope::organization(TenantId(2)),
        );
        assert!(store.read(&other).unwrap().is_none());
        assert!(!store
            .exists(&scenario("sms-otp"), NotificationChannel::Sms, TenantId(2))
            .unwrap());
    }

    #[test]
    fn test_delete_all_limited_to_scope() {
        let store = store_with("sms-otp");
        let org = TemplateScope::organization(TENANT);
        let app = TemplateScope::new(TENANT, Some("portal")).unwrap();
        for locale in ["en-us", "fr-fr"] {
            store.write(&NotificationTemplate::sms("sms-otp", locale, "org"), &org).unwrap();
            store.write(&NotificationTemplate::sms("sms-otp", locale, "app"), &app).unwrap();
        }

        let sc = scenario("sms-otp");
        assert_eq!(store.delete_all(&sc, NotificationChannel::Sms, &app).unwrap(), 2);
        let listed = |scope: &TemplateScope| {
            TemplateStore::list(&store, &sc, NotificationChannel::Sms, scope).unwrap().len()
        };
        assert_eq!(listed(&org), 2);
        assert_eq!(listed(&app), 0);
    }

    #[test]
    fn test_remove_cascades() {
        let store = store_with("sms-otp");
        let app = TemplateScope::new(TENANT, Some("portal")).unwrap();
        let org = TemplateScope::organization(TENANT);
        store.write(&NotificationTemplate::sms("sms-otp", "en-us", "org"), &org).unwrap();
        store.write(&NotificationTemplate::sms("sms-otp", "en-us", "app"), &app).unwrap();

        assert!(store.remove(&scenario("sms-otp"), NotificationChannel::Sms, TENANT).unwrap());
        assert!(!store.remove(&scenario("sms-otp"), NotificationChannel::Sms, TENANT).unwrap());
        assert!(store.read(&locator("sms-otp", "en-us", None)).unwrap().is_none());

        // 同名で再登録しても以前のテンプレートは復活しない
        store.add(&scenario("sms-otp"), NotificationChannel::Sms, TENANT).unwrap();
        assert!(store.read(&locator("sms-otp", "en-us", Some("portal"))).unwrap().is_none());
    }

    #[test]
    fn test_list_all_returns_org_templates_only() {
        let store = store_with("sms-otp");
        store.add(&scenario("welcome"), NotificationChannel::Sms, TENANT).unwrap();
        let org = TemplateScope::organization(TENANT);
        store.write(&NotificationTemplate::sms("sms-otp", "en-us", "a"), &org).unwrap();
        store.write(&NotificationTemplate::sms("welcome", "en-us", "b"), &org).unwrap();
        store
            .write(
                &NotificationTemplate::sms("welcome", "en-us", "c"),
                &TemplateScope::new(TENANT, Some("portal")).unwrap(),
            )
            .unwrap();

        assert_eq!(store.list_all(NotificationChannel::Sms, TENANT).unwrap().len(), 2);
        assert!(store.list_all(NotificationChannel::Email, TENANT).unwrap().is_empty());
    }
}
