use std::sync::Arc;

use k1s0_tenant_client::TenantId;
use tracing::{debug, error, info, warn};

use crate::domain::entity::{
    DefaultLocales, Locale, NotificationChannel, NotificationTemplate, Scenario, TemplateKey,
    TemplateScope,
};
use crate::domain::error::TemplateError;
use crate::domain::repository::{ScenarioCatalog, StoreError, TemplateLocator, TemplateStore};
use crate::domain::service::default_catalog::DefaultTemplateCatalog;
use crate::domain::service::locale_fallback::{FallbackPlan, FallbackState};
use crate::domain::service::result_merger::merge;

/// ResolveRequest は検証済みの解決要求。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    pub scenario: Scenario,
    pub locale: Locale,
    pub channel: NotificationChannel,
    pub scope: TemplateScope,
}

impl ResolveRequest {
    /// 入力を検証して要求を組み立てる。I/O は行わない。
    pub fn parse(
        scenario: &str,
        locale: &str,
        channel: NotificationChannel,
        tenant: TenantId,
        application: Option<&str>,
    ) -> Result<Self, TemplateError> {
        Ok(Self {
            scenario: Scenario::parse(scenario)?,
            locale: Locale::parse(locale)?,
            channel,
            scope: TemplateScope::new(tenant, application)?,
        })
    }

    pub fn key(&self) -> TemplateKey {
        TemplateKey::new(&self.scenario, self.channel, self.scope.application())
    }

    fn locator(&self, locale: &Locale) -> TemplateLocator {
        TemplateLocator::new(
            self.scenario.clone(),
            locale.clone(),
            self.channel,
            self.scope.clone(),
        )
    }
}

/// ResolvedTemplate は解決結果と、それが見つかった階層。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    pub template: NotificationTemplate,
    pub tier: FallbackState,
}

/// LayeredResolver は永続ストアと組み込みデフォルトカタログを合成し、
/// どちらか単体と同じ契約でテンプレートを提供する。
///
/// 永続ストアが常に優先され、書き込みは永続ストアにのみ委譲する。
pub struct LayeredResolver {
    store: Arc<dyn TemplateStore>,
    scenarios: Arc<dyn ScenarioCatalog>,
    defaults: Arc<DefaultTemplateCatalog>,
    locales: DefaultLocales,
}

impl LayeredResolver {
    pub fn new(
        store: Arc<dyn TemplateStore>,
        scenarios: Arc<dyn ScenarioCatalog>,
        defaults: Arc<DefaultTemplateCatalog>,
        locales: DefaultLocales,
    ) -> Self {
        Self {
            store,
            scenarios,
            defaults,
            locales,
        }
    }

    pub fn default_locales(&self) -> &DefaultLocales {
        &self.locales
    }

    pub fn defaults(&self) -> &DefaultTemplateCatalog {
        &self.defaults
    }

    /// ロケールフォールバックに従ってテンプレートを解決する。
    ///
    /// 使用可能なテンプレートが見つかった時点で以降の階層は照会しない。
    /// 本文が空のレコードは見つかった時点で `EmptyContent` とする。
    pub fn resolve(&self, request: &ResolveRequest) -> Result<ResolvedTemplate, TemplateError> {
        let default_locale = self.locales.for_channel(request.channel);
        let requested_is_default = request.locale == *default_locale;

        for tier in FallbackPlan::new(requested_is_default) {
            let Some(template) = self.lookup(tier, request, default_locale)? else {
                continue;
            };
            if !template.has_content() {
                warn!(
                    scenario = %request.scenario,
                    locale = %template.locale,
                    channel = %request.channel,
                    tenant = %request.scope.tenant,
                    tier = %tier,
                    "template has an empty body"
                );
                return Err(TemplateError::EmptyContent {
                    scenario: request.scenario.display_name().to_string(),
                    locale: template.locale,
                    channel: request.channel,
                    tier: tier.as_str(),
                });
            }
            debug!(
                scenario = %request.scenario,
                locale = %request.locale,
                channel = %request.channel,
                tenant = %request.scope.tenant,
                tier = %tier,
                "template resolved"
            );
            return Ok(ResolvedTemplate {
                template: template.with_utf8_charset(),
                tier,
            });
        }

        error!(
            scenario = %request.scenario,
            locale = %request.locale,
            channel = %request.channel,
            tenant = %request.scope.tenant,
            application = request.scope.application().unwrap_or("-"),
            "no template found in any tier"
        );
        Err(TemplateError::TemplateNotFound {
            scenario: request.scenario.display_name().to_string(),
            locale: request.locale.to_string(),
            channel: request.channel,
            tenant: request.scope.tenant,
            application: request.scope.application.clone(),
        })
    }

    fn lookup(
        &self,
        tier: FallbackState,
        request: &ResolveRequest,
        default_locale: &Locale,
    ) -> Result<Option<NotificationTemplate>, TemplateError> {
        match tier {
            FallbackState::Exact => self.read_durable(tier, &request.locator(&request.locale)),
            FallbackState::DefaultLocale => {
                self.read_durable(tier, &request.locator(default_locale))
            }
            FallbackState::SystemDefault => Ok(self
                .defaults
                .get(&request.scenario, request.channel)
                .cloned()),
            FallbackState::Unsatisfied => Ok(None),
        }
    }

    fn read_durable(
        &self,
        tier: FallbackState,
        locator: &TemplateLocator,
    ) -> Result<Option<NotificationTemplate>, TemplateError> {
        self.store.read(locator).map_err(|e| {
            error!(
                error = %e,
                scenario = %locator.scenario,
                locale = %locator.locale,
                tier = %tier,
                "failed to read template store"
            );
            TemplateError::Store {
                context: format!(
                    "reading {} tier for '{}' in locale '{}' ({})",
                    tier, locator.scenario, locator.locale, locator.scope
                ),
                source: e,
            }
        })
    }

    /// 要求ロケールのテンプレートがいずれかの階層に存在するか。フォールバックはしない。
    pub fn template_exists(&self, request: &ResolveRequest) -> Result<bool, TemplateError> {
        if self.durable_template_exists(request)? {
            return Ok(true);
        }
        Ok(self
            .defaults
            .get(&request.scenario, request.channel)
            .is_some_and(|t| t.locale == request.locale.as_str()))
    }

    /// 要求スコープ・要求ロケールのテンプレートが永続ストアにあるか。
    pub fn durable_template_exists(&self, request: &ResolveRequest) -> Result<bool, TemplateError> {
        let durable = self
            .store
            .read(&request.locator(&request.locale))
            .map_err(TemplateError::store(format!(
                "checking template '{}' in locale '{}' ({})",
                request.scenario, request.locale, request.scope
            )))?;
        Ok(durable.is_some())
    }

    pub fn scenario_exists(
        &self,
        scenario: &Scenario,
        channel: NotificationChannel,
        tenant: TenantId,
    ) -> Result<bool, TemplateError> {
        if self.durable_scenario_exists(scenario, channel, tenant)? {
            return Ok(true);
        }
        Ok(self.defaults.contains_scenario(scenario, channel))
    }

    fn durable_scenario_exists(
        &self,
        scenario: &Scenario,
        channel: NotificationChannel,
        tenant: TenantId,
    ) -> Result<bool, TemplateError> {
        self.scenarios
            .exists(scenario, channel, tenant)
            .map_err(TemplateError::store(format!(
                "checking scenario '{}' ({}) in tenant {}",
                scenario, channel, tenant
            )))
    }

    /// 永続ストアとカタログのシナリオ表示名を統合して返す。順序は保証しない。
    pub fn list_scenarios(
        &self,
        channel: NotificationChannel,
        tenant: TenantId,
    ) -> Result<Vec<String>, TemplateError> {
        let durable = self
            .scenarios
            .list(channel, tenant)
            .map_err(TemplateError::store(format!(
                "listing {} scenarios in tenant {}",
                channel, tenant
            )))?;
        Ok(merge(durable, self.defaults.scenario_names(channel)))
    }

    /// シナリオの全ロケールのテンプレートを返す。
    /// カタログのテンプレートはスコープに依存せず統合される。
    pub fn list_by_scenario(
        &self,
        scenario: &Scenario,
        channel: NotificationChannel,
        scope: &TemplateScope,
    ) -> Result<Vec<NotificationTemplate>, TemplateError> {
        let in_durable = self.durable_scenario_exists(scenario, channel, scope.tenant)?;
        let in_defaults = self.defaults.get(scenario, channel);
        if !in_durable && in_defaults.is_none() {
            return Err(TemplateError::ScenarioNotFound {
                scenario: scenario.display_name().to_string(),
                channel,
                tenant: scope.tenant,
            });
        }

        let durable = if in_durable {
            self.store
                .list(scenario, channel, scope)
                .map_err(TemplateError::store(format!(
                    "listing templates of '{}' ({}) in {}",
                    scenario, channel, scope
                )))?
        } else {
            Vec::new()
        };
        let defaults = in_defaults.cloned().into_iter().collect();
        Ok(finish_list(merge(durable, defaults)))
    }

    /// テナントの組織レベルの全テンプレートとカタログを統合して返す。
    pub fn list_all(
        &self,
        channel: NotificationChannel,
        tenant: TenantId,
    ) -> Result<Vec<NotificationTemplate>, TemplateError> {
        let durable = self
            .store
            .list_all(channel, tenant)
            .map_err(TemplateError::store(format!(
                "listing {} templates in tenant {}",
                channel, tenant
            )))?;
        Ok(finish_list(merge(durable, self.defaults.templates(channel))))
    }

    // -----------------------------------------------------------------------
    // 書き込みは永続ストアにのみ委譲する
    // -----------------------------------------------------------------------

    /// 永続ストアにシナリオを登録する。既に登録済みなら `ScenarioAlreadyExists`。
    pub fn add_scenario(
        &self,
        scenario: &Scenario,
        channel: NotificationChannel,
        tenant: TenantId,
    ) -> Result<(), TemplateError> {
        if self.durable_scenario_exists(scenario, channel, tenant)? {
            return Err(TemplateError::ScenarioAlreadyExists {
                scenario: scenario.display_name().to_string(),
                channel,
                tenant,
            });
        }
        self.scenarios
            .add(scenario, channel, tenant)
            .map_err(TemplateError::store(format!(
                "adding scenario '{}' ({}) in tenant {}",
                scenario, channel, tenant
            )))?;
        info!(scenario = %scenario, channel = %channel, tenant = %tenant, "scenario added");
        Ok(())
    }

    /// 永続ストアに未登録ならシナリオを登録する。登録した場合は true。
    pub fn ensure_scenario(
        &self,
        scenario: &Scenario,
        channel: NotificationChannel,
        tenant: TenantId,
    ) -> Result<bool, TemplateError> {
        match self.add_scenario(scenario, channel, tenant) {
            Ok(()) => Ok(true),
            Err(TemplateError::ScenarioAlreadyExists { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// テンプレートを検証して永続ストアへ upsert する。
    /// シナリオが永続ストアに未登録なら `ScenarioNotFound`。
    pub fn upsert(
        &self,
        template: &NotificationTemplate,
        scope: &TemplateScope,
    ) -> Result<(), TemplateError> {
        template.validate_for_write()?;
        let template = template.clone().normalized();
        self.store.write(&template, scope).map_err(|e| match e {
            StoreError::UnknownScenario(_) => TemplateError::ScenarioNotFound {
                scenario: template.scenario.clone(),
                channel: template.channel,
                tenant: scope.tenant,
            },
            e => TemplateError::store(format!(
                "writing template '{}' in locale '{}' ({})",
                template.scenario, template.locale, scope
            ))(e),
        })?;
        info!(
            scenario = %template.scenario,
            locale = %template.locale,
            channel = %template.channel,
            tenant = %scope.tenant,
            application = scope.application().unwrap_or("-"),
            "template saved"
        );
        Ok(())
    }

    /// 永続ストアのテンプレートを 1 件削除する。削除した場合は true。
    pub fn delete(&self, locator: &TemplateLocator) -> Result<bool, TemplateError> {
        let deleted = self
            .store
            .delete(locator)
            .map_err(TemplateError::store(format!(
                "deleting template '{}' in locale '{}' ({})",
                locator.scenario, locator.locale, locator.scope
            )))?;
        if deleted {
            info!(
                scenario = %locator.scenario,
                locale = %locator.locale,
                channel = %locator.channel,
                tenant = %locator.scope.tenant,
                "template deleted"
            );
        }
        Ok(deleted)
    }

    /// 1 スコープ内のシナリオの全ロケールを削除する。
    pub fn delete_all(
        &self,
        scenario: &Scenario,
        channel: NotificationChannel,
        scope: &TemplateScope,
    ) -> Result<usize, TemplateError> {
        if !self.durable_scenario_exists(scenario, channel, scope.tenant)? {
            return Ok(0);
        }
        let count = self
            .store
            .delete_all(scenario, channel, scope)
            .map_err(TemplateError::store(format!(
                "deleting templates of '{}' ({}) in {}",
                scenario, channel, scope
            )))?;
        info!(
            scenario = %scenario,
            channel = %channel,
            tenant = %scope.tenant,
            count,
            "templates deleted"
        );
        Ok(count)
    }

    /// シナリオとその全テンプレートを永続ストアから削除する。
    /// カタログ由来のシナリオは削除できず、false を返す。
    pub fn remove_scenario(
        &self,
        scenario: &Scenario,
        channel: NotificationChannel,
        tenant: TenantId,
    ) -> Result<bool, TemplateError> {
        let removed = self
            .scenarios
            .remove(scenario, channel, tenant)
            .map_err(TemplateError::store(format!(
                "removing scenario '{}' ({}) in tenant {}",
                scenario, channel, tenant
            )))?;
        if removed {
            info!(scenario = %scenario, channel = %channel, tenant = %tenant, "scenario removed");
        }
        Ok(removed)
    }
}

fn finish_list(templates: Vec<NotificationTemplate>) -> Vec<NotificationTemplate> {
    templates.into_iter().map(NotificationTemplate::with_utf8_charset).collect()
}
