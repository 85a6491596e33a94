use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use k1s0_tenant_client::{CachedTenantResolver, TenantClientConfig, TenantResolver};

use crate::adapter::repository::{ResourceTreeTemplateStore, TableTemplateStore};
use crate::domain::entity::DefaultLocales;
use crate::domain::repository::{ScenarioCatalog, TemplateStore};
use crate::domain::service::LayeredResolver;
use crate::infrastructure::cache::TenantCacheRegistry;
use crate::infrastructure::config::{Config, StoreBackend};
use crate::infrastructure::default_templates;
use crate::usecase::{
    AddDefaultTemplatesUseCase, AddScenarioUseCase, DeleteScenarioUseCase, DeleteTemplateUseCase,
    DeleteTemplatesUseCase, ListAllTemplatesUseCase, ListScenariosUseCase, ListTemplatesUseCase,
    ResolveTemplateUseCase, ScenarioExistsUseCase, TemplateExistsUseCase, UpsertTemplateUseCase,
};

/// TemplateManager は構築済みのユースケース一式を保持する。
pub struct TemplateManager {
    pub resolve: ResolveTemplateUseCase,
    pub exists: TemplateExistsUseCase,
    pub scenario_exists: ScenarioExistsUseCase,
    pub list_templates: ListTemplatesUseCase,
    pub list_all_templates: ListAllTemplatesUseCase,
    pub list_scenarios: ListScenariosUseCase,
    pub add_scenario: AddScenarioUseCase,
    pub upsert: UpsertTemplateUseCase,
    pub delete_template: DeleteTemplateUseCase,
    pub delete_templates: DeleteTemplatesUseCase,
    pub delete_scenario: DeleteScenarioUseCase,
    pub add_default_templates: AddDefaultTemplatesUseCase,
}

/// 設定からオブジェクトグラフを構築する。
///
/// ロガーを初期化し、選択された永続ストア・組み込みカタログ・キャッシュ付きテナント解決・
/// キャッシュレジストリを各ユースケースに注入する。
pub fn build(
    cfg: &Config,
    tenant_resolver: Arc<dyn TenantResolver>,
) -> anyhow::Result<TemplateManager> {
    k1s0_telemetry::init_logger(&cfg.app.environment, &cfg.logging.format);

    let locales = DefaultLocales::parse(&cfg.locale.email_default, &cfg.locale.sms_default)
        .context("invalid default locale configuration")?;
    let defaults = Arc::new(
        default_templates::built_in_catalog(&locales)
            .context("failed to load built-in default templates")?,
    );

    let (store, scenarios) = match cfg.store.backend {
        StoreBackend::Table => split_backend(Arc::new(TableTemplateStore::new())),
        StoreBackend::ResourceTree => split_backend(Arc::new(ResourceTreeTemplateStore::new())),
    };

    let tenant_config = TenantClientConfig::new()
        .cache_ttl(Duration::from_secs(cfg.tenant.cache_ttl_secs))
        .cache_max_capacity(cfg.tenant.cache_max_capacity);
    let tenants: Arc<dyn TenantResolver> =
        Arc::new(CachedTenantResolver::new(tenant_resolver, &tenant_config));

    let caches = cfg
        .cache
        .enabled
        .then(|| Arc::new(TenantCacheRegistry::new(cfg.cache.max_capacity, cfg.cache.ttl_secs)));

    let resolver = Arc::new(LayeredResolver::new(store, scenarios, defaults.clone(), locales));

    tracing::info!(
        app = %cfg.app.name,
        version = %cfg.app.version,
        backend = ?cfg.store.backend,
        cache_enabled = cfg.cache.enabled,
        default_templates = defaults.len(),
        "notification template manager initialised"
    );

    Ok(TemplateManager {
        resolve: ResolveTemplateUseCase::new(resolver.clone(), tenants.clone(), caches.clone()),
        exists: TemplateExistsUseCase::new(resolver.clone(), tenants.clone()),
        scenario_exists: ScenarioExistsUseCase::new(resolver.clone(), tenants.clone()),
        list_templates: ListTemplatesUseCase::new(resolver.clone(), tenants.clone()),
        list_all_templates: ListAllTemplatesUseCase::new(resolver.clone(), tenants.clone()),
        list_scenarios: ListScenariosUseCase::new(resolver.clone(), tenants.clone()),
        add_scenario: AddScenarioUseCase::new(resolver.clone(), tenants.clone()),
        upsert: UpsertTemplateUseCase::new(resolver.clone(), tenants.clone(), caches.clone()),
        delete_template: DeleteTemplateUseCase::new(
            resolver.clone(),
            tenants.clone(),
            caches.clone(),
        ),
        delete_templates: DeleteTemplatesUseCase::new(
            resolver.clone(),
            tenants.clone(),
            caches.clone(),
        ),
        delete_scenario: DeleteScenarioUseCase::new(
            resolver.clone(),
            tenants.clone(),
            caches.clone(),
        ),
        add_default_templates: AddDefaultTemplatesUseCase::new(resolver, tenants, caches),
    })
}

/// 1 つのバックエンドをテンプレートストアとシナリオカタログの両方として共有する。
fn split_backend<B>(backend: Arc<B>) -> (Arc<dyn TemplateStore>, Arc<dyn ScenarioCatalog>)
where
    B: TemplateStore + ScenarioCatalog + 'static,
{
    (backend.clone(), backend)
}
