pub mod add_default_templates;
pub mod add_scenario;
pub mod delete_scenario;
pub mod delete_template;
pub mod delete_templates;
pub mod list_all_templates;
pub mod list_scenarios;
pub mod list_templates;
pub mod resolve_template;
pub mod scenario_exists;
pub mod template_exists;
pub mod upsert_template;

pub use add_default_templates::AddDefaultTemplatesUseCase;
pub use add_scenario::AddScenarioUseCase;
pub use delete_scenario::DeleteScenarioUseCase;
pub use delete_template::{DeleteTemplateInput, DeleteTemplateUseCase};
pub use delete_templates::{DeleteTemplatesInput, DeleteTemplatesUseCase};
pub use list_all_templates::ListAllTemplatesUseCase;
pub use list_scenarios::ListScenariosUseCase;
pub use list_templates::{ListTemplatesInput, ListTemplatesUseCase};
pub use resolve_template::{ResolveTemplateInput, ResolveTemplateUseCase};
pub use scenario_exists::ScenarioExistsUseCase;
pub use template_exists::TemplateExistsUseCase;
pub use upsert_template::{UpsertTemplateInput, UpsertTemplateUseCase};

use k1s0_tenant_client::{TenantId, TenantResolver};

use crate::domain::error::TemplateError;

/// テナントドメインをテナント ID に解決する。失敗はサーバーエラーとして扱う。
pub(crate) fn resolve_tenant(
    tenants: &dyn TenantResolver,
    tenant_domain: &str,
) -> Result<TenantId, TemplateError> {
    tenants.id_for(tenant_domain).map_err(|e| {
        tracing::error!(error = %e, tenant_domain, "failed to resolve tenant");
        TemplateError::Tenant {
            tenant_domain: tenant_domain.to_string(),
            source: e,
        }
    })
}
