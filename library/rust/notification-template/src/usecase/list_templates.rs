use std::sync::Arc;

use k1s0_tenant_client::TenantResolver;

use crate::domain::entity::{NotificationChannel, NotificationTemplate, Scenario, TemplateScope};
use crate::domain::error::TemplateError;
use crate::domain::service::LayeredResolver;
use crate::usecase::resolve_tenant;

#[derive(Debug, Clone)]
pub struct ListTemplatesInput {
    pub scenario: String,
    pub channel: NotificationChannel,
    pub tenant_domain: String,
    pub application: Option<String>,
}

/// ListTemplatesUseCase は 1 シナリオの全ロケールのテンプレートを一覧するユースケース。
/// 結果の順序は保証しない。
pub struct ListTemplatesUseCase {
    resolver: Arc<LayeredResolver>,
    tenants: Arc<dyn TenantResolver>,
}

impl ListTemplatesUseCase {
    pub fn new(resolver: Arc<LayeredResolver>, tenants: Arc<dyn TenantResolver>) -> Self {
        Self { resolver, tenants }
    }

    pub fn execute(
        &self,
        input: &ListTemplatesInput,
    ) -> Result<Vec<NotificationTemplate>, TemplateError> {
        let scenario = Scenario::parse(&input.scenario)?;
        if let Some(app) = &input.application {
            k1s0_validation::validate_application_id(app)?;
        }
        let tenant = resolve_tenant(self.tenants.as_ref(), &input.tenant_domain)?;
        let scope = TemplateScope::new(tenant, input.application.as_deref())?;
        self.resolver.list_by_scenario(&scenario, input.channel, &scope)
    }
}
