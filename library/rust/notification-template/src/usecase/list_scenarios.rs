use std::sync::Arc;

use k1s0_tenant_client::TenantResolver;

use crate::domain::entity::NotificationChannel;
use crate::domain::error::TemplateError;
use crate::domain::service::LayeredResolver;
use crate::usecase::resolve_tenant;

/// ListScenariosUseCase はテナントで利用可能なシナリオ表示名を一覧する。
pub struct ListScenariosUseCase {
    resolver: Arc<LayeredResolver>,
    tenants: Arc<dyn TenantResolver>,
}

impl ListScenariosUseCase {
    pub fn new(resolver: Arc<LayeredResolver>, tenants: Arc<dyn TenantResolver>) -> Self {
        Self { resolver, tenants }
    }

    pub fn execute(
        &self,
        channel: NotificationChannel,
        tenant_domain: &str,
    ) -> Result<Vec<String>, TemplateError> {
        let tenant = resolve_tenant(self.tenants.as_ref(), tenant_domain)?;
        self.resolver.list_scenarios(channel, tenant)
    }
}
