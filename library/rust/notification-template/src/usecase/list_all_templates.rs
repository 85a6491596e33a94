use std::sync::Arc;

use k1s0_tenant_client::TenantResolver;

use crate::domain::entity::{NotificationChannel, NotificationTemplate};
use crate::domain::error::TemplateError;
use crate::domain::service::LayeredResolver;
use crate::usecase::resolve_tenant;

/// ListAllTemplatesUseCase はテナントの組織レベルのテンプレートとデフォルトを一覧する。
pub struct ListAllTemplatesUseCase {
    resolver: Arc<LayeredResolver>,
    tenants: Arc<dyn TenantResolver>,
}

impl ListAllTemplatesUseCase {
    pub fn new(resolver: Arc<LayeredResolver>, tenants: Arc<dyn TenantResolver>) -> Self {
        Self { resolver, tenants }
    }

    pub fn execute(
        &self,
        channel: NotificationChannel,
        tenant_domain: &str,
    ) -> Result<Vec<NotificationTemplate>, TemplateError> {
        let tenant = resolve_tenant(self.tenants.as_ref(), tenant_domain)?;
        self.resolver.list_all(channel, tenant)
    }
}
