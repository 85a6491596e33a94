use std::sync::Arc;

use k1s0_tenant_client::TenantResolver;

use crate::domain::entity::{NotificationChannel, Scenario};
use crate::domain::error::TemplateError;
use crate::domain::service::LayeredResolver;
use crate::usecase::resolve_tenant;

/// AddScenarioUseCase はテナントにシナリオを登録するユースケース。
pub struct AddScenarioUseCase {
    resolver: Arc<LayeredResolver>,
    tenants: Arc<dyn TenantResolver>,
}

impl AddScenarioUseCase {
    pub fn new(resolver: Arc<LayeredResolver>, tenants: Arc<dyn TenantResolver>) -> Self {
        Self { resolver, tenants }
    }

    pub fn execute(
        &self,
        scenario: &str,
        channel: NotificationChannel,
        tenant_domain: &str,
    ) -> Result<(), TemplateError> {
        let scenario = Scenario::parse(scenario)?;
        let tenant = resolve_tenant(self.tenants.as_ref(), tenant_domain)?;
        self.resolver.add_scenario(&scenario, channel, tenant)
    }
}
