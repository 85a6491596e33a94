use std::sync::Arc;

use k1s0_tenant_client::TenantResolver;

use crate::domain::entity::{
    Locale, NotificationChannel, NotificationTemplate, Scenario, TemplateScope,
};
use crate::domain::error::TemplateError;
use crate::domain::service::{LayeredResolver, ResolveRequest};
use crate::infrastructure::cache::TenantCacheRegistry;
use crate::usecase::resolve_tenant;

/// ResolveTemplateInput は解決要求の入力。
#[derive(Debug, Clone)]
pub struct ResolveTemplateInput {
    pub scenario: String,
    pub locale: String,
    pub channel: NotificationChannel,
    pub tenant_domain: String,
    pub application: Option<String>,
}

impl ResolveTemplateInput {
    /// 識別子を検証し、テナント ID を埋めた解決要求を作る。
    pub(crate) fn to_request(
        &self,
        tenants: &dyn TenantResolver,
    ) -> Result<ResolveRequest, TemplateError> {
        let scenario = Scenario::parse(&self.scenario)?;
        let locale = Locale::parse(&self.locale)?;
        if let Some(app) = &self.application {
            k1s0_validation::validate_application_id(app)?;
        }
        let tenant = resolve_tenant(tenants, &self.tenant_domain)?;
        Ok(ResolveRequest {
            scenario,
            locale,
            channel: self.channel,
            scope: TemplateScope::new(tenant, self.application.as_deref())?,
        })
    }
}

/// ResolveTemplateUseCase はキャッシュを前段に置いたテンプレート解決ユースケース。
pub struct ResolveTemplateUseCase {
    resolver: Arc<LayeredResolver>,
    tenants: Arc<dyn TenantResolver>,
    caches: Option<Arc<TenantCacheRegistry>>,
}

impl ResolveTemplateUseCase {
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

    pub fn execute(
        &self,
        input: &ResolveTemplateInput,
    ) -> Result<NotificationTemplate, TemplateError> {
        let request = input.to_request(self.tenants.as_ref())?;

        let Some(caches) = &self.caches else {
            return Ok(self.resolver.resolve(&request)?.template);
        };
        let cache = caches.partition(request.scope.tenant);
        let key = request.key();
        if let Some(template) = cache.get(&key, &request.locale) {
            tracing::debug!(
                scenario = %request.scenario,
                locale = %request.locale,
                "template cache hit"
            );
            return Ok(template);
        }

        // 読み込み前にチケットを取り、読み込み中の無効化に負けるようにする
        let ticket = cache.ticket();
        let resolved = self.resolver.resolve(&request)?;
        cache.fill(ticket, &key, &request.locale, resolved.template.clone());
        Ok(resolved.template)
    }
}
