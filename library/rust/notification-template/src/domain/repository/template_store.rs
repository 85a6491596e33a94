use k1s0_tenant_client::TenantId;

use crate::domain::entity::{
    Locale, NotificationChannel, NotificationTemplate, Scenario, TemplateScope,
};
use crate::domain::repository::error::StoreError;

/// TemplateLocator は 1 件のテンプレートレコードの位置を表す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLocator {
    pub scenario: Scenario,
    pub locale: Locale,
    pub channel: NotificationChannel,
    pub scope: TemplateScope,
}

impl TemplateLocator {
    pub fn new(
        scenario: Scenario,
        locale: Locale,
        channel: NotificationChannel,
        scope: TemplateScope,
    ) -> Self {
        Self {
            scenario,
            locale,
            channel,
            scope,
        }
    }
}

/// TemplateStore は永続化されたテンプレートの読み書きを担う。
///
/// アプリケーションスコープの読み取りはそのアプリケーションのレコードのみを返し、
/// 組織レベルへ自動でフォールバックしない。
#[cfg_attr(test, mockall::automock)]
pub trait TemplateStore: Send + Sync {
    fn read(&self, locator: &TemplateLocator) -> Result<Option<NotificationTemplate>, StoreError>;

    /// 同一位置のレコードがあれば上書きする。
    /// シナリオが未登録の場合は `StoreError::UnknownScenario`。
    fn write(
        &self,
        template: &NotificationTemplate,
        scope: &TemplateScope,
    ) -> Result<(), StoreError>;

    fn delete(&self, locator: &TemplateLocator) -> Result<bool, StoreError>;

    fn list(
        &self,
        scenario: &Scenario,
        channel: NotificationChannel,
        scope: &TemplateScope,
    ) -> Result<Vec<NotificationTemplate>, StoreError>;

    /// テナントの組織レベルのテンプレートを全シナリオ分返す。
    fn list_all(
        &self,
        channel: NotificationChannel,
        tenant: TenantId,
    ) -> Result<Vec<NotificationTemplate>, StoreError>;

    /// 1 スコープ内のシナリオの全ロケールを削除し、削除件数を返す。
    fn delete_all(
        &self,
        scenario: &Scenario,
        channel: NotificationChannel,
        scope: &TemplateScope,
    ) -> Result<usize, StoreError>;
}
