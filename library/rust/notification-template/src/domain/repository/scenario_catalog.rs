use k1s0_tenant_client::TenantId;

use crate::domain::entity::{NotificationChannel, Scenario};
use crate::domain::repository::error::StoreError;

/// ScenarioCatalog はテナント・チャネルごとの登録済みシナリオを管理する。
#[cfg_attr(test, mockall::automock)]
pub trait ScenarioCatalog: Send + Sync {
    fn add(
        &self,
        scenario: &Scenario,
        channel: NotificationChannel,
        tenant: TenantId,
    ) -> Result<(), StoreError>;

    fn exists(
        &self,
        scenario: &Scenario,
        channel: NotificationChannel,
        tenant: TenantId,
    ) -> Result<bool, StoreError>;

    /// 登録済みシナリオの表示名を返す。
    fn list(
        &self,
        channel: NotificationChannel,
        tenant: TenantId,
    ) -> Result<Vec<String>, StoreError>;

    /// シナリオと、組織・全アプリケーションのテンプレートをまとめて削除する。
    /// 呼び出し側からは途中状態が見えない。
    fn remove(
        &self,
        scenario: &Scenario,
        channel: NotificationChannel,
        tenant: TenantId,
    ) -> Result<bool, StoreError>;
}
