use k1s0_tenant_client::{TenantError, TenantId};
use k1s0_validation::ValidationError;

use crate::domain::entity::NotificationChannel;
use crate::domain::repository::StoreError;

/// ErrorKind は呼び出し側が扱いを決めるためのエラー分類。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 入力不正。再試行しない。
    Client,
    /// シナリオまたはテンプレートが全階層に存在しない。
    NotFound,
    /// 見つかったテンプレートの本文が空。
    Content,
    /// ストア I/O やテナント解決の失敗。
    Server,
}

/// TemplateError はドメイン・ユースケース境界のエラー。
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("scenario '{scenario}' already exists for channel {channel} in tenant {tenant}")]
    ScenarioAlreadyExists {
        scenario: String,
        channel: NotificationChannel,
        tenant: TenantId,
    },

    #[error("scenario '{scenario}' not found for channel {channel} in tenant {tenant}")]
    ScenarioNotFound {
        scenario: String,
        channel: NotificationChannel,
        tenant: TenantId,
    },

    #[error(
        "no {channel} template found for scenario '{scenario}' in locale '{locale}' (tenant {tenant}{})",
        application_suffix(.application)
    )]
    TemplateNotFound {
        scenario: String,
        locale: String,
        channel: NotificationChannel,
        tenant: TenantId,
        application: Option<String>,
    },

    #[error("{channel} template for scenario '{scenario}' in locale '{locale}' has an empty body ({tier} tier)")]
    EmptyContent {
        scenario: String,
        locale: String,
        channel: NotificationChannel,
        tier: &'static str,
    },

    #[error("{context}: {source}")]
    Store {
        context: String,
        #[source]
        source: StoreError,
    },

    #[error("tenant resolution failed for '{tenant_domain}': {source}")]
    Tenant {
        tenant_domain: String,
        #[source]
        source: TenantError,
    },
}

impl TemplateError {
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        TemplateError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// `map_err` 用に、コンテキスト付きの Store エラーへ変換するクロージャを返す。
    pub fn store(context: impl Into<String>) -> impl FnOnce(StoreError) -> TemplateError {
        let context = context.into();
        move |source| TemplateError::Store { context, source }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TemplateError::InvalidInput { .. } | TemplateError::ScenarioAlreadyExists { .. } => {
                ErrorKind::Client
            }
            TemplateError::ScenarioNotFound { .. } | TemplateError::TemplateNotFound { .. } => {
                ErrorKind::NotFound
            }
            TemplateError::EmptyContent { .. } => ErrorKind::Content,
            TemplateError::Store { .. } | TemplateError::Tenant { .. } => ErrorKind::Server,
        }
    }

    /// `SYS_{SERVICE}_{ERROR}` 形式のエラーコードを返す。
    pub fn code(&self) -> &'static str {
        match self {
            TemplateError::InvalidInput { .. } => "SYS_NOTIFTMPL_VALIDATION_FAILED",
            TemplateError::ScenarioAlreadyExists { .. } => "SYS_NOTIFTMPL_SCENARIO_ALREADY_EXISTS",
            TemplateError::ScenarioNotFound { .. } => "SYS_NOTIFTMPL_SCENARIO_NOT_FOUND",
            TemplateError::TemplateNotFound { .. } => "SYS_NOTIFTMPL_TEMPLATE_NOT_FOUND",
            TemplateError::EmptyContent { .. } => "SYS_NOTIFTMPL_EMPTY_CONTENT",
            TemplateError::Store { .. } => "SYS_NOTIFTMPL_STORE_ERROR",
            TemplateError::Tenant { .. } => "SYS_NOTIFTMPL_TENANT_RESOLUTION_FAILED",
        }
    }

    /// 境界でクライアント起因として扱うエラーか。空コンテンツも含む。
    pub fn is_client_class(&self) -> bool {
        matches!(self.kind(), ErrorKind::Client | ErrorKind::Content)
    }
}

fn application_suffix(application: &Option<String>) -> String {
    application
        .as_deref()
        .map(|app| format!(", application {app}"))
        .unwrap_or_default()
}

impl From<ValidationError> for TemplateError {
    fn from(err: ValidationError) -> Self {
        TemplateError::InvalidInput {
            field: err.field(),
            reason: err.to_string(),
        }
    }
}
