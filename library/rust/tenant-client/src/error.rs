use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TenantError {
    #[error("テナントが見つかりません: {0}")]
    NotFound(String),
    #[error("テナントは停止中です: {0}")]
    Suspended(String),
    #[error("テナントドメインが不正です: {0}")]
    InvalidDomain(String),
    #[error("サーバーエラー: {0}")]
    ServerError(String),
}
