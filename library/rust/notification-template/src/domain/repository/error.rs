use std::sync::PoisonError;

/// StoreError は永続ストア境界の失敗を表す。
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store operation timed out: {0}")]
    Timeout(String),

    #[error("scenario '{0}' is not registered")]
    UnknownScenario(String),

    #[error("corrupted record at {location}: {reason}")]
    Corrupted { location: String, reason: String },
}

impl StoreError {
    /// ロックの poison はパニックにせず利用不可として報告する。
    pub fn poisoned<T>(err: PoisonError<T>) -> Self {
        StoreError::Unavailable(format!("lock poisoned: {}", err))
    }
}
