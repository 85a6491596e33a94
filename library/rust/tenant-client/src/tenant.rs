use std::fmt;

use serde::{Deserialize, Serialize};

/// TenantId はストレージキーの名前空間として使うテナントの数値 ID。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TenantId(pub i32);

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    Active,
    Suspended,
    Deleted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub domain: String,
    pub status: TenantStatus,
}

impl Tenant {
    pub fn active(id: i32, domain: impl Into<String>) -> Self {
        Self {
            id: TenantId(id),
            domain: domain.into(),
            status: TenantStatus::Active,
        }
    }
}

/// テナントドメインを比較用に正規化する。
pub(crate) fn normalize_domain(domain: &str) -> String {
    domain.trim().to_lowercase()
}
