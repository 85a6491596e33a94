use std::fmt;

use k1s0_tenant_client::TenantId;

use crate::domain::error::TemplateError;

/// TemplateScope はテンプレートの所有範囲 (テナントと任意のアプリケーション) を表す。
/// アプリケーションが無い場合は組織レベル。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateScope {
    pub tenant: TenantId,
    pub application: Option<String>,
}

impl TemplateScope {
    pub fn organization(tenant: TenantId) -> Self {
        Self {
            tenant,
            application: None,
        }
    }

    /// アプリケーション ID を検証してスコープを作る。`None` は組織レベル。
    pub fn new(tenant: TenantId, application: Option<&str>) -> Result<Self, TemplateError> {
        let application = match application {
            Some(app) => {
                k1s0_validation::validate_application_id(app)?;
                Some(app.to_string())
            }
            None => None,
        };
        Ok(Self {
            tenant,
            application,
        })
    }

    pub fn application(&self) -> Option<&str> {
        self.application.as_deref()
    }
}

impl fmt::Display for TemplateScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.application {
            Some(app) => write!(f, "tenant {} / application {}", self.tenant, app),
            None => write!(f, "tenant {}", self.tenant),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_application() {
        let scope = TemplateScope::new(TenantId(1), Some("portal")).unwrap();
        assert_eq!(scope.application(), Some("portal"));
        assert!(TemplateScope::new(TenantId(1), Some("../x")).is_err());
        assert_eq!(
            TemplateScope::new(TenantId(1), None).unwrap(),
            TemplateScope::organization(TenantId(1))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(TemplateScope::organization(TenantId(3)).to_string(), "tenant 3");
        let scope = TemplateScope::new(TenantId(3), Some("portal")).unwrap();
        assert_eq!(scope.to_string(), "tenant 3 / application portal");
    }
}
