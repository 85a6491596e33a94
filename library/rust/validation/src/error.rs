use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must not be blank")]
    Blank { field: &'static str },
    #[error("invalid scenario name: {0}")]
    InvalidScenarioName(String),
    #[error("invalid locale: {0}")]
    InvalidLocale(String),
    #[error("invalid application id: {0}")]
    InvalidApplicationId(String),
    #[error("invalid tenant domain: {0}")]
    InvalidTenantDomain(String),
}

impl ValidationError {
    /// Returns the error code string for this validation error.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::Blank { .. } => "BLANK_FIELD",
            ValidationError::InvalidScenarioName(_) => "INVALID_SCENARIO_NAME",
            ValidationError::InvalidLocale(_) => "INVALID_LOCALE",
            ValidationError::InvalidApplicationId(_) => "INVALID_APPLICATION_ID",
            ValidationError::InvalidTenantDomain(_) => "INVALID_TENANT_DOMAIN",
        }
    }

    /// Returns the name of the input field this error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Blank { field } => field,
            ValidationError::InvalidScenarioName(_) => "scenario",
            ValidationError::InvalidLocale(_) => "locale",
            ValidationError::InvalidApplicationId(_) => "application",
            ValidationError::InvalidTenantDomain(_) => "tenant",
        }
    }
}
