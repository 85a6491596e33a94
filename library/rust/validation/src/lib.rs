pub mod error;
pub mod rules;

pub use error::ValidationError;
pub use rules::{
    normalize_locale, normalize_scenario_name, validate_application_id, validate_locale,
    validate_scenario_name, validate_tenant_domain,
};
