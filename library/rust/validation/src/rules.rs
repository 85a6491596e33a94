use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;

const MAX_SCENARIO_NAME_LEN: usize = 255;
const MAX_TENANT_DOMAIN_LEN: usize = 253;

static SCENARIO_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 _.\-]*$").expect("scenario name pattern must compile")
});

static LOCALE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}([-_][A-Za-z0-9]{2,8})*$").expect("locale pattern must compile")
});

static APPLICATION_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_\-]{0,127}$").expect("application id pattern must compile")
});

static TENANT_DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)[a-z0-9]([a-z0-9\-]*[a-z0-9])?(\.[a-z0-9]([a-z0-9\-]*[a-z0-9])?)*$")
        .expect("tenant domain pattern must compile")
});

/// シナリオの表示名を検証する。
/// 前後の空白は無視し、英数字で始まり英数字・空白・`-`・`_`・`.` のみで構成されること。
pub fn validate_scenario_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank { field: "scenario" });
    }
    if trimmed.chars().count() > MAX_SCENARIO_NAME_LEN {
        return Err(ValidationError::InvalidScenarioName(format!(
            "length must be <= {}, got {}",
            MAX_SCENARIO_NAME_LEN,
            trimmed.chars().count()
        )));
    }
    if !SCENARIO_NAME_RE.is_match(trimmed) {
        return Err(ValidationError::InvalidScenarioName(format!(
            "contains disallowed characters: {}",
            trimmed
        )));
    }
    Ok(())
}

/// シナリオの表示名をストレージキー用に正規化する（空白除去 + 小文字化）。
pub fn normalize_scenario_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// ロケールタグを検証する。`en_US` / `en-us` / `fr` などを受け付ける。
pub fn validate_locale(locale: &str) -> Result<(), ValidationError> {
    let trimmed = locale.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank { field: "locale" });
    }
    if !LOCALE_RE.is_match(trimmed) {
        return Err(ValidationError::InvalidLocale(trimmed.to_string()));
    }
    Ok(())
}

/// ロケールタグを小文字・ハイフン区切りに正規化する（`en_US` -> `en-us`）。
pub fn normalize_locale(locale: &str) -> String {
    locale.trim().to_lowercase().replace('_', "-")
}

pub fn validate_application_id(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        return Err(ValidationError::Blank {
            field: "application",
        });
    }
    if !APPLICATION_ID_RE.is_match(id) {
        return Err(ValidationError::InvalidApplicationId(id.to_string()));
    }
    Ok(())
}

pub fn validate_tenant_domain(domain: &str) -> Result<(), ValidationError> {
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank { field: "tenant" });
    }
    if trimmed.len() > MAX_TENANT_DOMAIN_LEN {
        return Err(ValidationError::InvalidTenantDomain(format!(
            "length must be <= {}, got {}",
            MAX_TENANT_DOMAIN_LEN,
            trimmed.len()
        )));
    }
    if !TENANT_DOMAIN_RE.is_match(trimmed) {
        return Err(ValidationError::InvalidTenantDomain(trimmed.to_string()));
    }
    Ok(())
}
