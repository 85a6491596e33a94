use std::fmt;
use std::hash::{Hash, Hasher};

use crate::domain::error::TemplateError;

/// Scenario はテナント内でテンプレートの用途を識別するシナリオを表す。
///
/// 表示名は入力どおり (前後の空白のみ除去) に保持し、同一性の比較と
/// ストレージキーには正規化キー (空白除去 + 小文字化) を使う。
#[derive(Debug, Clone)]
pub struct Scenario {
    display_name: String,
    key: String,
}

impl Scenario {
    pub fn parse(display_name: &str) -> Result<Self, TemplateError> {
        k1s0_validation::validate_scenario_name(display_name)?;
        let display_name = display_name.trim().to_string();
        let key = k1s0_validation::normalize_scenario_name(&display_name);
        Ok(Self { display_name, key })
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for Scenario {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Scenario {}

impl Hash for Scenario {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}
