use serde::Deserialize;

/// Application configuration for notification template resolution.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub locale: LocaleConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub tenant: TenantConfig,
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(content)?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_environment() -> String {
    "dev".to_string()
}

/// LoggingConfig はログ出力形式の設定を表す。
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

fn default_log_format() -> String {
    "json".to_string()
}

/// LocaleConfig はチャネルごとのデフォルトロケールを表す。
///
/// 組み込みデフォルトテンプレートは `en-us` のみを同梱しているため、
/// 別のロケールを指定すると起動時のカタログ構築が失敗する。
#[derive(Debug, Clone, Deserialize)]
pub struct LocaleConfig {
    #[serde(default = "default_locale")]
    pub email_default: String,
    #[serde(default = "default_locale")]
    pub sms_default: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            email_default: default_locale(),
            sms_default: default_locale(),
        }
    }
}

fn default_locale() -> String {
    crate::infrastructure::default_templates::BUILT_IN_LOCALE.to_string()
}

/// StoreBackend は永続ストアの実装を選択する。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreBackend {
    #[default]
    Table,
    ResourceTree,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
}

/// CacheConfig は解決結果キャッシュの設定を表す。
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cache_max_capacity")]
    pub max_capacity: u64,
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            max_capacity: default_cache_max_capacity(),
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_max_capacity() -> u64 {
    10_000
}

fn default_cache_ttl_secs() -> u64 {
    300
}

/// TenantConfig はテナント ID 解決結果キャッシュの設定を表す。
#[derive(Debug, Clone, Deserialize)]
pub struct TenantConfig {
    #[serde(default = "default_tenant_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_tenant_cache_max_capacity")]
    pub cache_max_capacity: u64,
}

impl Default for TenantConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_tenant_cache_ttl_secs(),
            cache_max_capacity: default_tenant_cache_max_capacity(),
        }
    }
}

fn default_tenant_cache_ttl_secs() -> u64 {
    300
}

fn default_tenant_cache_max_capacity() -> u64 {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let cfg = Config::from_yaml("app:\n  name: notification-template\n").unwrap();
        assert_eq!(cfg.app.name, "notification-template");
        assert_eq!(cfg.app.environment, "dev");
        assert_eq!(cfg.logging.format, "json");
        assert_eq!(cfg.locale.email_default, "en-us");
        assert_eq!(cfg.store.backend, StoreBackend::Table);
        assert!(cfg.cache.enabled);
        assert_eq!(cfg.cache.max_capacity, 10_000);
        assert_eq!(cfg.tenant.cache_ttl_secs, 300);
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
app:
  name: notification-template
  version: 1.2.0
  environment: staging
logging:
  format: text
locale:
  email_default: en_GB
  sms_default: ja-jp
store:
  backend: resource-tree
cache:
  enabled: false
  max_capacity: 50
  ttl_secs: 10
tenant:
  cache_ttl_secs: 60
  cache_max_capacity: 20
"#;
        let cfg = Config::from_yaml(yaml).unwrap();
        assert_eq!(cfg.app.version, "1.2.0");
        assert_eq!(cfg.logging.format, "text");
        assert_eq!(cfg.locale.email_default, "en_GB");
        assert_eq!(cfg.store.backend, StoreBackend::ResourceTree);
        assert!(!cfg.cache.enabled);
        assert_eq!(cfg.cache.ttl_secs, 10);
        assert_eq!(cfg.tenant.cache_max_capacity, 20);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let yaml = "app:\n  name: x\nstore:\n  backend: mongodb\n";
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "app:\n  name: from-file\ncache:\n  ttl_secs: 5").unwrap();
        let cfg = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.app.name, "from-file");
        assert_eq!(cfg.cache.ttl_secs, 5);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(Config::load("/nonexistent/notification-template.yaml").is_err());
    }
}
