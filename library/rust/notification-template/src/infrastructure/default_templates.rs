use anyhow::Context;
use serde::Deserialize;

use crate::domain::entity::{DefaultLocales, NotificationChannel, NotificationTemplate};
use crate::domain::service::DefaultTemplateCatalog;

/// 組み込みテンプレートのロケール。デフォルトロケール設定の既定値でもある。
pub const BUILT_IN_LOCALE: &str = "en-us";

/// ビルド時に埋め込む組み込みデフォルトテンプレート。
const BUILT_IN_TEMPLATES: &str = include_str!("../../resources/default_templates.yaml");

#[derive(Debug, Deserialize)]
struct TemplateFile {
    templates: Vec<NotificationTemplate>,
}

/// YAML 文字列からデフォルトカタログを構築する。
pub fn load_catalog(
    yaml: &str,
    locales: &DefaultLocales,
) -> anyhow::Result<DefaultTemplateCatalog> {
    let file: TemplateFile = serde_yaml::from_str(yaml)?;
    let catalog = DefaultTemplateCatalog::new(file.templates, locales)?;
    tracing::debug!(templates = catalog.len(), "default template catalog loaded");
    Ok(catalog)
}

/// 組み込みテンプレートからデフォルトカタログを構築する。
/// 組み込みテンプレートは `BUILT_IN_LOCALE` のみなので、それ以外のデフォルトロケールではエラー。
pub fn built_in_catalog(locales: &DefaultLocales) -> anyhow::Result<DefaultTemplateCatalog> {
    load_catalog(BUILT_IN_TEMPLATES, locales).with_context(|| {
        format!(
            "built-in default templates are provided in '{BUILT_IN_LOCALE}' only \
             (configured email '{}', sms '{}')",
            locales.for_channel(NotificationChannel::Email),
            locales.for_channel(NotificationChannel::Sms)
        )
    })
}
