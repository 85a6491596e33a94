use std::collections::HashMap;

use crate::domain::entity::{DefaultLocales, NotificationChannel, NotificationTemplate, Scenario};
use crate::domain::error::TemplateError;

/// DefaultTemplateCatalog は組み込みのデフォルトテンプレート集合。
///
/// シナリオ × チャネルごとにデフォルトロケールのテンプレートを 1 件だけ持ち、
/// 構築後は変更されない。テナント・アプリケーションに依存しない最終フォールバック。
#[derive(Debug, Default)]
pub struct DefaultTemplateCatalog {
    templates: HashMap<(NotificationChannel, String), NotificationTemplate>,
}

impl DefaultTemplateCatalog {
    /// テンプレート一覧からカタログを構築する。
    ///
    /// 各テンプレートは書き込み時と同じ規則で検証し、ロケールはチャネルの
    /// デフォルトロケールと一致しなければならない。シナリオの重複はエラー。
    pub fn new(
        templates: Vec<NotificationTemplate>,
        locales: &DefaultLocales,
    ) -> Result<Self, TemplateError> {
        let mut map = HashMap::with_capacity(templates.len());
        for template in templates {
            let template = template.normalized();
            template.validate_for_write()?;
            let default_locale = locales.for_channel(template.channel);
            if template.locale != default_locale.as_str() {
                return Err(TemplateError::invalid_input(
                    "locale",
                    format!(
                        "default template '{}' ({}) must use the default locale '{}', got '{}'",
                        template.scenario, template.channel, default_locale, template.locale
                    ),
                ));
            }
            let key = (template.channel, template.scenario_key());
            if map.contains_key(&key) {
                return Err(TemplateError::invalid_input(
                    "scenario",
                    format!(
                        "duplicate default template for '{}' ({})",
                        template.scenario, template.channel
                    ),
                ));
            }
            map.insert(key, template);
        }
        Ok(Self { templates: map })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(
        &self,
        scenario: &Scenario,
        channel: NotificationChannel,
    ) -> Option<&NotificationTemplate> {
        self.templates.get(&(channel, scenario.key().to_string()))
    }

    pub fn contains_scenario(&self, scenario: &Scenario, channel: NotificationChannel) -> bool {
        self.get(scenario, channel).is_some()
    }

    /// チャネルのシナリオ表示名一覧。順序は保証しない。
    pub fn scenario_names(&self, channel: NotificationChannel) -> Vec<String> {
        self.templates
            .values()
            .filter(|t| t.channel == channel)
            .map(|t| t.scenario.clone())
            .collect()
    }

    pub fn templates(&self, channel: NotificationChannel) -> Vec<NotificationTemplate> {
        self.templates
            .values()
            .filter(|t| t.channel == channel)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
