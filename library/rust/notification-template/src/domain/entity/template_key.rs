use crate::domain::entity::channel::NotificationChannel;
use crate::domain::entity::scenario::Scenario;

/// TemplateKey は解決キャッシュのキー。テナントはキャッシュのパーティションで表し、
/// ロケールはキャッシュ値の側で扱うため含まない。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateKey {
    scenario: String,
    channel: NotificationChannel,
    application: Option<String>,
}

impl TemplateKey {
    pub fn new(
        scenario: &Scenario,
        channel: NotificationChannel,
        application: Option<&str>,
    ) -> Self {
        Self {
            scenario: scenario.key().to_string(),
            channel,
            application: application.map(str::to_string),
        }
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    pub fn channel(&self) -> NotificationChannel {
        self.channel
    }

    pub fn application(&self) -> Option<&str> {
        self.application.as_deref()
    }
}
