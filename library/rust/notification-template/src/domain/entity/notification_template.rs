use serde::{Deserialize, Serialize};

use crate::domain::entity::channel::NotificationChannel;
use crate::domain::error::TemplateError;

const CHARSET_MARKER: &str = "charset";
const CHARSET_UTF_8: &str = "charset=UTF-8";

/// NotificationTemplate は 1 シナリオ・1 チャネル・1 ロケール分の通知内容を表す。
///
/// `subject` / `footer` / `content_type` は EMAIL のみで使う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTemplate {
    pub scenario: String,
    pub channel: NotificationChannel,
    pub locale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl NotificationTemplate {
    pub fn email(
        scenario: impl Into<String>,
        locale: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            scenario: scenario.into(),
            channel: NotificationChannel::Email,
            locale: locale.into(),
            subject: Some(subject.into()),
            body: body.into(),
            footer: None,
            content_type: None,
        }
    }

    pub fn sms(
        scenario: impl Into<String>,
        locale: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            scenario: scenario.into(),
            channel: NotificationChannel::Sms,
            locale: locale.into(),
            subject: None,
            body: body.into(),
            footer: None,
            content_type: None,
        }
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// 正規化済みのシナリオキーを返す。
    pub fn scenario_key(&self) -> String {
        k1s0_validation::normalize_scenario_name(&self.scenario)
    }

    /// 本文が空白のみでなければ true。
    pub fn has_content(&self) -> bool {
        !self.body.trim().is_empty()
    }

    /// 書き込み前の検証。識別子の形式とチャネルごとのフィールド規則を確認する。
    pub fn validate_for_write(&self) -> Result<(), TemplateError> {
        k1s0_validation::validate_scenario_name(&self.scenario)?;
        k1s0_validation::validate_locale(&self.locale)?;
        if !self.has_content() {
            return Err(TemplateError::invalid_input("body", "must not be blank"));
        }
        match self.channel {
            NotificationChannel::Email => {
                if self.subject.as_deref().is_none_or(|s| s.trim().is_empty()) {
                    return Err(TemplateError::invalid_input(
                        "subject",
                        "must not be blank for EMAIL templates",
                    ));
                }
            }
            NotificationChannel::Sms => {
                for (field, value) in [
                    ("subject", &self.subject),
                    ("footer", &self.footer),
                    ("content_type", &self.content_type),
                ] {
                    if value.is_some() {
                        return Err(TemplateError::invalid_input(
                            field,
                            "is not supported for SMS templates",
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// 識別子を保存用の形に揃える (シナリオ表示名の前後空白除去、ロケール正規化)。
    pub fn normalized(mut self) -> Self {
        self.scenario = self.scenario.trim().to_string();
        self.locale = k1s0_validation::normalize_locale(&self.locale);
        self
    }

    /// EMAIL の content type に charset が無ければ UTF-8 を付与する。
    pub fn with_utf8_charset(mut self) -> Self {
        if self.channel == NotificationChannel::Email {
            if let Some(content_type) = self.content_type.as_mut() {
                if !content_type.to_lowercase().contains(CHARSET_MARKER) {
                    content_type.push_str("; ");
                    content_type.push_str(CHARSET_UTF_8);
                }
            }
        }
        self
    }
}
