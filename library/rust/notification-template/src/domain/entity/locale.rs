use std::fmt;

use crate::domain::entity::channel::NotificationChannel;
use crate::domain::error::TemplateError;

/// Locale は正規化済み (小文字・ハイフン区切り) のロケールタグを表す。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale(String);

impl Locale {
    pub fn parse(tag: &str) -> Result<Self, TemplateError> {
        k1s0_validation::validate_locale(tag)?;
        Ok(Self(k1s0_validation::normalize_locale(tag)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// DefaultLocales はチャネルごとのデフォルトロケールを保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultLocales {
    email: Locale,
    sms: Locale,
}

impl DefaultLocales {
    pub fn new(email: Locale, sms: Locale) -> Self {
        Self { email, sms }
    }

    pub fn parse(email: &str, sms: &str) -> Result<Self, TemplateError> {
        Ok(Self::new(Locale::parse(email)?, Locale::parse(sms)?))
    }

    pub fn for_channel(&self, channel: NotificationChannel) -> &Locale {
        match channel {
            NotificationChannel::Email => &self.email,
            NotificationChannel::Sms => &self.sms,
        }
    }
}

impl Default for DefaultLocales {
    fn default() -> Self {
        Self {
            email: Locale("en-us".to_string()),
            sms: Locale("en-us".to_string()),
        }
    }
}
