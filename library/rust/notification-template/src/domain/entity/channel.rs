use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::TemplateError;

/// NotificationChannel はテンプレートの配信チャネルを表す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationChannel {
    Email,
    Sms,
}

impl NotificationChannel {
    pub const ALL: [Self; 2] = [Self::Email, Self::Sms];

    pub fn as_str(self) -> &'static str {
        match self {
            NotificationChannel::Email => "EMAIL",
            NotificationChannel::Sms => "SMS",
        }
    }

    /// リソースツリー上のパス要素として使う小文字表記。
    pub fn path_segment(self) -> &'static str {
        match self {
            NotificationChannel::Email => "email",
            NotificationChannel::Sms => "sms",
        }
    }
}

impl fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationChannel {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EMAIL" => Ok(NotificationChannel::Email),
            "SMS" => Ok(NotificationChannel::Sms),
            other => Err(TemplateError::invalid_input(
                "channel",
                format!("unsupported channel: {}", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_from_str() {
        assert_eq!("email".parse::<NotificationChannel>().unwrap(), NotificationChannel::Email);
        assert_eq!(" SMS ".parse::<NotificationChannel>().unwrap(), NotificationChannel::Sms);
        assert!("push".parse::<NotificationChannel>().is_err());
    }

    #[test]
    fn test_channel_serde_uses_uppercase() {
        let json = serde_json::to_string(&NotificationChannel::Sms).unwrap();
        assert_eq!(json, "\"SMS\"");
        let parsed: NotificationChannel = serde_json::from_str("\"EMAIL\"").unwrap();
        assert_eq!(parsed, NotificationChannel::Email);
    }

    #[test]
    fn test_path_segment() {
        assert_eq!(NotificationChannel::Email.path_segment(), "email");
        assert_eq!(NotificationChannel::Sms.path_segment(), "sms");
    }
}
