pub mod channel;
pub mod locale;
pub mod notification_template;
pub mod scenario;
pub mod scope;
pub mod template_key;

pub use channel::NotificationChannel;
pub use locale::{DefaultLocales, Locale};
pub use notification_template::NotificationTemplate;
pub use scenario::Scenario;
pub use scope::TemplateScope;
pub use template_key::TemplateKey;
