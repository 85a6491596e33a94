pub mod error;
pub mod scenario_catalog;
pub mod template_store;

pub use error::StoreError;
pub use scenario_catalog::ScenarioCatalog;
pub use template_store::{TemplateLocator, TemplateStore};
