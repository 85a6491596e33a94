pub mod default_catalog;
pub mod layered_resolver;
pub mod locale_fallback;
pub mod result_merger;

pub use default_catalog::DefaultTemplateCatalog;
pub use layered_resolver::{LayeredResolver, ResolveRequest, ResolvedTemplate};
pub use locale_fallback::{FallbackPlan, FallbackState};
pub use result_merger::{merge, MergeIdentity};
