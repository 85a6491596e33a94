pub mod client;
pub mod config;
pub mod error;
pub mod tenant;

pub use client::{CachedTenantResolver, InMemoryTenantResolver, TenantResolver};
pub use config::TenantClientConfig;
pub use error::TenantError;
pub use tenant::{Tenant, TenantId, TenantStatus};

#[cfg(feature = "mock")]
pub use client::MockTenantResolver;
