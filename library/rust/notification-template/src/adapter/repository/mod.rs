pub mod resource_tree_store;
pub mod table_store;

pub use resource_tree_store::ResourceTreeTemplateStore;
pub use table_store::TableTemplateStore;
