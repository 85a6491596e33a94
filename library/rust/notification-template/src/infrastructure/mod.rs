pub mod cache;
pub mod config;
pub mod default_templates;
pub mod startup;
