// Service exports
pub mod client;
pub mod default_templates;
pub mod templates;

pub use client::{ClientError, MergeClient};
pub use templates::TemplateStore;
