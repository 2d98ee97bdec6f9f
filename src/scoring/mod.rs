pub mod alignment;
pub mod analyzer;
pub mod judgment;
pub mod reconcile;
pub mod severity;
pub mod timeline;
pub mod types;
