//! Core building blocks for the Bookshelf service: layered settings, the
//! module trait, and the registry that drives module lifecycle.

pub mod module;
pub mod registry;
pub mod settings;

pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
