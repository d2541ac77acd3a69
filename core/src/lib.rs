//! The `scopr` engine: per-engagement scope sets, the registry that names
//! them, and their on-disk form.

pub mod registry;
pub mod scope;
pub mod store;

pub use registry::ScopeRegistry;
pub use scope::{AddReport, Scope};
pub use store::ScopeFile;
