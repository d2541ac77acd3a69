//! Shared building blocks for `scopr`: turning raw scope items into canonical
//! tokens, classifying them, and expanding CIDR blocks.

pub mod config;
pub mod error;
pub mod network;

pub use error::{Result, ScopeError};
pub use network::normalize::normalize;
pub use network::range::{Expansion, expand};
pub use network::target::{Bucket, ScopeItem, classify};
