//! Index store for extracted entities
//!
//! The authoritative in-memory maps of every entity currently known for
//! the workspace, plus the global hook catalog. All lookups the query
//! surface offers are answered here.

mod store;

pub use store::{IndexStats, IndexStore};
