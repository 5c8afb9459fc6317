//! appindex — framework-aware incremental source index
//!
//! Parses a workspace of TypeScript/TSX/JavaScript/JSX application
//! modules, extracts framework-level entities (routes, UI components,
//! state-store slices, outbound API calls), and keeps a queryable
//! in-memory index synchronized with a live file-change stream.
//!
//! ```no_run
//! use appindex::{AppIndex, EntityKind, IndexConfig, WorkspaceWatcher};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), appindex::IndexError> {
//! let index = Arc::new(AppIndex::new("/path/to/workspace", IndexConfig::default())?);
//! index.refresh().await;
//! let _watcher = WorkspaceWatcher::spawn(index.clone())?;
//!
//! for route in index.entities_of_kind(EntityKind::Route) {
//!     println!("{} -> {:?}", route.name(), route.range());
//! }
//! # Ok(())
//! # }
//! ```

pub mod coalescer;
pub mod config;
pub mod entities;
pub mod extract;
pub mod hooks;
pub mod index;
pub mod scanner;
pub mod service;
pub mod tree_sitter;
pub mod watch;

pub use coalescer::{ChangeCoalescer, FileChange};
pub use config::IndexConfig;
pub use entities::{
    ApiCall, Component, Entity, EntityKind, HookDoc, HttpMethod, Position, Range, Route,
    StoreSlice, ValueKind,
};
pub use extract::{EntityParser, FileEntities, ParserStats};
pub use index::{IndexStats, IndexStore};
pub use scanner::ScanStats;
pub use service::{AppIndex, IndexChange, IndexError};
pub use watch::WorkspaceWatcher;
