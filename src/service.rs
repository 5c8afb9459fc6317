//! The index service
//!
//! `AppIndex` is the explicit handle every consumer goes through: it
//! owns the entity store, the parser, and the change-notification
//! channel. External IDE features only ever see the read-only query
//! surface here; nothing outside this crate parses files.
//!
//! Multiple independent instances can coexist (one per workspace
//! root); there is no global state.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};
use tokio::sync::broadcast;
use tracing::info;

use crate::config::IndexConfig;
use crate::entities::{Entity, EntityKind, HookDoc, Position};
use crate::extract::{EntityParser, ParserStats};
use crate::index::{IndexStats, IndexStore};
use crate::scanner::{self, ScanStats};
use crate::tree_sitter::TreeSitterError;

/// A change wave the index has finished applying.
///
/// One notification per logical update wave: a full refresh, a
/// coalesced drain, or an immediate file removal. Never one per file
/// within a wave.
#[derive(Debug, Clone)]
pub enum IndexChange {
    Refreshed { files: usize },
    Drained { files: usize },
    Removed { file: String },
}

/// Error type for index operations
#[derive(Debug)]
pub enum IndexError {
    Parse(TreeSitterError),
    Io(std::io::Error),
    Watch(notify::Error),
}

impl std::fmt::Display for IndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexError::Parse(e) => write!(f, "Parse error: {}", e),
            IndexError::Io(e) => write!(f, "IO error: {}", e),
            IndexError::Watch(e) => write!(f, "Watch error: {}", e),
        }
    }
}

impl std::error::Error for IndexError {}

impl From<TreeSitterError> for IndexError {
    fn from(e: TreeSitterError) -> Self {
        IndexError::Parse(e)
    }
}

impl From<std::io::Error> for IndexError {
    fn from(e: std::io::Error) -> Self {
        IndexError::Io(e)
    }
}

impl From<notify::Error> for IndexError {
    fn from(e: notify::Error) -> Self {
        IndexError::Watch(e)
    }
}

/// Handle to one workspace's entity index
pub struct AppIndex {
    root: PathBuf,
    config: IndexConfig,
    store: RwLock<IndexStore>,
    parser: Mutex<EntityParser>,
    changes: broadcast::Sender<IndexChange>,
}

impl AppIndex {
    /// Create an index for a workspace root. The hook catalog is seeded
    /// here; call [`refresh`](Self::refresh) to populate the rest.
    pub fn new(root: impl Into<PathBuf>, config: IndexConfig) -> Result<Self, IndexError> {
        let (changes, _) = broadcast::channel(64);
        Ok(Self {
            root: root.into(),
            config,
            store: RwLock::new(IndexStore::new()),
            parser: Mutex::new(EntityParser::new()?),
            changes,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Workspace-relative form of an absolute path, if it is under the
    /// root
    pub fn to_relative(&self, path: &Path) -> Option<String> {
        path.strip_prefix(&self.root)
            .ok()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
    }

    /// Subscribe to change-wave notifications
    pub fn subscribe(&self) -> broadcast::Receiver<IndexChange> {
        self.changes.subscribe()
    }

    // =========================================================================
    // Write path: scan, drain, remove
    // =========================================================================

    /// Rebuild from scratch: clear every file-scoped entity, rescan the
    /// workspace, then fire one change notification.
    pub async fn refresh(&self) -> ScanStats {
        info!(root = %self.root.display(), "full index refresh");
        self.store.write().unwrap().clear();

        let files = scanner::discover_files(&self.root, &self.config);
        self.parser.lock().unwrap().retain_files(&files);
        let stats = scanner::scan_files(
            &self.root,
            &files,
            self.config.batch_size,
            &self.parser,
            &self.store,
        )
        .await;

        let _ = self.changes.send(IndexChange::Refreshed {
            files: stats.files_indexed,
        });
        stats
    }

    /// Remove-then-reparse the given files in the bounded-batch
    /// pattern, then fire one change notification for the whole drain.
    /// Called by the change coalescer.
    pub(crate) async fn drain(&self, files: &[String]) -> ScanStats {
        let stats = scanner::scan_files(
            &self.root,
            files,
            self.config.batch_size,
            &self.parser,
            &self.store,
        )
        .await;

        let _ = self.changes.send(IndexChange::Drained {
            files: stats.files_indexed,
        });
        stats
    }

    /// Drop a deleted file's entities immediately. There is no content
    /// left to reparse, and deferring would leave stale queryable
    /// entries.
    pub fn remove_file(&self, file: &str) {
        self.store.write().unwrap().remove_file(file);
        self.parser.lock().unwrap().invalidate(file);
        let _ = self.changes.send(IndexChange::Removed {
            file: file.to_string(),
        });
    }

    // =========================================================================
    // Query surface (read-only)
    // =========================================================================

    /// All entities of one kind
    pub fn entities_of_kind(&self, kind: EntityKind) -> Vec<Entity> {
        self.store.read().unwrap().all_of_kind(kind)
    }

    /// Exact-name lookup; collisions resolve to the lexicographically
    /// smallest file path
    pub fn get_by_name(&self, kind: EntityKind, name: &str) -> Option<Entity> {
        self.store.read().unwrap().get_by_name(kind, name)
    }

    /// Case-insensitive substring search over names (and route paths)
    pub fn search(&self, kind: EntityKind, query: &str) -> Vec<Entity> {
        self.store.read().unwrap().search(kind, query)
    }

    /// Every entity contributed by one file
    pub fn entities_in_file(&self, file: &str) -> Vec<Entity> {
        self.store.read().unwrap().entities_in_file(file)
    }

    /// Entity whose range contains the position, by fixed kind
    /// precedence
    pub fn entity_at_position(&self, file: &str, position: Position) -> Option<Entity> {
        self.store.read().unwrap().entity_at_position(file, position)
    }

    /// One hook catalog entry
    pub fn hook(&self, name: &str) -> Option<HookDoc> {
        match self.store.read().unwrap().get_by_name(EntityKind::Hook, name) {
            Some(Entity::Hook(hook)) => Some(hook),
            _ => None,
        }
    }

    /// The full hook catalog
    pub fn hooks(&self) -> Vec<HookDoc> {
        self.store
            .read()
            .unwrap()
            .all_of_kind(EntityKind::Hook)
            .into_iter()
            .filter_map(|e| match e {
                Entity::Hook(hook) => Some(hook),
                _ => None,
            })
            .collect()
    }

    /// Per-kind counts plus distinct-file count
    pub fn stats(&self) -> IndexStats {
        self.store.read().unwrap().stats()
    }

    /// Parser cache counters, for diagnostics
    pub fn parser_stats(&self) -> ParserStats {
        self.parser.lock().unwrap().stats()
    }
}
