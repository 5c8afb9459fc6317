//! Workspace scanner
//!
//! Enumerates the workspace's source files (gitignore-aware, skip-dir
//! and glob filtered, capped) and drives the entity parser over them in
//! fixed-size batches. File reads within a batch are issued together
//! and awaited together; batches run strictly sequentially with a
//! cooperative yield in between so a large scan never starves the rest
//! of the runtime.

use futures::future::join_all;
use ignore::WalkBuilder;
use std::path::Path;
use std::sync::{Mutex, RwLock};
use std::time::Instant;
use tracing::{debug, info};

use crate::config::{IndexConfig, SKIP_DIRS};
use crate::extract::EntityParser;
use crate::index::IndexStore;
use crate::tree_sitter::Language;

/// Statistics from one scan or drain pass
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanStats {
    pub files_indexed: usize,
    /// Unreadable files, skipped
    pub files_failed: usize,
    pub batches: usize,
    /// Cooperative yields performed between batches
    pub yields: usize,
    pub duration_ms: u64,
}

/// Enumerate indexable files under `root`, as workspace-relative paths.
///
/// Sorted for determinism, then capped at `config.max_files`.
pub fn discover_files(root: &Path, config: &IndexConfig) -> Vec<String> {
    let patterns: Vec<glob::Pattern> = config
        .exclude
        .iter()
        .filter_map(|p| glob::Pattern::new(p).ok())
        .collect();

    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            !SKIP_DIRS.contains(&name.as_ref())
        })
        .build();

    let mut files = Vec::new();
    for entry in walker.flatten() {
        if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            continue;
        }
        let relative = match entry.path().strip_prefix(root) {
            Ok(p) => p.to_string_lossy().replace('\\', "/"),
            Err(_) => continue,
        };
        if Language::from_path(&relative).is_none() {
            continue;
        }
        if patterns.iter().any(|p| p.matches(&relative)) {
            continue;
        }
        files.push(relative);
    }

    files.sort();
    files.truncate(config.max_files);
    files
}

/// Index the given files in `batch_size` chunks, remove-then-reparse
/// per file. Shared by the initial scan and coalesced drains.
pub async fn scan_files(
    root: &Path,
    files: &[String],
    batch_size: usize,
    parser: &Mutex<EntityParser>,
    store: &RwLock<IndexStore>,
) -> ScanStats {
    let started = Instant::now();
    let mut stats = ScanStats::default();
    let batch_size = batch_size.max(1);
    let total_batches = files.len().div_ceil(batch_size);

    for batch in files.chunks(batch_size) {
        let reads = join_all(batch.iter().map(|file| read_versioned(root, file))).await;

        for (file, read) in batch.iter().zip(reads) {
            let (content, version) = match read {
                Some(ok) => ok,
                None => {
                    debug!(file, "skipping unreadable file");
                    stats.files_failed += 1;
                    continue;
                }
            };

            let entities = parser.lock().unwrap().parse_file(file, &content, version);
            let mut store = store.write().unwrap();
            store.remove_file(file);
            store.insert_file_entities(file, &entities);
            stats.files_indexed += 1;
        }

        stats.batches += 1;
        if stats.batches < total_batches {
            stats.yields += 1;
            tokio::task::yield_now().await;
        }
    }

    stats.duration_ms = started.elapsed().as_millis() as u64;
    info!(
        files = stats.files_indexed,
        failed = stats.files_failed,
        batches = stats.batches,
        duration_ms = stats.duration_ms,
        "scan pass complete"
    );
    stats
}

/// Read a file's content together with its content-derived version.
///
/// The parser's cache only needs the version to change whenever the
/// content does, so a content hash serves as the version here.
async fn read_versioned(root: &Path, file: &str) -> Option<(String, u64)> {
    let path = root.join(file);
    let content = tokio::fs::read_to_string(&path).await.ok()?;
    let version = content_version(&content);
    Some((content, version))
}

fn content_version(content: &str) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}
