//! Change coalescer
//!
//! Subscribes to the workspace file-change stream and converts bursts
//! of edits into single index update waves. Create/modify events land
//! in a pending set and re-arm one trailing debounce deadline; only the
//! last re-arm within the window matters. Delete events bypass the
//! window entirely.
//!
//! The state machine is explicit (`Idle → Pending(deadline) → Draining
//! → Idle`) and the deadline is tokio time, so tests drive it with a
//! paused clock instead of wall-clock waits.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::debug;

use crate::config::SKIP_DIRS;
use crate::service::AppIndex;
use crate::tree_sitter::Language;

/// One file-change notification from the host's watch collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Created(PathBuf),
    Modified(PathBuf),
    Deleted(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CoalescerState {
    Idle,
    Pending { deadline: Instant },
    Draining,
}

/// Debouncing bridge between the change stream and the index
pub struct ChangeCoalescer {
    index: Arc<AppIndex>,
    exclude: Vec<glob::Pattern>,
    pending: BTreeSet<String>,
    state: CoalescerState,
}

impl ChangeCoalescer {
    pub fn new(index: Arc<AppIndex>) -> Self {
        let exclude = index
            .config()
            .exclude
            .iter()
            .filter_map(|p| glob::Pattern::new(p).ok())
            .collect();
        Self {
            index,
            exclude,
            pending: BTreeSet::new(),
            state: CoalescerState::Idle,
        }
    }

    /// Process the change stream until the sender side closes.
    ///
    /// Once a drain starts it runs to completion; dropping the sender
    /// is the only way to stop the loop, and only between waves.
    pub async fn run(mut self, mut changes: mpsc::UnboundedReceiver<FileChange>) {
        loop {
            let deadline = match self.state {
                CoalescerState::Pending { deadline } => Some(deadline),
                _ => None,
            };

            tokio::select! {
                change = changes.recv() => match change {
                    Some(change) => self.on_change(change),
                    None => break,
                },
                _ = sleep_until(deadline), if deadline.is_some() => {
                    // A delete may have emptied the set; no wave then
                    if self.pending.is_empty() {
                        self.state = CoalescerState::Idle;
                    } else {
                        self.state = CoalescerState::Draining;
                        self.drain().await;
                        self.state = CoalescerState::Idle;
                    }
                }
            }
        }

        // Flush whatever was still pending when the stream closed
        if !self.pending.is_empty() {
            self.drain().await;
        }
    }

    fn on_change(&mut self, change: FileChange) {
        match change {
            FileChange::Created(path) | FileChange::Modified(path) => {
                let file = match self.relative_source_file(&path) {
                    Some(f) => f,
                    None => return,
                };
                debug!(file, "queueing changed file");
                self.pending.insert(file);
                // Trailing debounce: every event re-arms the single timer
                self.state = CoalescerState::Pending {
                    deadline: Instant::now() + self.index.config().debounce,
                };
            }
            FileChange::Deleted(path) => {
                // No debounce: there is nothing to reparse and stale
                // entries must not stay queryable
                if let Some(file) = self.relative_source_file(&path) {
                    debug!(file, "removing deleted file");
                    self.pending.remove(&file);
                    self.index.remove_file(&file);
                }
            }
        }
    }

    async fn drain(&mut self) {
        let files: Vec<String> = std::mem::take(&mut self.pending).into_iter().collect();
        debug!(files = files.len(), "draining coalesced changes");
        self.index.drain(&files).await;
    }

    /// Workspace-relative path of an indexable file.
    ///
    /// Applies the same eligibility rules as workspace discovery:
    /// recognized extension, no skip-dir component, no exclude-glob
    /// match. A path failing any of them never enters the index
    /// through the change stream either.
    fn relative_source_file(&self, path: &PathBuf) -> Option<String> {
        let relative = self.index.to_relative(path)?;
        Language::from_path(&relative)?;
        if relative.split('/').any(|part| SKIP_DIRS.contains(&part)) {
            return None;
        }
        if self.exclude.iter().any(|p| p.matches(&relative)) {
            return None;
        }
        Some(relative)
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        // Guarded out by the `if deadline.is_some()` branch condition
        None => std::future::pending().await,
    }
}
