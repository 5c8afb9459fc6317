//! Filesystem watch adapter
//!
//! Bridges a `notify` recursive watcher to the change coalescer's
//! channel. Raw notify events are classified into the create/modify/
//! delete stream the coalescer expects; everything else (access
//! events, watcher errors) is dropped or logged.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

use crate::coalescer::{ChangeCoalescer, FileChange};
use crate::service::{AppIndex, IndexError};

/// Keeps the workspace watched and the coalescer running for as long
/// as it is held
pub struct WorkspaceWatcher {
    _watcher: RecommendedWatcher,
}

impl WorkspaceWatcher {
    /// Start watching the index's workspace root and spawn the change
    /// coalescer onto the current tokio runtime.
    pub fn spawn(index: Arc<AppIndex>) -> Result<Self, IndexError> {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher =
            notify::recommended_watcher(move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    for change in classify(&event) {
                        let _ = tx.send(change);
                    }
                }
                Err(e) => warn!(error = %e, "file watcher error"),
            })?;
        watcher.watch(index.root(), RecursiveMode::Recursive)?;

        tokio::spawn(ChangeCoalescer::new(index).run(rx));

        Ok(Self { _watcher: watcher })
    }
}

/// Classify a raw notify event into coalescer changes.
///
/// Renames surface as modify events on both names; existence decides
/// which side is the create and which the delete.
fn classify(event: &Event) -> Vec<FileChange> {
    event
        .paths
        .iter()
        .filter_map(|path| match event.kind {
            EventKind::Create(_) => Some(FileChange::Created(path.clone())),
            EventKind::Remove(_) => Some(FileChange::Deleted(path.clone())),
            EventKind::Modify(_) | EventKind::Any | EventKind::Other => {
                if path.exists() {
                    Some(FileChange::Modified(path.clone()))
                } else {
                    Some(FileChange::Deleted(path.clone()))
                }
            }
            EventKind::Access(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, RemoveKind};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_classify_create_and_remove() {
        let event = Event::new(EventKind::Create(CreateKind::File))
            .add_path("/ws/a.ts".into());
        assert_eq!(
            classify(&event),
            vec![FileChange::Created("/ws/a.ts".into())]
        );

        let event = Event::new(EventKind::Remove(RemoveKind::File))
            .add_path("/ws/a.ts".into());
        assert_eq!(
            classify(&event),
            vec![FileChange::Deleted("/ws/a.ts".into())]
        );
    }

    #[test]
    fn test_classify_modify_by_existence() {
        let dir = TempDir::new().unwrap();
        let existing = dir.path().join("live.ts");
        fs::write(&existing, "const x = 1;").unwrap();
        let gone = dir.path().join("gone.ts");

        let event = Event::new(EventKind::Modify(notify::event::ModifyKind::Any))
            .add_path(existing.clone())
            .add_path(gone.clone());

        assert_eq!(
            classify(&event),
            vec![FileChange::Modified(existing), FileChange::Deleted(gone)]
        );
    }

    #[test]
    fn test_access_events_dropped() {
        let event = Event::new(EventKind::Access(notify::event::AccessKind::Read))
            .add_path("/ws/a.ts".into());
        assert!(classify(&event).is_empty());
    }
}
