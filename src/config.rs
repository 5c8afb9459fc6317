//! Index configuration
//!
//! Tuning knobs for scanning and coalescing, with defaults sized for a
//! typical application workspace.

use std::time::Duration;

/// Directories never descended into during a scan
pub static SKIP_DIRS: &[&str] = &[
    "node_modules",
    "vendor",
    "dist",
    "build",
    ".git",
    ".next",
    ".nuxt",
    ".output",
    "coverage",
];

/// Configuration for an index instance
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Hard cap on files indexed in one scan, bounding worst-case cost
    /// on very large trees
    pub max_files: usize,
    /// Files processed together before yielding back to the runtime
    pub batch_size: usize,
    /// Trailing-debounce window for change coalescing
    pub debounce: Duration,
    /// Additional glob patterns excluded from scanning
    pub exclude: Vec<String>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_files: 2000,
            batch_size: 20,
            debounce: Duration::from_millis(300),
            exclude: Vec::new(),
        }
    }
}

impl IndexConfig {
    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_exclude(mut self, patterns: Vec<String>) -> Self {
        self.exclude = patterns;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IndexConfig::default();
        assert!(config.max_files > 0);
        assert!(config.batch_size > 0);
        assert!(config.debounce > Duration::ZERO);
    }

    #[test]
    fn test_builder() {
        let config = IndexConfig::default()
            .with_max_files(50)
            .with_batch_size(0)
            .with_debounce(Duration::from_millis(10))
            .with_exclude(vec!["**/*.spec.ts".to_string()]);

        assert_eq!(config.max_files, 50);
        // batch size is clamped to at least one
        assert_eq!(config.batch_size, 1);
        assert_eq!(config.debounce, Duration::from_millis(10));
        assert_eq!(config.exclude.len(), 1);
    }
}
