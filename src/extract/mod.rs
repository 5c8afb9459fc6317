//! Entity extraction from parsed syntax trees
//!
//! Converts one source file's text into typed entity records (routes,
//! components, store slices, API calls) by pattern-matching over the
//! tree-sitter AST. This is shallow, framework-level extraction for
//! navigation and lookup, not semantic analysis.
//!
//! A per-file cache keyed by content version makes re-parsing an
//! unchanged file a clone of the previous result.

mod api_calls;
mod components;
mod routes;
mod stores;

use std::collections::{HashMap, HashSet};
use tracing::warn;
use tree_sitter::Node;

use crate::entities::{ApiCall, Component, Route, StoreSlice};
use crate::tree_sitter::{Language, TreeSitterError, TreeSitterParser};

/// Entities extracted from a single file (hooks excluded; the hook
/// catalog is seeded statically and never parsed)
#[derive(Debug, Clone, Default)]
pub struct FileEntities {
    pub routes: Vec<Route>,
    pub components: Vec<Component>,
    pub stores: Vec<StoreSlice>,
    pub api_calls: Vec<ApiCall>,
}

impl FileEntities {
    pub fn len(&self) -> usize {
        self.routes.len() + self.components.len() + self.stores.len() + self.api_calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parser counters, used to verify cache behavior
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserStats {
    /// Full tree walks performed
    pub parses: u64,
    /// Requests served from the version cache
    pub cache_hits: u64,
}

struct CachedParse {
    version: u64,
    entities: FileEntities,
}

/// Syntax-tree entity parser with a per-file version cache
pub struct EntityParser {
    parser: TreeSitterParser,
    cache: HashMap<String, CachedParse>,
    stats: ParserStats,
}

impl EntityParser {
    pub fn new() -> Result<Self, TreeSitterError> {
        Ok(Self {
            parser: TreeSitterParser::new()?,
            cache: HashMap::new(),
            stats: ParserStats::default(),
        })
    }

    /// Parse one file at the given content version.
    ///
    /// If the file's last recorded version matches, the cached lists are
    /// returned without re-walking the tree. A parse failure is logged
    /// and contributes zero entities; it is never propagated.
    pub fn parse_file(&mut self, file: &str, content: &str, version: u64) -> FileEntities {
        if let Some(cached) = self.cache.get(file) {
            if cached.version == version {
                self.stats.cache_hits += 1;
                return cached.entities.clone();
            }
        }

        let entities = match self.extract(file, content) {
            Ok(entities) => entities,
            Err(e) => {
                warn!(file, error = %e, "entity extraction failed, file contributes no entities");
                FileEntities::default()
            }
        };
        self.stats.parses += 1;

        self.cache.insert(
            file.to_string(),
            CachedParse {
                version,
                entities: entities.clone(),
            },
        );
        entities
    }

    /// Drop the cached parse for a file (on delete)
    pub fn invalidate(&mut self, file: &str) {
        self.cache.remove(file);
    }

    /// Drop cached parses for every file not in the given set. A file
    /// can vanish between refreshes without a delete event; its cache
    /// entry must not outlive it.
    pub fn retain_files(&mut self, files: &[String]) {
        let keep: HashSet<&str> = files.iter().map(String::as_str).collect();
        self.cache.retain(|file, _| keep.contains(file.as_str()));
    }

    /// Number of files with a cached parse
    pub fn cached_files(&self) -> usize {
        self.cache.len()
    }

    pub fn stats(&self) -> ParserStats {
        self.stats
    }

    fn extract(&mut self, file: &str, content: &str) -> Result<FileEntities, TreeSitterError> {
        let language =
            Language::from_path(file).ok_or(TreeSitterError::UnsupportedLanguage)?;
        let tree = self.parser.parse(content, language)?;

        let mut out = FileEntities::default();
        walk(tree.root_node(), content, file, &mut out);
        Ok(out)
    }
}

fn walk(node: Node, source: &str, file: &str, out: &mut FileEntities) {
    match node.kind() {
        "member_expression" => routes::match_route_reference(&node, source, file, out),
        "pair" | "variable_declarator" => {
            routes::match_route_config(&node, source, file, out);
            components::match_arrow_component(&node, source, file, out);
        }
        "function_declaration" => components::match_function_component(&node, source, file, out),
        "call_expression" => {
            stores::match_store_slice(&node, source, file, out);
            api_calls::match_api_call(&node, source, file, out);
        }
        _ => {}
    }

    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            walk(child, source, file, out);
        }
    }
}

// =============================================================================
// Shared AST helpers
// =============================================================================

/// Raw source text of a node
pub(crate) fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Unquoted value of a string literal node, with escape sequences
/// decoded
pub(crate) fn string_value(node: &Node, source: &str) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    let mut value = String::new();
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            match child.kind() {
                "string_fragment" => value.push_str(node_text(&child, source)),
                "escape_sequence" => value.push_str(&unescape(node_text(&child, source))),
                _ => {}
            }
        }
    }
    Some(value)
}

/// Decode one JS escape sequence: quote, backslash, the common control
/// escapes, and `u`/`x` hex forms. Undecodable sequences contribute
/// nothing.
fn unescape(escape: &str) -> String {
    let rest = match escape.strip_prefix('\\') {
        Some(rest) => rest,
        None => return escape.to_string(),
    };
    match rest {
        "n" => "\n".to_string(),
        "r" => "\r".to_string(),
        "t" => "\t".to_string(),
        "0" => "\0".to_string(),
        _ if rest.starts_with('u') || rest.starts_with('x') => {
            let digits = rest[1..].trim_start_matches('{').trim_end_matches('}');
            u32::from_str_radix(digits, 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_default()
        }
        // Identity escapes: quote, backslash, slash
        _ => rest.to_string(),
    }
}

/// Property key of a `pair` or `method_definition` object member,
/// unquoted if it is a string literal
pub(crate) fn member_name(node: &Node, source: &str) -> Option<String> {
    let key = node.child_by_field_name("key").or_else(|| node.child_by_field_name("name"))?;
    match key.kind() {
        "string" => string_value(&key, source),
        _ => Some(node_text(&key, source).to_string()),
    }
}

/// Value node of the named member of an object literal
pub(crate) fn object_member<'t>(object: &Node<'t>, key: &str, source: &str) -> Option<Node<'t>> {
    if object.kind() != "object" {
        return None;
    }
    for i in 0..object.named_child_count() {
        let member = object.named_child(i)?;
        if member.kind() == "pair" {
            if member_name(&member, source).as_deref() == Some(key) {
                return member.child_by_field_name("value");
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_hit_on_same_version() {
        let mut parser = EntityParser::new().unwrap();
        let code = "export function Toolbar() { return null; }";

        let first = parser.parse_file("ui.tsx", code, 7);
        let second = parser.parse_file("ui.tsx", code, 7);

        assert_eq!(first.components.len(), 1);
        assert_eq!(second.components.len(), 1);
        assert_eq!(first.components[0].name, second.components[0].name);
        assert_eq!(parser.stats(), ParserStats { parses: 1, cache_hits: 1 });
    }

    #[test]
    fn test_new_version_reparses() {
        let mut parser = EntityParser::new().unwrap();

        parser.parse_file("ui.tsx", "export function Foo() {}", 1);
        let updated = parser.parse_file("ui.tsx", "export function Bar() {}", 2);

        assert_eq!(updated.components[0].name, "Bar");
        assert_eq!(parser.stats().parses, 2);
        assert_eq!(parser.stats().cache_hits, 0);
    }

    #[test]
    fn test_unsupported_extension_contributes_nothing() {
        let mut parser = EntityParser::new().unwrap();
        let entities = parser.parse_file("notes.md", "# not source", 1);
        assert!(entities.is_empty());
    }

    #[test]
    fn test_invalidate_drops_cache_entry() {
        let mut parser = EntityParser::new().unwrap();
        parser.parse_file("a.ts", "const x = 1;", 1);
        parser.invalidate("a.ts");
        parser.parse_file("a.ts", "const x = 1;", 1);

        assert_eq!(parser.stats().cache_hits, 0);
        assert_eq!(parser.stats().parses, 2);
    }
}
