//! Entity records extracted from application source
//!
//! The index tracks five kinds of structural entities: routes, UI
//! components, state-store slices, outbound API calls, and the curated
//! hook catalog. File-scoped kinds carry their source range so IDE
//! features can navigate to them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tree_sitter::Node;

/// Position in source code (0-based line/character)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.line, self.character).cmp(&(other.line, other.character))
    }
}

/// Range in source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn from_node(node: &Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start: Position::new(start.row as u32, start.column as u32),
            end: Position::new(end.row as u32, end.column as u32),
        }
    }

    /// Whether the range contains the position (inclusive on both ends)
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos <= self.end
    }
}

/// Kinds of entities the index tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Route,
    Component,
    Store,
    ApiCall,
    Hook,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EntityKind::Route => "route",
            EntityKind::Component => "component",
            EntityKind::Store => "store",
            EntityKind::ApiCall => "api_call",
            EntityKind::Hook => "hook",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "route" => Ok(EntityKind::Route),
            "component" => Ok(EntityKind::Component),
            "store" => Ok(EntityKind::Store),
            "api_call" => Ok(EntityKind::ApiCall),
            "hook" => Ok(EntityKind::Hook),
            _ => Err(format!("Unknown entity kind: {}", s)),
        }
    }
}

/// Coarse value type inferred from a literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    Array,
    Object,
    Unknown,
}

impl ValueKind {
    /// Infer a coarse type from a tree-sitter literal node kind
    pub fn from_node_kind(kind: &str) -> Self {
        match kind {
            "string" | "template_string" => ValueKind::String,
            "number" => ValueKind::Number,
            "true" | "false" => ValueKind::Boolean,
            "array" => ValueKind::Array,
            "object" => ValueKind::Object,
            _ => ValueKind::Unknown,
        }
    }
}

/// HTTP verbs recognized on API call sites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// Match a callee property name like `get` in `api.get(...)`
    pub fn from_callee(name: &str) -> Option<Self> {
        match name {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "delete" => Some(HttpMethod::Delete),
            "patch" => Some(HttpMethod::Patch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A route definition or reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub name: String,
    pub file: String,
    pub range: Range,
    /// URL template, e.g. `/user/:id`
    pub path: String,
    /// Parameter names parsed from `:param` path segments
    pub params: Vec<String>,
    /// Named middleware identifiers
    pub guards: Vec<String>,
    /// Component reference if the route config names one
    pub component: Option<String>,
}

/// A UI component definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub file: String,
    pub range: Range,
    /// Prop name to textual type, when the first parameter carries an
    /// inline object-type annotation. Absent for untyped or imported
    /// prop shapes.
    pub props: Option<BTreeMap<String, String>>,
    pub is_exported: bool,
}

/// A state-store slice definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSlice {
    pub name: String,
    pub file: String,
    pub range: Range,
    pub slice_name: String,
    /// State field to coarse inferred type
    pub state: BTreeMap<String, ValueKind>,
    /// Reducer/method names
    pub actions: Vec<String>,
}

/// An outbound API call site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCall {
    /// `"<VERB> <endpoint>"`, the key the call is indexed under
    pub name: String,
    pub file: String,
    pub range: Range,
    pub method: HttpMethod,
    /// Literal string argument, empty when the endpoint is dynamic
    pub endpoint: String,
}

/// A curated hook catalog entry
///
/// Hooks are not discovered by scanning; the catalog is seeded once at
/// index construction and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookDoc {
    pub name: String,
    pub signature: String,
    pub parameters: Vec<String>,
    pub return_type: String,
    pub description: String,
    pub example: String,
}

/// Any entity record, as returned by the query surface
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entity {
    Route(Route),
    Component(Component),
    Store(StoreSlice),
    ApiCall(ApiCall),
    Hook(HookDoc),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Route(_) => EntityKind::Route,
            Entity::Component(_) => EntityKind::Component,
            Entity::Store(_) => EntityKind::Store,
            Entity::ApiCall(_) => EntityKind::ApiCall,
            Entity::Hook(_) => EntityKind::Hook,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entity::Route(r) => &r.name,
            Entity::Component(c) => &c.name,
            Entity::Store(s) => &s.name,
            Entity::ApiCall(a) => &a.name,
            Entity::Hook(h) => &h.name,
        }
    }

    /// Owning file path; hooks are global and have none
    pub fn file(&self) -> Option<&str> {
        match self {
            Entity::Route(r) => Some(&r.file),
            Entity::Component(c) => Some(&c.file),
            Entity::Store(s) => Some(&s.file),
            Entity::ApiCall(a) => Some(&a.file),
            Entity::Hook(_) => None,
        }
    }

    /// Source range; hooks are global and have none
    pub fn range(&self) -> Option<Range> {
        match self {
            Entity::Route(r) => Some(r.range),
            Entity::Component(c) => Some(c.range),
            Entity::Store(s) => Some(s.range),
            Entity::ApiCall(a) => Some(a.range),
            Entity::Hook(_) => None,
        }
    }
}
