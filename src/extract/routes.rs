//! Route extraction
//!
//! Two patterns produce routes:
//! - `routes.<ident>` member expressions, treated uniformly as a route
//!   with the synthesized path `/<ident>` (references and definitions
//!   are not distinguished).
//! - an object literal bound to a `routes` key or `routes` const, one
//!   route per property with `path`/`component`/`guards` read from the
//!   nested config and `params` derived from `:name` path segments.

use lazy_static::lazy_static;
use regex::Regex;
use tree_sitter::Node;

use super::{member_name, node_text, object_member, string_value, FileEntities};
use crate::entities::{Range, Route};

lazy_static! {
    static ref PARAM_RE: Regex = Regex::new(r":([A-Za-z_][A-Za-z0-9_]*)").unwrap();
}

/// Parameter names out of `:param` segments of a URL template
pub(crate) fn path_params(path: &str) -> Vec<String> {
    PARAM_RE
        .captures_iter(path)
        .map(|cap| cap[1].to_string())
        .collect()
}

/// `routes.<identifier>` property access
pub(crate) fn match_route_reference(node: &Node, source: &str, file: &str, out: &mut FileEntities) {
    if node.kind() != "member_expression" {
        return;
    }
    let object = match node.child_by_field_name("object") {
        Some(n) => n,
        None => return,
    };
    if object.kind() != "identifier" || node_text(&object, source) != "routes" {
        return;
    }
    let property = match node.child_by_field_name("property") {
        Some(n) if n.kind() == "property_identifier" => n,
        _ => return,
    };

    let name = node_text(&property, source).to_string();
    let path = format!("/{}", name);
    out.routes.push(Route {
        params: path_params(&path),
        name,
        file: file.to_string(),
        range: Range::from_node(node),
        path,
        guards: Vec::new(),
        component: None,
    });
}

/// Object literal assigned to a `routes` key or `routes` binding
pub(crate) fn match_route_config(node: &Node, source: &str, file: &str, out: &mut FileEntities) {
    let (is_routes, value) = match node.kind() {
        "pair" => (
            member_name(node, source).as_deref() == Some("routes"),
            node.child_by_field_name("value"),
        ),
        "variable_declarator" => (
            node.child_by_field_name("name")
                .map(|n| node_text(&n, source) == "routes")
                .unwrap_or(false),
            node.child_by_field_name("value"),
        ),
        _ => (false, None),
    };

    let config = match (is_routes, value) {
        (true, Some(v)) if v.kind() == "object" => v,
        _ => return,
    };

    for i in 0..config.named_child_count() {
        let member = match config.named_child(i) {
            Some(m) if m.kind() == "pair" => m,
            _ => continue,
        };
        let name = match member_name(&member, source) {
            Some(n) => n,
            None => continue,
        };
        out.routes.push(route_from_entry(&member, &name, source, file));
    }
}

/// One route out of a `routes` config entry. A malformed entry (value
/// not an object literal) degrades to defaults instead of raising.
fn route_from_entry(member: &Node, name: &str, source: &str, file: &str) -> Route {
    let config = member
        .child_by_field_name("value")
        .filter(|v| v.kind() == "object");

    let path = config
        .as_ref()
        .and_then(|c| object_member(c, "path", source))
        .and_then(|v| string_value(&v, source))
        .unwrap_or_else(|| format!("/{}", name));

    let component = config
        .as_ref()
        .and_then(|c| object_member(c, "component", source))
        .map(|v| match string_value(&v, source) {
            Some(s) => s,
            None => node_text(&v, source).to_string(),
        });

    let guards = config
        .as_ref()
        .and_then(|c| object_member(c, "guards", source))
        .map(|v| array_strings(&v, source))
        .unwrap_or_default();

    Route {
        name: name.to_string(),
        file: file.to_string(),
        range: Range::from_node(member),
        params: path_params(&path),
        path,
        guards,
        component,
    }
}

fn array_strings(node: &Node, source: &str) -> Vec<String> {
    if node.kind() != "array" {
        return Vec::new();
    }
    let mut values = Vec::new();
    for i in 0..node.named_child_count() {
        if let Some(element) = node.named_child(i) {
            if let Some(s) = string_value(&element, source) {
                values.push(s);
            }
        }
    }
    values
}
