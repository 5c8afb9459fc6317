//! Outbound API call extraction
//!
//! Any `<receiver>.<verb>(...)` call whose property names an HTTP verb
//! is recorded. The endpoint comes from a first-argument string
//! literal; dynamic endpoints leave it empty.

use tree_sitter::Node;

use super::{node_text, string_value, FileEntities};
use crate::entities::{ApiCall, HttpMethod, Range};

pub(crate) fn match_api_call(node: &Node, source: &str, file: &str, out: &mut FileEntities) {
    if node.kind() != "call_expression" {
        return;
    }
    let callee = match node.child_by_field_name("function") {
        Some(f) if f.kind() == "member_expression" => f,
        _ => return,
    };
    let property = match callee.child_by_field_name("property") {
        Some(p) if p.kind() == "property_identifier" => p,
        _ => return,
    };
    let method = match HttpMethod::from_callee(node_text(&property, source)) {
        Some(m) => m,
        None => return,
    };

    let endpoint = node
        .child_by_field_name("arguments")
        .and_then(|args| args.named_child(0))
        .and_then(|arg| string_value(&arg, source))
        .unwrap_or_default();

    let name = if endpoint.is_empty() {
        method.as_str().to_string()
    } else {
        format!("{} {}", method.as_str(), endpoint)
    };

    out.api_calls.push(ApiCall {
        name,
        file: file.to_string(),
        range: Range::from_node(node),
        method,
        endpoint,
    });
}
