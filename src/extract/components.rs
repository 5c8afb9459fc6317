//! UI component extraction
//!
//! A component is an uppercase-named function declaration or an
//! arrow-function-valued `const` binding. Props are read only when the
//! first parameter carries an inline object-type annotation; nested or
//! imported prop types yield no props.

use std::collections::BTreeMap;
use tree_sitter::Node;

use super::{node_text, FileEntities};
use crate::entities::{Component, Range};

pub(crate) fn match_function_component(
    node: &Node,
    source: &str,
    file: &str,
    out: &mut FileEntities,
) {
    if node.kind() != "function_declaration" {
        return;
    }
    let name_node = match node.child_by_field_name("name") {
        Some(n) => n,
        None => return,
    };
    let name = node_text(&name_node, source);
    if !starts_uppercase(name) {
        return;
    }

    out.components.push(Component {
        name: name.to_string(),
        file: file.to_string(),
        range: Range::from_node(node),
        props: inline_props(node, source),
        is_exported: is_exported(node),
    });
}

pub(crate) fn match_arrow_component(node: &Node, source: &str, file: &str, out: &mut FileEntities) {
    if node.kind() != "variable_declarator" {
        return;
    }
    let name_node = match node.child_by_field_name("name") {
        Some(n) if n.kind() == "identifier" => n,
        _ => return,
    };
    let name = node_text(&name_node, source);
    if !starts_uppercase(name) {
        return;
    }
    let value = match node.child_by_field_name("value") {
        Some(v) if v.kind() == "arrow_function" => v,
        _ => return,
    };

    // Export status hangs off the enclosing const declaration
    let declaration = node.parent().filter(|p| p.kind() == "lexical_declaration");
    let exported = declaration.map(|d| is_exported(&d)).unwrap_or(false);

    out.components.push(Component {
        name: name.to_string(),
        file: file.to_string(),
        range: Range::from_node(node),
        props: inline_props(&value, source),
        is_exported: exported,
    });
}

fn starts_uppercase(name: &str) -> bool {
    name.chars().next().map(|c| c.is_ascii_uppercase()).unwrap_or(false)
}

/// Explicit export modifier, or top-level file placement
fn is_exported(node: &Node) -> bool {
    match node.parent() {
        Some(parent) if parent.kind() == "export_statement" => true,
        Some(parent) if parent.kind() == "program" => true,
        _ => false,
    }
}

/// Prop name → textual type from an inline `{ field: Type }` annotation
/// on the first parameter. Anything else yields `None`.
fn inline_props(function: &Node, source: &str) -> Option<BTreeMap<String, String>> {
    let params = function.child_by_field_name("parameters")?;
    let first = (0..params.named_child_count())
        .filter_map(|i| params.named_child(i))
        .find(|p| matches!(p.kind(), "required_parameter" | "optional_parameter"))?;
    let annotation = first.child_by_field_name("type")?;
    let shape = (0..annotation.named_child_count())
        .filter_map(|i| annotation.named_child(i))
        .find(|t| t.kind() == "object_type")?;

    let mut props = BTreeMap::new();
    for i in 0..shape.named_child_count() {
        let member = match shape.named_child(i) {
            Some(m) if m.kind() == "property_signature" => m,
            _ => continue,
        };
        let prop_name = match member.child_by_field_name("name") {
            Some(n) => node_text(&n, source).to_string(),
            None => continue,
        };
        let prop_type = member
            .child_by_field_name("type")
            .and_then(|ann| ann.named_child(0))
            .map(|t| node_text(&t, source).to_string())
            .unwrap_or_else(|| "unknown".to_string());
        props.insert(prop_name, prop_type);
    }
    Some(props)
}

#[cfg(test)]
mod tests {
    use crate::extract::EntityParser;

    #[test]
    fn test_function_component() {
        let mut parser = EntityParser::new().unwrap();
        let code = "export function UserCard(props: { name: string; age: number }) { return null; }";
        let entities = parser.parse_file("card.tsx", code, 1);

        assert_eq!(entities.components.len(), 1);
        let component = &entities.components[0];
        assert_eq!(component.name, "UserCard");
        assert!(component.is_exported);

        let props = component.props.as_ref().unwrap();
        assert_eq!(props.get("name").map(String::as_str), Some("string"));
        assert_eq!(props.get("age").map(String::as_str), Some("number"));
    }

    #[test]
    fn test_arrow_component() {
        let mut parser = EntityParser::new().unwrap();
        let code = "export const Header = (props: { title: string }) => null;";
        let entities = parser.parse_file("header.tsx", code, 1);

        assert_eq!(entities.components.len(), 1);
        let component = &entities.components[0];
        assert_eq!(component.name, "Header");
        assert!(component.is_exported);
        assert!(component.props.as_ref().unwrap().contains_key("title"));
    }

    #[test]
    fn test_lowercase_function_is_not_a_component() {
        let mut parser = EntityParser::new().unwrap();
        let entities = parser.parse_file("util.ts", "function formatDate(d: Date) {}", 1);
        assert!(entities.components.is_empty());
    }

    #[test]
    fn test_imported_prop_type_yields_no_props() {
        let mut parser = EntityParser::new().unwrap();
        let code = "export function Avatar(props: AvatarProps) { return null; }";
        let entities = parser.parse_file("avatar.tsx", code, 1);

        assert_eq!(entities.components.len(), 1);
        assert!(entities.components[0].props.is_none());
    }

    #[test]
    fn test_top_level_component_counts_as_exported() {
        let mut parser = EntityParser::new().unwrap();
        let entities = parser.parse_file("page.tsx", "function Page() { return null; }", 1);

        assert_eq!(entities.components.len(), 1);
        assert!(entities.components[0].is_exported);
    }

    #[test]
    fn test_untyped_javascript_component() {
        let mut parser = EntityParser::new().unwrap();
        let entities = parser.parse_file("app.jsx", "const App = () => null;", 1);

        assert_eq!(entities.components.len(), 1);
        assert_eq!(entities.components[0].name, "App");
        assert!(entities.components[0].props.is_none());
    }
}
