//! State-store slice extraction
//!
//! A call expression whose callee text contains a recognized store
//! factory name yields one slice. The first object-literal argument is
//! scanned shallowly: a `name` field, an `initialState` object whose
//! field types are inferred from their literal kinds, and a `reducers`
//! object whose member names become actions.

use std::collections::BTreeMap;
use tree_sitter::Node;

use super::{member_name, node_text, object_member, string_value, FileEntities};
use crate::entities::{Range, StoreSlice, ValueKind};

/// Factory callees recognized as store-slice constructors
static STORE_FACTORIES: &[&str] = &["createSlice", "createStore", "defineStore"];

pub(crate) fn match_store_slice(node: &Node, source: &str, file: &str, out: &mut FileEntities) {
    if node.kind() != "call_expression" {
        return;
    }
    let callee = match node.child_by_field_name("function") {
        Some(f) => f,
        None => return,
    };
    let callee_text = node_text(&callee, source);
    if !STORE_FACTORIES.iter().any(|f| callee_text.contains(f)) {
        return;
    }

    let config = node
        .child_by_field_name("arguments")
        .and_then(|args| args.named_child(0))
        .filter(|arg| arg.kind() == "object");

    let slice_name = config
        .as_ref()
        .and_then(|c| object_member(c, "name", source))
        .and_then(|v| string_value(&v, source))
        .or_else(|| binding_name(node, source))
        .unwrap_or_else(|| "store".to_string());

    let state = config
        .as_ref()
        .and_then(|c| object_member(c, "initialState", source))
        .map(|v| state_fields(&v, source))
        .unwrap_or_default();

    let actions = config
        .as_ref()
        .and_then(|c| object_member(c, "reducers", source))
        .map(|v| member_names(&v, source))
        .unwrap_or_default();

    out.stores.push(StoreSlice {
        name: slice_name.clone(),
        file: file.to_string(),
        range: Range::from_node(node),
        slice_name,
        state,
        actions,
    });
}

/// Name of the variable the factory call is assigned to, if any
fn binding_name(call: &Node, source: &str) -> Option<String> {
    let parent = call.parent()?;
    if parent.kind() != "variable_declarator" {
        return None;
    }
    parent
        .child_by_field_name("name")
        .map(|n| node_text(&n, source).to_string())
}

/// Coarse type per field of the `initialState` object literal
fn state_fields(node: &Node, source: &str) -> BTreeMap<String, ValueKind> {
    let mut fields = BTreeMap::new();
    if node.kind() != "object" {
        return fields;
    }
    for i in 0..node.named_child_count() {
        let member = match node.named_child(i) {
            Some(m) if m.kind() == "pair" => m,
            _ => continue,
        };
        let name = match member_name(&member, source) {
            Some(n) => n,
            None => continue,
        };
        let kind = member
            .child_by_field_name("value")
            .map(|v| ValueKind::from_node_kind(v.kind()))
            .unwrap_or(ValueKind::Unknown);
        fields.insert(name, kind);
    }
    fields
}

/// Member names of an object literal, covering both `name: fn` pairs
/// and shorthand `name() {}` methods
fn member_names(node: &Node, source: &str) -> Vec<String> {
    let mut names = Vec::new();
    if node.kind() != "object" {
        return names;
    }
    for i in 0..node.named_child_count() {
        let member = match node.named_child(i) {
            Some(m) if matches!(m.kind(), "pair" | "method_definition") => m,
            _ => continue,
        };
        if let Some(name) = member_name(&member, source) {
            names.push(name);
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::EntityParser;

    #[test]
    fn test_create_slice() {
        let mut parser = EntityParser::new().unwrap();
        let code = r#"
const todosSlice = createSlice({
    name: "todos",
    initialState: {
        items: [],
        filter: "all",
        loading: false,
        page: 1,
        meta: {},
    },
    reducers: {
        addTodo(state, action) {},
        removeTodo: (state, action) => {},
    },
});
"#;
        let entities = parser.parse_file("todos.ts", code, 1);

        assert_eq!(entities.stores.len(), 1);
        let slice = &entities.stores[0];
        assert_eq!(slice.slice_name, "todos");
        assert_eq!(slice.state.get("items"), Some(&ValueKind::Array));
        assert_eq!(slice.state.get("filter"), Some(&ValueKind::String));
        assert_eq!(slice.state.get("loading"), Some(&ValueKind::Boolean));
        assert_eq!(slice.state.get("page"), Some(&ValueKind::Number));
        assert_eq!(slice.state.get("meta"), Some(&ValueKind::Object));
        assert_eq!(slice.actions, vec!["addTodo", "removeTodo"]);
    }

    #[test]
    fn test_namespaced_factory_callee() {
        let mut parser = EntityParser::new().unwrap();
        let code = r#"const store = toolkit.createSlice({ name: "auth" });"#;
        let entities = parser.parse_file("auth.ts", code, 1);

        assert_eq!(entities.stores.len(), 1);
        assert_eq!(entities.stores[0].slice_name, "auth");
    }

    #[test]
    fn test_missing_name_falls_back_to_binding() {
        let mut parser = EntityParser::new().unwrap();
        let code = "const settings = createStore({ initialState: { theme: 'dark' } });";
        let entities = parser.parse_file("settings.ts", code, 1);

        assert_eq!(entities.stores.len(), 1);
        assert_eq!(entities.stores[0].slice_name, "settings");
    }

    #[test]
    fn test_non_object_argument_degrades() {
        let mut parser = EntityParser::new().unwrap();
        let entities = parser.parse_file("odd.ts", "const s = createStore(buildConfig());", 1);

        assert_eq!(entities.stores.len(), 1);
        let slice = &entities.stores[0];
        assert_eq!(slice.slice_name, "s");
        assert!(slice.state.is_empty());
        assert!(slice.actions.is_empty());
    }

    #[test]
    fn test_unrelated_call_ignored() {
        let mut parser = EntityParser::new().unwrap();
        let entities = parser.parse_file("misc.ts", "const x = computeThing({ name: 'n' });", 1);
        assert!(entities.stores.is_empty());
    }
}
