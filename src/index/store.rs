//! In-memory entity maps
//!
//! Four file-scoped maps (routes, components, stores, api calls) keyed
//! `file:name`, one hooks map keyed by name and seeded at construction,
//! and a file → keys multimap so removing a file touches only its own
//! entries instead of scanning every map.

use serde::Serialize;
use std::collections::HashMap;

use crate::entities::{
    ApiCall, Component, Entity, EntityKind, HookDoc, Position, Route, StoreSlice,
};
use crate::extract::FileEntities;
use crate::hooks;

/// Position-lookup precedence; the first kind whose range contains the
/// position wins, regardless of range nesting
const POSITION_PRECEDENCE: [EntityKind; 4] = [
    EntityKind::Route,
    EntityKind::Component,
    EntityKind::Store,
    EntityKind::ApiCall,
];

/// Per-kind counts plus the number of distinct files contributing
/// at least one entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub routes: usize,
    pub components: usize,
    pub stores: usize,
    pub api_calls: usize,
    pub hooks: usize,
    pub files: usize,
}

/// The authoritative entity store
pub struct IndexStore {
    routes: HashMap<String, Route>,
    components: HashMap<String, Component>,
    stores: HashMap<String, StoreSlice>,
    api_calls: HashMap<String, ApiCall>,
    hooks: HashMap<String, HookDoc>,
    /// file → (kind, key) of every entry the file contributed
    file_keys: HashMap<String, Vec<(EntityKind, String)>>,
}

fn entity_key(file: &str, name: &str) -> String {
    format!("{}:{}", file, name)
}

/// Record a key once per file; a repeated `(kind, name)` in one file
/// overwrites the map slot, so its key must not appear twice
fn push_key(keys: &mut Vec<(EntityKind, String)>, kind: EntityKind, key: &str) {
    if !keys.iter().any(|(k, existing)| *k == kind && existing == key) {
        keys.push((kind, key.to_string()));
    }
}

impl IndexStore {
    /// Create a store with the hook catalog seeded
    pub fn new() -> Self {
        let hooks = hooks::catalog()
            .into_iter()
            .map(|h| (h.name.clone(), h))
            .collect();

        Self {
            routes: HashMap::new(),
            components: HashMap::new(),
            stores: HashMap::new(),
            api_calls: HashMap::new(),
            hooks,
            file_keys: HashMap::new(),
        }
    }

    /// Insert a file's freshly parsed entities.
    ///
    /// The caller is responsible for having removed the file's previous
    /// contributions first (remove-then-reparse).
    pub fn insert_file_entities(&mut self, file: &str, entities: &FileEntities) {
        let keys = self.file_keys.entry(file.to_string()).or_default();

        for route in &entities.routes {
            let key = entity_key(file, &route.name);
            push_key(keys, EntityKind::Route, &key);
            self.routes.insert(key, route.clone());
        }
        for component in &entities.components {
            let key = entity_key(file, &component.name);
            push_key(keys, EntityKind::Component, &key);
            self.components.insert(key, component.clone());
        }
        for slice in &entities.stores {
            let key = entity_key(file, &slice.name);
            push_key(keys, EntityKind::Store, &key);
            self.stores.insert(key, slice.clone());
        }
        for call in &entities.api_calls {
            let key = entity_key(file, &call.name);
            push_key(keys, EntityKind::ApiCall, &key);
            self.api_calls.insert(key, call.clone());
        }

        if keys.is_empty() {
            self.file_keys.remove(file);
        }
    }

    /// Delete every entity the file contributed.
    ///
    /// O(entities-in-file) via the file-keys multimap.
    pub fn remove_file(&mut self, file: &str) {
        let keys = match self.file_keys.remove(file) {
            Some(keys) => keys,
            None => return,
        };
        for (kind, key) in keys {
            match kind {
                EntityKind::Route => {
                    self.routes.remove(&key);
                }
                EntityKind::Component => {
                    self.components.remove(&key);
                }
                EntityKind::Store => {
                    self.stores.remove(&key);
                }
                EntityKind::ApiCall => {
                    self.api_calls.remove(&key);
                }
                EntityKind::Hook => {}
            }
        }
    }

    /// Drop all file-scoped entities; the hook catalog survives
    pub fn clear(&mut self) {
        self.routes.clear();
        self.components.clear();
        self.stores.clear();
        self.api_calls.clear();
        self.file_keys.clear();
    }

    /// All entities of one kind
    pub fn all_of_kind(&self, kind: EntityKind) -> Vec<Entity> {
        match kind {
            EntityKind::Route => self.routes.values().cloned().map(Entity::Route).collect(),
            EntityKind::Component => self
                .components
                .values()
                .cloned()
                .map(Entity::Component)
                .collect(),
            EntityKind::Store => self.stores.values().cloned().map(Entity::Store).collect(),
            EntityKind::ApiCall => self
                .api_calls
                .values()
                .cloned()
                .map(Entity::ApiCall)
                .collect(),
            EntityKind::Hook => self.hooks.values().cloned().map(Entity::Hook).collect(),
        }
    }

    /// Exact-name lookup.
    ///
    /// If several files define the same name, the entry with the
    /// lexicographically smallest file path wins; map iteration order
    /// never leaks into results.
    pub fn get_by_name(&self, kind: EntityKind, name: &str) -> Option<Entity> {
        if kind == EntityKind::Hook {
            return self.hooks.get(name).cloned().map(Entity::Hook);
        }
        self.all_of_kind(kind)
            .into_iter()
            .filter(|e| e.name() == name)
            .min_by(|a, b| a.file().cmp(&b.file()))
    }

    /// Case-insensitive substring search over entity names, and route
    /// paths as well
    pub fn search(&self, kind: EntityKind, query: &str) -> Vec<Entity> {
        let needle = query.to_lowercase();
        self.all_of_kind(kind)
            .into_iter()
            .filter(|e| {
                if e.name().to_lowercase().contains(&needle) {
                    return true;
                }
                match e {
                    Entity::Route(r) => r.path.to_lowercase().contains(&needle),
                    _ => false,
                }
            })
            .collect()
    }

    /// Every entity contributed by one file, in kind-precedence order
    pub fn entities_in_file(&self, file: &str) -> Vec<Entity> {
        let keys = match self.file_keys.get(file) {
            Some(keys) => keys,
            None => return Vec::new(),
        };

        let mut entities = Vec::with_capacity(keys.len());
        for kind in POSITION_PRECEDENCE {
            for (entry_kind, key) in keys {
                if *entry_kind != kind {
                    continue;
                }
                if let Some(entity) = self.lookup(kind, key) {
                    entities.push(entity);
                }
            }
        }
        entities
    }

    /// The entity whose range contains the position, checked in the
    /// fixed precedence order routes → components → stores → api calls.
    /// Overlaps across kinds resolve by that order, not by innermost
    /// range.
    pub fn entity_at_position(&self, file: &str, position: Position) -> Option<Entity> {
        self.entities_in_file(file)
            .into_iter()
            .find(|e| e.range().map(|r| r.contains(position)).unwrap_or(false))
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            routes: self.routes.len(),
            components: self.components.len(),
            stores: self.stores.len(),
            api_calls: self.api_calls.len(),
            hooks: self.hooks.len(),
            files: self.file_keys.len(),
        }
    }

    fn lookup(&self, kind: EntityKind, key: &str) -> Option<Entity> {
        match kind {
            EntityKind::Route => self.routes.get(key).cloned().map(Entity::Route),
            EntityKind::Component => self.components.get(key).cloned().map(Entity::Component),
            EntityKind::Store => self.stores.get(key).cloned().map(Entity::Store),
            EntityKind::ApiCall => self.api_calls.get(key).cloned().map(Entity::ApiCall),
            EntityKind::Hook => None,
        }
    }
}

impl Default for IndexStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Range;

    fn route(name: &str, file: &str, lines: (u32, u32)) -> Route {
        Route {
            name: name.to_string(),
            file: file.to_string(),
            range: Range::new(Position::new(lines.0, 0), Position::new(lines.1, 0)),
            path: format!("/{}", name),
            params: vec![],
            guards: vec![],
            component: None,
        }
    }

    fn component(name: &str, file: &str, lines: (u32, u32)) -> Component {
        Component {
            name: name.to_string(),
            file: file.to_string(),
            range: Range::new(Position::new(lines.0, 0), Position::new(lines.1, 0)),
            props: None,
            is_exported: true,
        }
    }

    fn slice(name: &str, file: &str, lines: (u32, u32)) -> StoreSlice {
        StoreSlice {
            name: name.to_string(),
            file: file.to_string(),
            range: Range::new(Position::new(lines.0, 0), Position::new(lines.1, 0)),
            slice_name: name.to_string(),
            state: Default::default(),
            actions: vec![],
        }
    }

    fn entities(
        routes: Vec<Route>,
        components: Vec<Component>,
        stores: Vec<StoreSlice>,
    ) -> FileEntities {
        FileEntities {
            routes,
            components,
            stores,
            api_calls: vec![],
        }
    }

    #[test]
    fn test_insert_and_get_by_name() {
        let mut store = IndexStore::new();
        store.insert_file_entities(
            "routes.ts",
            &entities(vec![route("user", "routes.ts", (1, 1))], vec![], vec![]),
        );

        let found = store.get_by_name(EntityKind::Route, "user").unwrap();
        assert_eq!(found.name(), "user");
        assert_eq!(found.file(), Some("routes.ts"));
        assert!(store.get_by_name(EntityKind::Route, "missing").is_none());
    }

    #[test]
    fn test_remove_file_clears_all_contributions() {
        let mut store = IndexStore::new();
        store.insert_file_entities(
            "a.ts",
            &entities(
                vec![route("user", "a.ts", (1, 1))],
                vec![component("Card", "a.ts", (3, 5))],
                vec![slice("todos", "a.ts", (7, 12))],
            ),
        );
        store.insert_file_entities(
            "b.ts",
            &entities(vec![route("admin", "b.ts", (1, 1))], vec![], vec![]),
        );

        store.remove_file("a.ts");

        assert!(store.get_by_name(EntityKind::Route, "user").is_none());
        assert!(store.get_by_name(EntityKind::Component, "Card").is_none());
        assert!(store.get_by_name(EntityKind::Store, "todos").is_none());
        assert!(store.entities_in_file("a.ts").is_empty());
        assert!(store.search(EntityKind::Route, "user").is_empty());
        assert!(store.get_by_name(EntityKind::Route, "admin").is_some());
        assert_eq!(store.stats().files, 1);
    }

    #[test]
    fn test_repeated_name_in_one_file_indexes_once() {
        let mut store = IndexStore::new();
        // Two references to the same route in one file, e.g.
        // `go(routes.home); back(routes.home);`
        store.insert_file_entities(
            "nav.ts",
            &entities(
                vec![route("home", "nav.ts", (0, 0)), route("home", "nav.ts", (2, 2))],
                vec![],
                vec![],
            ),
        );

        assert_eq!(store.stats().routes, 1);
        assert_eq!(store.entities_in_file("nav.ts").len(), 1);

        // The last occurrence holds the map slot
        let found = store.get_by_name(EntityKind::Route, "home").unwrap();
        assert_eq!(found.range().unwrap().start, Position::new(2, 0));

        store.remove_file("nav.ts");
        assert_eq!(store.stats().routes, 0);
    }

    #[test]
    fn test_name_collision_resolves_to_smallest_file() {
        let mut store = IndexStore::new();
        store.insert_file_entities(
            "z.ts",
            &entities(vec![], vec![component("Button", "z.ts", (0, 2))], vec![]),
        );
        store.insert_file_entities(
            "a.ts",
            &entities(vec![], vec![component("Button", "a.ts", (0, 2))], vec![]),
        );

        let found = store.get_by_name(EntityKind::Component, "Button").unwrap();
        assert_eq!(found.file(), Some("a.ts"));
    }

    #[test]
    fn test_search_is_case_insensitive_and_covers_route_paths() {
        let mut store = IndexStore::new();
        let mut checkout = route("checkout", "shop.ts", (0, 0));
        checkout.path = "/Shop/Checkout/:step".to_string();
        store.insert_file_entities("shop.ts", &entities(vec![checkout], vec![], vec![]));

        assert_eq!(store.search(EntityKind::Route, "CHECK").len(), 1);
        assert_eq!(store.search(EntityKind::Route, "/shop/").len(), 1);
        assert!(store.search(EntityKind::Route, "cart").is_empty());
    }

    #[test]
    fn test_position_precedence_component_over_nested_store() {
        let mut store = IndexStore::new();
        // Store slice nested entirely inside the component's range
        store.insert_file_entities(
            "page.tsx",
            &entities(
                vec![],
                vec![component("Page", "page.tsx", (0, 20))],
                vec![slice("pageState", "page.tsx", (5, 10))],
            ),
        );

        let hit = store
            .entity_at_position("page.tsx", Position::new(7, 0))
            .unwrap();
        assert_eq!(hit.kind(), EntityKind::Component);
        assert_eq!(hit.name(), "Page");
    }

    #[test]
    fn test_position_miss() {
        let mut store = IndexStore::new();
        store.insert_file_entities(
            "page.tsx",
            &entities(vec![], vec![component("Page", "page.tsx", (0, 5))], vec![]),
        );

        assert!(store.entity_at_position("page.tsx", Position::new(30, 0)).is_none());
        assert!(store.entity_at_position("other.tsx", Position::new(1, 0)).is_none());
    }

    #[test]
    fn test_hooks_survive_clear_and_reparse() {
        let mut store = IndexStore::new();
        let seeded = store.stats().hooks;
        assert!(seeded > 0);

        store.insert_file_entities(
            "a.ts",
            &entities(vec![route("user", "a.ts", (1, 1))], vec![], vec![]),
        );
        store.clear();

        assert_eq!(store.stats().hooks, seeded);
        assert_eq!(store.stats().routes, 0);
        assert!(store.get_by_name(EntityKind::Hook, "useState").is_some());
    }

    #[test]
    fn test_stats_counts_distinct_files() {
        let mut store = IndexStore::new();
        store.insert_file_entities(
            "a.ts",
            &entities(
                vec![route("one", "a.ts", (0, 0)), route("two", "a.ts", (1, 1))],
                vec![],
                vec![],
            ),
        );
        store.insert_file_entities(
            "b.ts",
            &entities(vec![], vec![component("App", "b.ts", (0, 0))], vec![]),
        );

        let stats = store.stats();
        assert_eq!(stats.routes, 2);
        assert_eq!(stats.components, 1);
        assert_eq!(stats.files, 2);
    }
}
