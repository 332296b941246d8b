//! Structural predicates used for hover highlighting. All of them are pure and symmetric.

use crate::store::entity::EntityStore;

/// Two items are adjacent when a relationship connects them.
pub fn adjacent(store: &EntityStore, a: &str, b: &str) -> bool {
    store.adjacent(a, b)
}

/// Either node lies on the other's root-to-self path.
pub fn related(store: &EntityStore, a: &str, b: &str) -> bool {
    store.hierarchy().related(a, b)
}

/// Ancestry test in either direction. Same relation as [`related`], kept under the name the
/// hover code reads best with.
pub fn is_ancestor(store: &EntityStore, a: &str, b: &str) -> bool {
    related(store, a, b)
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/query.rs"]
mod tests;
