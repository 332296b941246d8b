use std::collections::{BTreeSet, HashMap};

use crate::{
    dataset::model::{GraphDataset, HierarchyDataset},
    foundation::{
        core::ItemId,
        error::{VisError, VisResult},
    },
    store::hierarchy::{Hierarchy, HierarchyNode},
};

/// What to do when the datasets reference ids that do not exist.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityPolicy {
    /// Fail the load on the first fault.
    Strict,
    /// Drop the offending edge/link/subtree, log it and keep going. A hierarchy root that is not a
    /// catalog item still fails the load, since there is no tree left to keep.
    #[default]
    Lenient,
}

impl IntegrityPolicy {
    pub(crate) fn check(
        self,
        report: &mut IntegrityReport,
        err: VisError,
        what: String,
    ) -> VisResult<()> {
        match self {
            Self::Strict => Err(err),
            Self::Lenient => {
                tracing::warn!(%err, "dropped {what}");
                report.dropped.push(format!("{what}: {err}"));
                Ok(())
            }
        }
    }
}

/// Everything a lenient load discarded.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct IntegrityReport {
    pub dropped: Vec<String>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub image: String,
    pub genres: Vec<String>,
}

/// Undirected typed relationship between two catalog items.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Relationship {
    pub source: ItemId,
    pub target: ItemId,
    pub kind: String,
    #[serde(skip)]
    pub(crate) ends: (usize, usize),
}

impl Relationship {
    pub fn touches(&self, id: &str) -> bool {
        self.source.as_str() == id || self.target.as_str() == id
    }

    /// Store slots of both ends.
    pub fn ends(&self) -> (usize, usize) {
        self.ends
    }
}

/// Canonical items, relationships and the derived hierarchy.
///
/// Items keep their load order; that order is the "slot" used by layouts and the scene.
#[derive(Clone, Debug)]
pub struct EntityStore {
    items: Vec<Item>,
    index: HashMap<ItemId, usize>,
    relationships: Vec<Relationship>,
    neighbors: Vec<BTreeSet<usize>>,
    incident: Vec<Vec<usize>>,
    categories: Vec<String>,
    hierarchy: Hierarchy,
    report: IntegrityReport,
}

impl EntityStore {
    #[tracing::instrument(skip_all, fields(nodes = graph.nodes.len(), edges = graph.edges.len()))]
    pub fn load(
        graph: &GraphDataset,
        tree: &HierarchyDataset,
        policy: IntegrityPolicy,
    ) -> VisResult<Self> {
        graph.validate()?;
        let mut report = IntegrityReport::default();

        let mut items = Vec::with_capacity(graph.nodes.len());
        let mut index = HashMap::with_capacity(graph.nodes.len());
        for rec in &graph.nodes {
            if index.contains_key(&rec.id) {
                policy.check(
                    &mut report,
                    VisError::integrity(format!("duplicate item id '{}'", rec.id)),
                    format!("item '{}' (first occurrence kept)", rec.id),
                )?;
                continue;
            }
            index.insert(rec.id.clone(), items.len());
            items.push(Item {
                id: rec.id.clone(),
                name: rec.name.clone(),
                image: rec.image.clone(),
                genres: rec.genres.clone(),
            });
        }

        let mut relationships = Vec::with_capacity(graph.edges.len());
        let mut neighbors = vec![BTreeSet::new(); items.len()];
        let mut incident = vec![Vec::new(); items.len()];
        let mut categories: Vec<String> = Vec::new();
        for edge in &graph.edges {
            let ends = match (index.get(&edge.source), index.get(&edge.target)) {
                (Some(&s), Some(&t)) => (s, t),
                (s, _) => {
                    let missing = if s.is_none() { &edge.source } else { &edge.target };
                    policy.check(
                        &mut report,
                        VisError::not_found(missing.as_str()),
                        format!("relationship {} -> {}", edge.source, edge.target),
                    )?;
                    continue;
                }
            };

            let r = relationships.len();
            neighbors[ends.0].insert(ends.1);
            neighbors[ends.1].insert(ends.0);
            incident[ends.0].push(r);
            if ends.1 != ends.0 {
                incident[ends.1].push(r);
            }
            if !categories.contains(&edge.kind) {
                categories.push(edge.kind.clone());
            }
            relationships.push(Relationship {
                source: edge.source.clone(),
                target: edge.target.clone(),
                kind: edge.kind.clone(),
                ends,
            });
        }

        let hierarchy = Hierarchy::build(tree, |id| index.contains_key(id), policy, &mut report)?;

        tracing::info!(
            items = items.len(),
            relationships = relationships.len(),
            hierarchy = hierarchy.len(),
            dropped = report.dropped.len(),
            "entity store loaded"
        );

        Ok(Self {
            items,
            index,
            relationships,
            neighbors,
            incident,
            categories,
            hierarchy,
            report,
        })
    }

    pub fn lookup(&self, id: &str) -> VisResult<&Item> {
        self.slot(id).map(|i| &self.items[i])
    }

    pub fn slot(&self, id: &str) -> VisResult<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| VisError::not_found(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Ids directly connected to `id` by any relationship.
    pub fn neighbors(&self, id: &str) -> VisResult<BTreeSet<&ItemId>> {
        let slot = self.slot(id)?;
        Ok(self.neighbors[slot]
            .iter()
            .map(|&n| &self.items[n].id)
            .collect())
    }

    /// Symmetric; unknown ids are never adjacent.
    pub fn adjacent(&self, a: &str, b: &str) -> bool {
        match (self.index.get(a), self.index.get(b)) {
            (Some(&a), Some(&b)) => self.neighbors[a].contains(&b),
            _ => false,
        }
    }

    /// Relationships touching `id`, in load order.
    pub fn incident(&self, id: &str) -> VisResult<impl Iterator<Item = &Relationship> + '_> {
        let slot = self.slot(id)?;
        Ok(self.incident[slot].iter().map(|&r| &self.relationships[r]))
    }

    /// Distinct relationship types on edges touching `id`.
    pub fn incident_categories(&self, id: &str) -> VisResult<BTreeSet<&str>> {
        Ok(self.incident(id)?.map(|r| r.kind.as_str()).collect())
    }

    /// Items touching at least one relationship of type `category`.
    pub fn category_members(&self, category: &str) -> BTreeSet<&ItemId> {
        self.relationships
            .iter()
            .filter(|r| r.kind == category)
            .flat_map(|r| [&r.source, &r.target])
            .collect()
    }

    /// Relationship types in order of first appearance.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn root(&self) -> &HierarchyNode {
        self.hierarchy.root()
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn integrity_report(&self) -> &IntegrityReport {
        &self.report
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/entity.rs"]
mod tests;
