use std::collections::HashMap;

use crate::{
    dataset::model::{HierarchyDataset, LinkRecord, TreeLiteral},
    foundation::{
        core::ItemId,
        error::{VisError, VisResult},
    },
    store::entity::{IntegrityPolicy, IntegrityReport},
};

/// One node of the derived spanning tree. Children are kept in dataset order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HierarchyNode {
    pub item: ItemId,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub depth: usize,
}

/// Rooted tree over a subset of the catalog's items, stored as an arena.
///
/// Slot 0 is always the root. Node slots are assigned in pre-order, so iterating the arena is a
/// pre-order walk.
#[derive(Clone, Debug)]
pub struct Hierarchy {
    nodes: Vec<HierarchyNode>,
    by_id: HashMap<ItemId, usize>,
    link_kinds: HashMap<(usize, usize), String>,
    preorder: Vec<ItemId>,
}

impl Hierarchy {
    /// Derive the tree from its dataset, keeping only ids for which `is_item` holds.
    #[tracing::instrument(skip_all, fields(root = %dataset.source.id))]
    pub fn build(
        dataset: &HierarchyDataset,
        is_item: impl Fn(&ItemId) -> bool,
        policy: IntegrityPolicy,
        report: &mut IntegrityReport,
    ) -> VisResult<Self> {
        let root = &dataset.source;
        if !is_item(&root.id) {
            return Err(VisError::integrity(format!(
                "hierarchy root '{}' is not a catalog item",
                root.id
            )));
        }

        let mut h = Self {
            nodes: Vec::with_capacity(root.len()),
            by_id: HashMap::new(),
            link_kinds: HashMap::new(),
            preorder: Vec::new(),
        };

        // Explicit stack keeps deep literals off the call stack. Children are pushed in reverse so
        // they pop in dataset order.
        let mut stack: Vec<(&TreeLiteral, Option<usize>, usize)> = vec![(root, None, 0)];
        while let Some((lit, parent, depth)) = stack.pop() {
            if !is_item(&lit.id) {
                policy.check(
                    report,
                    VisError::not_found(lit.id.as_str()),
                    format!("hierarchy node '{}' (subtree dropped)", lit.id),
                )?;
                continue;
            }
            if h.by_id.contains_key(&lit.id) {
                policy.check(
                    report,
                    VisError::integrity(format!("hierarchy repeats id '{}'", lit.id)),
                    format!("duplicate hierarchy node '{}' (subtree dropped)", lit.id),
                )?;
                continue;
            }

            let idx = h.nodes.len();
            h.nodes.push(HierarchyNode {
                item: lit.id.clone(),
                parent,
                children: Vec::new(),
                depth,
            });
            h.by_id.insert(lit.id.clone(), idx);
            h.preorder.push(lit.id.clone());
            if let Some(p) = parent {
                h.nodes[p].children.push(idx);
            }

            for child in lit.children.iter().rev() {
                stack.push((child, Some(idx), depth + 1));
            }
        }

        for link in &dataset.links {
            h.attach_link_kind(link, &is_item, policy, report)?;
        }

        tracing::debug!(nodes = h.nodes.len(), "hierarchy derived");
        Ok(h)
    }

    fn attach_link_kind(
        &mut self,
        link: &LinkRecord,
        is_item: &impl Fn(&ItemId) -> bool,
        policy: IntegrityPolicy,
        report: &mut IntegrityReport,
    ) -> VisResult<()> {
        for end in [&link.source, &link.target] {
            if !is_item(end) {
                return policy.check(
                    report,
                    VisError::not_found(end.as_str()),
                    format!("hierarchy link {} -> {}", link.source, link.target),
                );
            }
        }

        let pair = self
            .index_of(link.source.as_str())
            .zip(self.index_of(link.target.as_str()))
            .filter(|&(p, c)| self.nodes[c].parent == Some(p));
        match pair {
            Some(key) => {
                self.link_kinds.insert(key, link.kind.clone());
                Ok(())
            }
            None => policy.check(
                report,
                VisError::integrity(format!(
                    "hierarchy link {} -> {} is not a parent/child pair of the tree",
                    link.source, link.target
                )),
                format!("hierarchy link {} -> {}", link.source, link.target),
            ),
        }
    }

    pub fn root(&self) -> &HierarchyNode {
        &self.nodes[0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[HierarchyNode] {
        &self.nodes
    }

    pub fn node(&self, idx: usize) -> &HierarchyNode {
        &self.nodes[idx]
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn get(&self, id: &str) -> VisResult<&HierarchyNode> {
        self.index_of(id)
            .map(|i| &self.nodes[i])
            .ok_or_else(|| VisError::not_found(id))
    }

    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Ids parent-before-children, siblings in dataset order. Both list layouts use this order.
    pub fn preorder(&self) -> &[ItemId] {
        &self.preorder
    }

    /// Self first, root last.
    pub fn ancestors(&self, id: &str) -> VisResult<Vec<&ItemId>> {
        let mut cur = Some(self.index_of(id).ok_or_else(|| VisError::not_found(id))?);
        let mut out = Vec::new();
        while let Some(i) = cur {
            out.push(&self.nodes[i].item);
            cur = self.nodes[i].parent;
        }
        Ok(out)
    }

    /// True when `ancestor` lies on the root-to-self path of `descendant` (a node is its own
    /// ancestor). Unknown ids are never related.
    pub fn is_ancestor_of(&self, ancestor: &str, descendant: &str) -> bool {
        let (Some(a), Some(mut cur)) = (self.index_of(ancestor), self.index_of(descendant)) else {
            return false;
        };
        loop {
            if cur == a {
                return true;
            }
            match self.nodes[cur].parent {
                Some(p) => cur = p,
                None => return false,
            }
        }
    }

    /// Symmetric closure of [`Hierarchy::is_ancestor_of`].
    pub fn related(&self, a: &str, b: &str) -> bool {
        self.is_ancestor_of(a, b) || self.is_ancestor_of(b, a)
    }

    /// Type label of the parent→child link, when the dataset supplied one.
    pub fn link_kind(&self, parent: usize, child: usize) -> Option<&str> {
        self.link_kinds.get(&(parent, child)).map(String::as_str)
    }

    /// Every parent→child pair, in pre-order of the child.
    pub fn links(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.parent.map(|p| (p, i)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/hierarchy.rs"]
mod tests;
