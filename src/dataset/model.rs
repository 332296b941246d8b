use crate::foundation::{
    core::ItemId,
    error::{VisError, VisResult},
};

/// Graph dataset: the item catalog plus typed relationships.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct GraphDataset {
    pub nodes: Vec<ItemRecord>,
    #[serde(default)]
    pub edges: Vec<LinkRecord>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ItemRecord {
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "img")]
    pub image: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

/// One `{source, target, type}` record. Used for both graph edges and hierarchy links.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LinkRecord {
    pub source: ItemId,
    pub target: ItemId,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Hierarchy dataset: a rooted tree literal plus the typed parent→child links of that tree.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct HierarchyDataset {
    pub source: TreeLiteral,
    #[serde(default)]
    pub links: Vec<LinkRecord>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TreeLiteral {
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "img")]
    pub image: String,
    #[serde(default)]
    pub children: Vec<TreeLiteral>,
}

impl TreeLiteral {
    pub fn leaf(id: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(id),
            name: String::new(),
            image: String::new(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<TreeLiteral>) -> Self {
        self.children = children;
        self
    }

    /// Total node count, root included.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(TreeLiteral::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl GraphDataset {
    pub fn from_json_str(s: &str) -> VisResult<Self> {
        let ds: Self = serde_json::from_str(s)?;
        ds.validate()?;
        Ok(ds)
    }

    /// Shape checks only; cross-references are checked when the entity store loads.
    pub fn validate(&self) -> VisResult<()> {
        for node in &self.nodes {
            if node.id.as_str().trim().is_empty() {
                return Err(VisError::validation("graph node id must be non-empty"));
            }
        }
        Ok(())
    }
}

impl HierarchyDataset {
    pub fn from_json_str(s: &str) -> VisResult<Self> {
        let ds: Self = serde_json::from_str(s)?;
        if ds.source.id.as_str().trim().is_empty() {
            return Err(VisError::validation("hierarchy root id must be non-empty"));
        }
        Ok(ds)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dataset/model.rs"]
mod tests;
