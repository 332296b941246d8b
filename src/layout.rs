pub(crate) mod force;
pub(crate) mod ordinal;
pub(crate) mod tree;

/// Which geometric interpretation currently owns item coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// Title card; items are hidden and nothing writes coordinates.
    #[default]
    None,
    Force,
    Tree,
    HorizontalList,
    VerticalList,
}
