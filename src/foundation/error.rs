/// Crate-wide result alias.
pub type VisResult<T> = Result<T, VisError>;

/// Every failure the engine can report.
///
/// Outside of scene export nothing here is transient: these are data-integrity faults in the
/// supplied datasets or programming errors in the caller.
#[derive(thiserror::Error, Debug)]
pub enum VisError {
    /// An id was looked up that the entity store does not hold.
    #[error("not found: no item with id '{id}'")]
    NotFound {
        /// The missing id.
        id: String,
    },

    /// The datasets disagree with each other (dangling edge, duplicate id, hierarchy id that is
    /// not an item).
    #[error("data integrity error: {0}")]
    DataIntegrity(String),

    /// `activate`/`update` addressed a section that does not exist.
    #[error("section index {index} is out of range (section count {len})")]
    SectionOutOfRange {
        /// Requested index.
        index: i64,
        /// Number of registered sections.
        len: usize,
    },

    /// Configuration or argument rejected before use.
    #[error("validation error: {0}")]
    Validation(String),

    /// Dataset or config text could not be decoded.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Scene export failed.
    #[error("render error: {0}")]
    Render(String),

    /// Anything else, with its source preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VisError {
    /// Build a [`VisError::NotFound`] value.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Build a [`VisError::DataIntegrity`] value.
    pub fn integrity(msg: impl Into<String>) -> Self {
        Self::DataIntegrity(msg.into())
    }

    /// Build a [`VisError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`VisError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`VisError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

impl From<serde_json::Error> for VisError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
