use thiserror::Error;

/// Result type for taxonomy operations
pub type Result<T> = std::result::Result<T, TaxonomyError>;

/// Errors raised while building or querying the category tree
#[derive(Error, Debug)]
pub enum TaxonomyError {
    /// The id is not a member of the tree
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// The id is the root, which has no parent to roll up to
    #[error("Cannot roll up root category: {0}")]
    RootRollupAttempted(String),

    /// Structural problem found while building the tree
    #[error("Malformed taxonomy: {0}")]
    MalformedTaxonomy(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),
}

impl TaxonomyError {
    /// Create a malformed taxonomy error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedTaxonomy(msg.into())
    }

    /// Create an unknown category error
    pub fn unknown(id: impl Into<String>) -> Self {
        Self::UnknownCategory(id.into())
    }
}
