use labeler_taxonomy::TaxonomyError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RollupError>;

#[derive(Error, Debug)]
pub enum RollupError {
    /// Parent resolution failed for a category that holds examples
    #[error("Taxonomy error: {0}")]
    Taxonomy(#[from] TaxonomyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
