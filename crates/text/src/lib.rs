//! # Labeler Text
//!
//! Text-side collaborators of the labeling pipeline.
//!
//! - **Normalization** - lowercase, collapse non-alphanumerics, tokenize, stem
//! - **Example source** - header-addressed CSV of (category, query) rows
//! - **Synonyms** - nearest-neighbor lookups filtered by a similarity threshold
//!
//! ## Example
//!
//! ```rust
//! use labeler_text::{Normalizer, StemmerKind};
//!
//! let normalizer = Normalizer::new(StemmerKind::Porter).unwrap();
//! assert_eq!(normalizer.normalize("Charging Cables!!"), "charg cabl");
//! ```

mod error;
mod normalize;
mod source;
mod synonyms;

pub use error::{Result, TextError};
pub use normalize::{
    Normalizer, NoopStemmer, PluralStemmer, PorterStemmer, Stemmer, StemmerKind,
};
pub use source::{load_examples, read_examples, ExampleColumns, RawExample};
pub use synonyms::{
    read_word_list, Neighbor, NeighborSource, NeighborTable, SynonymGenerator,
    DEFAULT_SIMILARITY_THRESHOLD,
};
