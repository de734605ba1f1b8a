//! # Labeler Taxonomy
//!
//! Fixed category tree used to roll under-populated labels up to their
//! ancestors.
//!
//! ## Architecture
//!
//! ```text
//! categories.xml / categories.json
//!     │
//!     ├──> Source (roxmltree / serde)
//!     │      └─ category entries with root-to-leaf paths
//!     │
//!     ├──> TaxonomyBuilder
//!     │      ├─ Collect parent links
//!     │      ├─ Reject conflicting parents, dangling parents, extra roots
//!     │      └─ Detect cycles, compute depths
//!     │
//!     └──> Taxonomy (petgraph, immutable)
//!            ├─ parent_of(id)   O(1)
//!            └─ max_depth()     rollup round bound
//! ```
//!
//! ## Example
//!
//! ```rust
//! use labeler_taxonomy::TaxonomyBuilder;
//!
//! let mut builder = TaxonomyBuilder::new();
//! builder.add_root("root").unwrap();
//! builder.add_child("A", "root").unwrap();
//! builder.add_child("A1", "A").unwrap();
//! let taxonomy = builder.build().unwrap();
//!
//! assert_eq!(taxonomy.parent_of("A1").unwrap(), "A");
//! assert_eq!(taxonomy.max_depth(), 2);
//! ```

mod builder;
mod error;
mod source;
mod types;
mod xml;

pub use builder::TaxonomyBuilder;
pub use error::{Result, TaxonomyError};
pub use source::{
    load_taxonomy, parse_taxonomy, RawCategory, RawPathEntry, TaxonomyDocument, TaxonomyFormat,
};
pub use types::{Ancestors, Category, Taxonomy};
pub use xml::parse_xml_document;
