//! # Labeler Rollup
//!
//! Guarantees a minimum number of examples behind every emitted label by
//! replacing under-populated categories with their parents.
//!
//! ## Pipeline
//!
//! ```text
//! RawExample[]
//!     │
//!     ├──> LabelingContext::prepare
//!     │      ├─ Drop unknown / root categories
//!     │      └─ Normalize text
//!     │
//!     ├──> RollupEngine (≤ max_depth rounds)
//!     │      ├─ SupportIndex::compute   (fresh every round)
//!     │      ├─ Collect categories below min_support
//!     │      └─ Move all their examples to the parent at once
//!     │
//!     └──> Emitter
//!            ├─ Keep non-root taxonomy members
//!            └─ LabelRecord[] → LabelWriter ("__label__<id> <text>")
//! ```
//!
//! ## Example
//!
//! ```rust
//! use labeler_rollup::{Example, RollupEngine};
//! use labeler_taxonomy::TaxonomyBuilder;
//!
//! let mut builder = TaxonomyBuilder::new();
//! builder.add_path(&["root", "A", "A1"]).unwrap();
//! builder.add_path(&["root", "A", "A2"]).unwrap();
//! let taxonomy = builder.build().unwrap();
//!
//! let mut examples = vec![
//!     Example::new("A1", "tv"),
//!     Example::new("A1", "hdtv"),
//!     Example::new("A2", "remote"),
//! ];
//! let report = RollupEngine::new(3).rollup(&mut examples, &taxonomy).unwrap();
//!
//! assert!(examples.iter().all(|e| e.category() == "A"));
//! assert_eq!(report.rounds, 2);
//! ```

mod context;
mod emit;
mod engine;
mod error;
mod example;
mod support;

pub use context::{LabelingContext, LabelingOutcome, LabelingSummary};
pub use emit::{Emission, Emitter, LabelRecord, LabelWriter, OutputFormat, DEFAULT_LABEL_PREFIX};
pub use engine::{Promotion, RollupEngine, RollupReport, RootShortfall};
pub use error::{Result, RollupError};
pub use example::Example;
pub use support::SupportIndex;
