use crate::emit::{Emitter, LabelRecord};
use crate::engine::{RollupEngine, RollupReport};
use crate::error::Result;
use crate::example::Example;
use labeler_taxonomy::Taxonomy;
use labeler_text::{Normalizer, RawExample};
use serde::Serialize;
use std::collections::HashSet;

/// Counters for one labeling run.
///
/// `loaded == dropped_on_load + emitted + excluded_root + excluded_unknown`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelingSummary {
    pub loaded: usize,
    /// Rows whose initial category was unknown or the root
    pub dropped_on_load: usize,
    pub min_support: usize,
    pub rounds: usize,
    pub promotions: usize,
    pub moved: usize,
    /// Rounds that found the root itself below `min_support`
    pub root_shortfalls: usize,
    pub converged: bool,
    pub emitted: usize,
    pub excluded_root: usize,
    pub excluded_unknown: usize,
    /// Distinct labels among emitted records
    pub labels: usize,
}

#[derive(Debug, Clone)]
pub struct LabelingOutcome {
    pub records: Vec<LabelRecord>,
    pub report: RollupReport,
    pub summary: LabelingSummary,
}

/// Everything one labeling batch needs, built once and shared by each stage
#[derive(Debug)]
pub struct LabelingContext {
    taxonomy: Taxonomy,
    normalizer: Normalizer,
    engine: RollupEngine,
    emitter: Emitter,
}

impl LabelingContext {
    pub fn new(taxonomy: Taxonomy, normalizer: Normalizer, engine: RollupEngine, emitter: Emitter) -> Self {
        Self {
            taxonomy,
            normalizer,
            engine,
            emitter,
        }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn engine(&self) -> &RollupEngine {
        &self.engine
    }

    /// Keep rows on non-root taxonomy members and normalize their text.
    ///
    /// Returns the examples and the number of rows dropped.
    pub fn prepare(&self, raw: Vec<RawExample>) -> (Vec<Example>, usize) {
        let loaded = raw.len();
        let examples: Vec<Example> = raw
            .into_iter()
            .filter(|row| self.taxonomy.is_labelable(&row.category))
            .map(|row| Example::new(row.category, self.normalizer.normalize(&row.text)))
            .collect();
        let dropped = loaded - examples.len();
        if dropped > 0 {
            log::info!("Dropped {dropped} of {loaded} examples with unknown or root categories");
        }
        (examples, dropped)
    }

    /// Prepare, roll up and emit one batch
    pub fn label(&self, raw: Vec<RawExample>) -> Result<LabelingOutcome> {
        let loaded = raw.len();
        let (mut examples, dropped_on_load) = self.prepare(raw);

        let report = self.engine.rollup(&mut examples, &self.taxonomy)?;
        let emission = self.emitter.emit(&examples, &self.taxonomy);

        let labels = emission
            .records
            .iter()
            .map(|r| r.category.as_str())
            .collect::<HashSet<_>>()
            .len();

        let summary = LabelingSummary {
            loaded,
            dropped_on_load,
            min_support: self.engine.min_support(),
            rounds: report.rounds,
            promotions: report.promotions.len(),
            moved: report.moved(),
            root_shortfalls: report.root_shortfalls.len(),
            converged: report.converged,
            emitted: emission.records.len(),
            excluded_root: emission.excluded_root,
            excluded_unknown: emission.excluded_unknown,
            labels,
        };

        if summary.root_shortfalls > 0 {
            log::warn!(
                "Root {} stayed below min support {} in {} rounds",
                self.taxonomy.root().id,
                summary.min_support,
                summary.root_shortfalls
            );
        }
        log::info!(
            "Labeled {} of {} examples across {} labels (min support {})",
            summary.emitted,
            summary.loaded,
            summary.labels,
            summary.min_support
        );

        Ok(LabelingOutcome {
            records: emission.records,
            report,
            summary,
        })
    }
}
