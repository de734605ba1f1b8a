use crate::error::Result;
use crate::example::Example;
use crate::support::SupportIndex;
use labeler_taxonomy::{Taxonomy, TaxonomyError};
use serde::Serialize;
use std::collections::HashMap;

/// One category moved to its parent during a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Promotion {
    /// 1-based round number
    pub round: usize,
    pub from: String,
    pub to: String,
    /// Examples moved
    pub examples: usize,
}

/// A round in which the root itself was below the threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootShortfall {
    /// 1-based round number
    pub round: usize,
    pub root: String,
    /// Examples held by the root at the start of the round
    pub examples: usize,
}

/// What a rollup run did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RollupReport {
    /// Rounds executed, never more than the taxonomy's max depth
    pub rounds: usize,
    pub promotions: Vec<Promotion>,
    /// Rounds that found the root deficient; the root has no parent, so its
    /// examples stay where they are
    pub root_shortfalls: Vec<RootShortfall>,
    /// Examples left on the root because their branch never met the threshold
    pub root_examples: usize,
    /// True when no non-root category is left below the threshold
    pub converged: bool,
}

impl RollupReport {
    /// Total number of example moves
    pub fn moved(&self) -> usize {
        self.promotions.iter().map(|p| p.examples).sum()
    }
}

/// Promotes categories below `min_support` to their parents, one level per round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollupEngine {
    min_support: usize,
}

impl Default for RollupEngine {
    fn default() -> Self {
        Self::new(1)
    }
}

impl RollupEngine {
    pub fn new(min_support: usize) -> Self {
        Self { min_support }
    }

    pub fn min_support(&self) -> usize {
        self.min_support
    }

    /// Roll examples up until every non-root category meets the threshold or
    /// `taxonomy.max_depth()` rounds have run.
    ///
    /// All deficient categories of a round are promoted together, against the
    /// support snapshot taken at the start of that round. A deficient root is
    /// left in place. A deficient category missing from the taxonomy aborts
    /// the run with `UnknownCategory`; a deficient root is recorded in
    /// `root_shortfalls` instead.
    pub fn rollup(&self, examples: &mut [Example], taxonomy: &Taxonomy) -> Result<RollupReport> {
        let mut report = RollupReport::default();
        let mut changed = true;

        while changed && report.rounds < taxonomy.max_depth() {
            let round = report.rounds + 1;
            let support = SupportIndex::compute(examples);
            changed = false;

            let mut moves: HashMap<String, String> = HashMap::new();
            for (category, count) in support.deficient(self.min_support) {
                match taxonomy.parent_of(category) {
                    Ok(parent) => {
                        moves.insert(category.to_string(), parent.to_string());
                        report.promotions.push(Promotion {
                            round,
                            from: category.to_string(),
                            to: parent.to_string(),
                            examples: count,
                        });
                        changed = true;
                    }
                    Err(TaxonomyError::RootRollupAttempted(root)) => {
                        log::debug!(
                            "Round {round}: root {root} holds {count} examples below support {}",
                            self.min_support
                        );
                        report.root_shortfalls.push(RootShortfall {
                            round,
                            root,
                            examples: count,
                        });
                    }
                    Err(err) => return Err(err.into()),
                }
            }

            let moved = apply_moves(examples, &moves);
            log::debug!(
                "Round {round}: promoted {} categories, moved {moved} examples",
                moves.len()
            );
            report.rounds = round;
        }

        let support = SupportIndex::compute(examples);
        report.root_examples = support.count(&taxonomy.root().id);
        report.converged = support
            .deficient(self.min_support)
            .iter()
            .all(|(category, _)| taxonomy.is_root(category));

        log::info!(
            "Rollup finished after {} rounds: {} promotions, {} examples moved, {} left at root",
            report.rounds,
            report.promotions.len(),
            report.moved(),
            report.root_examples
        );

        Ok(report)
    }
}

/// Reassign every example whose current category is a key of `moves`.
///
/// Lookups use the category held before this call, so an example moves at
/// most one level per round.
fn apply_moves(examples: &mut [Example], moves: &HashMap<String, String>) -> usize {
    if moves.is_empty() {
        return 0;
    }
    let mut moved = 0;
    for example in examples.iter_mut() {
        if let Some(parent) = moves.get(example.category()) {
            example.reassign(parent);
            moved += 1;
        }
    }
    moved
}
