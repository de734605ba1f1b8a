use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

/// Similarity at or above which a neighbor counts as a synonym
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.75;

/// Word close to a query word in embedding space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub word: String,
    pub similarity: f32,
}

/// Nearest-neighbor lookup, usually backed by a word embedding model
pub trait NeighborSource {
    fn nearest_neighbors(&self, word: &str) -> Result<Vec<Neighbor>>;
}

/// Precomputed neighbor lists keyed by word
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NeighborTable {
    neighbors: HashMap<String, Vec<Neighbor>>,
}

impl NeighborTable {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn insert(&mut self, word: impl Into<String>, neighbors: Vec<Neighbor>) {
        self.neighbors.insert(word.into(), neighbors);
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }
}

impl NeighborSource for NeighborTable {
    fn nearest_neighbors(&self, word: &str) -> Result<Vec<Neighbor>> {
        match self.neighbors.get(word) {
            Some(list) => Ok(list.clone()),
            None => {
                log::debug!("No neighbors recorded for '{word}'");
                Ok(Vec::new())
            }
        }
    }
}

/// Filters nearest neighbors down to synonyms
#[derive(Debug, Clone, Copy)]
pub struct SynonymGenerator {
    threshold: f32,
}

impl Default for SynonymGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

impl SynonymGenerator {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Neighbors of `word` whose similarity meets the threshold, in source order
    pub fn synonyms<S: NeighborSource + ?Sized>(&self, source: &S, word: &str) -> Result<Vec<String>> {
        Ok(source
            .nearest_neighbors(word)?
            .into_iter()
            .filter(|n| n.similarity >= self.threshold)
            .map(|n| n.word)
            .collect())
    }

    /// Write one comma-joined synonym line per word that has any.
    ///
    /// Returns the number of lines written.
    pub fn write_synonyms<S, I, W>(&self, source: &S, words: I, mut sink: W) -> Result<usize>
    where
        S: NeighborSource + ?Sized,
        I: IntoIterator,
        I::Item: AsRef<str>,
        W: Write,
    {
        let mut written = 0;
        for word in words {
            let word = word.as_ref().trim();
            if word.is_empty() {
                continue;
            }
            let synonyms = self.synonyms(source, word)?;
            if synonyms.is_empty() {
                continue;
            }
            writeln!(sink, "{}", synonyms.join(","))?;
            written += 1;
        }
        sink.flush()?;
        Ok(written)
    }
}

/// One word per line; blank lines are dropped
pub fn read_word_list<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut words = Vec::new();
    for line in BufReader::new(reader).lines() {
        let line = line?;
        let word = line.trim();
        if !word.is_empty() {
            words.push(word.to_string());
        }
    }
    Ok(words)
}
