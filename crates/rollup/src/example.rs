use serde::{Deserialize, Serialize};

/// One training instance: a category id and its normalized query text.
///
/// The text is fixed at construction; only the rollup engine may move the
/// example to another category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    category: String,
    text: String,
}

impl Example {
    pub fn new(category: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            text: text.into(),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn reassign(&mut self, category: &str) {
        self.category.clear();
        self.category.push_str(category);
    }
}
