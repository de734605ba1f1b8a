use crate::error::Result;
use crate::example::Example;
use labeler_taxonomy::Taxonomy;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::Write;

/// Prefix fastText uses to recognise labels
pub const DEFAULT_LABEL_PREFIX: &str = "__label__";

/// Training record for one example
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub category: String,
    /// Prefixed label (e.g., "__label__abcat0101001")
    pub label: String,
    pub text: String,
}

impl LabelRecord {
    /// `<label> <text>`, before escaping
    pub fn line(&self) -> String {
        format!("{} {}", self.label, self.text)
    }
}

/// Records plus the examples left out of them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Emission {
    pub records: Vec<LabelRecord>,
    /// Examples tagged with the root category
    pub excluded_root: usize,
    /// Examples tagged with an id outside the taxonomy
    pub excluded_unknown: usize,
}

impl Emission {
    pub fn excluded(&self) -> usize {
        self.excluded_root + self.excluded_unknown
    }
}

/// Turns rolled-up examples into label records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitter {
    label_prefix: String,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL_PREFIX)
    }
}

impl Emitter {
    pub fn new(label_prefix: impl Into<String>) -> Self {
        Self {
            label_prefix: label_prefix.into(),
        }
    }

    pub fn label_prefix(&self) -> &str {
        &self.label_prefix
    }

    /// Emit a record for every example on a non-root taxonomy member; skip the rest
    pub fn emit(&self, examples: &[Example], taxonomy: &Taxonomy) -> Emission {
        let mut emission = Emission::default();

        for example in examples {
            let category = example.category();
            if taxonomy.is_root(category) {
                emission.excluded_root += 1;
                continue;
            }
            if !taxonomy.contains(category) {
                emission.excluded_unknown += 1;
                continue;
            }
            emission.records.push(LabelRecord {
                category: category.to_string(),
                label: format!("{}{}", self.label_prefix, category),
                text: example.text().to_string(),
            });
        }

        if emission.excluded() > 0 {
            log::debug!(
                "Excluded {} examples at the root and {} with unknown categories",
                emission.excluded_root,
                emission.excluded_unknown
            );
        }

        emission
    }
}

/// Field delimiter and escape character of the output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFormat {
    pub delimiter: char,
    pub escape: char,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self {
            delimiter: '|',
            escape: '\\',
        }
    }
}

impl OutputFormat {
    fn needs_escape(&self, c: char) -> bool {
        c == self.delimiter || c == self.escape || matches!(c, '"' | '\r' | '\n')
    }

    /// Prefix every special character with the escape character; nothing is quoted
    pub fn escape_line<'a>(&self, line: &'a str) -> Cow<'a, str> {
        if !line.chars().any(|c| self.needs_escape(c)) {
            return Cow::Borrowed(line);
        }
        let mut escaped = String::with_capacity(line.len() + 8);
        for c in line.chars() {
            if self.needs_escape(c) {
                escaped.push(self.escape);
            }
            escaped.push(c);
        }
        Cow::Owned(escaped)
    }
}

/// Writes one record per line
pub struct LabelWriter<W: Write> {
    inner: W,
    format: OutputFormat,
    written: usize,
}

impl<W: Write> LabelWriter<W> {
    pub fn new(inner: W, format: OutputFormat) -> Self {
        Self {
            inner,
            format,
            written: 0,
        }
    }

    pub fn write_record(&mut self, record: &LabelRecord) -> Result<()> {
        let line = record.line();
        writeln!(self.inner, "{}", self.format.escape_line(&line))?;
        self.written += 1;
        Ok(())
    }

    pub fn write_all<'a, I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a LabelRecord>,
    {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// Flush and return the number of records written
    pub fn finish(mut self) -> Result<usize> {
        self.inner.flush()?;
        Ok(self.written)
    }
}
