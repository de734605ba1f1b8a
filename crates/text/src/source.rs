use crate::error::{Result, TextError};
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// One training row as read from disk, before normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawExample {
    pub category: String,
    pub text: String,
}

impl RawExample {
    pub fn new(category: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            text: text.into(),
        }
    }
}

/// Header names of the columns to read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleColumns {
    pub category: String,
    pub text: String,
}

impl Default for ExampleColumns {
    fn default() -> Self {
        Self {
            category: "category".to_string(),
            text: "query".to_string(),
        }
    }
}

/// Read (category, text) rows from a CSV document with a header row.
///
/// Columns are found by header name, so their order and any extra columns do
/// not matter. A UTF-8 byte order mark before the header is ignored.
pub fn read_examples<R: Read>(reader: R, columns: &ExampleColumns) -> Result<Vec<RawExample>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let header = reader.headers()?.clone();
    if header.is_empty() {
        return Err(TextError::csv(1, "missing header row"));
    }

    let category_idx = column_index(&header, &columns.category)?;
    let text_idx = column_index(&header, &columns.text)?;
    let needed = category_idx.max(text_idx) + 1;

    let mut examples = Vec::new();
    let mut record = StringRecord::new();
    while reader.read_record(&mut record)? {
        let (Some(category), Some(text)) = (record.get(category_idx), record.get(text_idx)) else {
            let line = record.position().map_or(0, |pos| pos.line() as usize);
            return Err(TextError::csv(
                line,
                format!("expected at least {needed} fields, found {}", record.len()),
            ));
        };
        examples.push(RawExample::new(category, text));
    }

    log::debug!("Read {} examples", examples.len());
    Ok(examples)
}

/// Load examples from a CSV file
pub fn load_examples(path: &Path, columns: &ExampleColumns) -> Result<Vec<RawExample>> {
    let file = File::open(path)?;
    read_examples(BufReader::new(file), columns)
}

fn column_index(header: &StringRecord, name: &str) -> Result<usize> {
    header
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        .ok_or_else(|| TextError::MissingColumn(name.to_string()))
}
