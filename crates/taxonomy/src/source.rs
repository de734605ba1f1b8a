use crate::builder::TaxonomyBuilder;
use crate::error::{Result, TaxonomyError};
use crate::types::Taxonomy;
use crate::xml::parse_xml_document;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Encoding of a category export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaxonomyFormat {
    /// `<categories><category><id/><path>…</path></category></categories>`
    #[default]
    Xml,
    /// `{"categories": [{"id": …, "path": […]}]}`
    Json,
}

impl TaxonomyFormat {
    /// Pick the format from a file extension; anything but `.json` is XML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Xml,
        }
    }
}

/// On-disk category export
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxonomyDocument {
    pub categories: Vec<RawCategory>,
}

/// One exported category.
///
/// Either `path` (root first, the category itself last) or `parent` locates
/// the category; an entry with neither declares the root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCategory {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub parent: Option<String>,

    #[serde(default)]
    pub path: Vec<RawPathEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPathEntry {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,
}

impl TaxonomyDocument {
    /// Validate and freeze the document into a tree
    pub fn into_taxonomy(self) -> Result<Taxonomy> {
        let mut builder = TaxonomyBuilder::new();

        for entry in &self.categories {
            if entry.path.is_empty() {
                match &entry.parent {
                    Some(parent) => builder.add_child(&entry.id, parent)?,
                    None => builder.add_root(&entry.id)?,
                }
            } else {
                let last = &entry.path[entry.path.len() - 1];
                if last.id != entry.id {
                    return Err(TaxonomyError::malformed(format!(
                        "path of category {} ends at {}",
                        entry.id, last.id
                    )));
                }
                let ids: Vec<&str> = entry.path.iter().map(|p| p.id.as_str()).collect();
                builder.add_path(&ids)?;
                if let Some(parent) = &entry.parent {
                    let from_path = ids.len().checked_sub(2).map(|i| ids[i]);
                    if from_path != Some(parent.as_str()) {
                        return Err(TaxonomyError::malformed(format!(
                            "category {} has conflicting parents {} and {}",
                            entry.id,
                            from_path.unwrap_or("<none>"),
                            parent
                        )));
                    }
                }
                for step in &entry.path {
                    if let Some(name) = &step.name {
                        builder.set_name(&step.id, name);
                    }
                }
            }

            if let Some(name) = &entry.name {
                builder.set_name(&entry.id, name);
            }
        }

        log::debug!(
            "Parsed {} category entries into {} distinct ids",
            self.categories.len(),
            builder.len()
        );

        builder.build()
    }
}

/// Parse a category export from any reader
pub fn parse_taxonomy<R: Read>(mut reader: R, format: TaxonomyFormat) -> Result<Taxonomy> {
    let document: TaxonomyDocument = match format {
        TaxonomyFormat::Json => serde_json::from_reader(reader)?,
        TaxonomyFormat::Xml => {
            let mut text = String::new();
            reader.read_to_string(&mut text)?;
            parse_xml_document(&text)?
        }
    };
    document.into_taxonomy()
}

/// Load a category export from disk, choosing the format by extension
pub fn load_taxonomy(path: &Path) -> Result<Taxonomy> {
    let format = TaxonomyFormat::from_path(path);
    log::debug!("Loading {:?} taxonomy from {}", format, path.display());
    let file = File::open(path)?;
    parse_taxonomy(BufReader::new(file), format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_entries_declare_intermediate_categories() {
        let json = r#"{
            "categories": [
                {"id": "cat00000", "name": "Best Buy", "path": [{"id": "cat00000", "name": "Best Buy"}]},
                {"id": "abcat0100000", "path": [
                    {"id": "cat00000"}, {"id": "abcat0010000", "name": "Gift Center"}, {"id": "abcat0100000"}
                ]}
            ]
        }"#;

        let taxonomy = parse_taxonomy(json.as_bytes(), TaxonomyFormat::Json).unwrap();
        assert_eq!(taxonomy.len(), 3);
        assert_eq!(taxonomy.parent_of("abcat0010000").unwrap(), "cat00000");
        assert_eq!(
            taxonomy.get("abcat0010000").and_then(|c| c.name.as_deref()),
            Some("Gift Center")
        );
        assert_eq!(taxonomy.max_depth(), 2);
    }

    #[test]
    fn parent_entries() {
        let json = r#"{"categories": [
            {"id": "root"},
            {"id": "A", "parent": "root"},
            {"id": "A1", "parent": "A"}
        ]}"#;
        let taxonomy = parse_taxonomy(json.as_bytes(), TaxonomyFormat::Json).unwrap();
        assert_eq!(taxonomy.parent_of("A1").unwrap(), "A");
    }

    #[test]
    fn rejects_path_not_ending_at_entry() {
        let json = r#"{"categories": [
            {"id": "A", "path": [{"id": "root"}, {"id": "B"}]}
        ]}"#;
        let err = parse_taxonomy(json.as_bytes(), TaxonomyFormat::Json).unwrap_err();
        assert!(matches!(err, TaxonomyError::MalformedTaxonomy(msg) if msg.contains("ends at B")));
    }

    #[test]
    fn rejects_path_disagreeing_with_parent() {
        let json = r#"{"categories": [
            {"id": "A1", "parent": "B", "path": [{"id": "root"}, {"id": "A"}, {"id": "A1"}]}
        ]}"#;
        let err = parse_taxonomy(json.as_bytes(), TaxonomyFormat::Json).unwrap_err();
        assert!(matches!(err, TaxonomyError::MalformedTaxonomy(_)));
    }

    #[test]
    fn xml_export_builds_the_same_tree() {
        let xml = "<categories>\
            <category><id>root</id><path><category><id>root</id></category></path></category>\
            <category><id>A1</id><path>\
                <category><id>root</id></category>\
                <category><id>A</id><name>Appliances</name></category>\
                <category><id>A1</id></category>\
            </path></category>\
        </categories>";
        let taxonomy = parse_taxonomy(xml.as_bytes(), TaxonomyFormat::Xml).unwrap();
        assert_eq!(taxonomy.len(), 3);
        assert_eq!(taxonomy.parent_of("A1").unwrap(), "A");
        assert_eq!(
            taxonomy.get("A").and_then(|c| c.name.as_deref()),
            Some("Appliances")
        );
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(TaxonomyFormat::from_path(Path::new("cats.json")), TaxonomyFormat::Json);
        assert_eq!(TaxonomyFormat::from_path(Path::new("cats.JSON")), TaxonomyFormat::Json);
        assert_eq!(TaxonomyFormat::from_path(Path::new("categories.xml")), TaxonomyFormat::Xml);
        assert_eq!(TaxonomyFormat::from_path(Path::new("categories")), TaxonomyFormat::Xml);
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = parse_taxonomy("{not json".as_bytes(), TaxonomyFormat::Json).unwrap_err();
        assert!(matches!(err, TaxonomyError::Json(_)));
    }
}
