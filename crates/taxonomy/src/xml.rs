//! Reader for the product category XML export.
//!
//! ```text
//! <categories>
//!   <category>
//!     <id>abcat0101000</id>
//!     <name>TVs</name>
//!     <path>
//!       <category><id>cat00000</id><name>Best Buy</name></category>
//!       <category><id>abcat0100000</id><name>TV &amp; Home Theater</name></category>
//!       <category><id>abcat0101000</id><name>TVs</name></category>
//!     </path>
//!   </category>
//! </categories>
//! ```
//!
//! Elements other than `id`, `name` and `path` (such as `subCategories`)
//! are ignored.

use crate::error::{Result, TaxonomyError};
use crate::source::{RawCategory, RawPathEntry, TaxonomyDocument};
use roxmltree::{Document, Node};

const ROOT_TAG: &str = "categories";
const CATEGORY_TAG: &str = "category";

/// Parse the XML export into the same document shape the JSON export uses
pub fn parse_xml_document(text: &str) -> Result<TaxonomyDocument> {
    let document = Document::parse(text)?;
    let root = document.root_element();
    if !root.has_tag_name(ROOT_TAG) {
        return Err(TaxonomyError::malformed(format!(
            "expected <{}> root element, found <{}>",
            ROOT_TAG,
            root.tag_name().name()
        )));
    }

    let categories = elements(root, CATEGORY_TAG)
        .map(read_category)
        .collect::<Result<Vec<_>>>()?;

    Ok(TaxonomyDocument { categories })
}

fn read_category(node: Node<'_, '_>) -> Result<RawCategory> {
    let id = required_id(node)?;
    let path = match child(node, "path") {
        Some(path) => elements(path, CATEGORY_TAG)
            .map(|step| {
                Ok(RawPathEntry {
                    id: required_id(step)?,
                    name: child_text(step, "name"),
                })
            })
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    Ok(RawCategory {
        id,
        name: child_text(node, "name"),
        parent: None,
        path,
    })
}

fn required_id(node: Node<'_, '_>) -> Result<String> {
    child_text(node, "id").ok_or_else(|| {
        let pos = node.document().text_pos_at(node.range().start);
        TaxonomyError::malformed(format!("<category> without <id> at {}", pos))
    })
}

fn elements<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |n| n.has_tag_name(tag))
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(tag))
}

fn child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    child(node, tag)
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_ids_names_and_paths() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<categories>
  <category>
    <id>cat00000</id>
    <name>Best Buy</name>
    <path><category><id>cat00000</id><name>Best Buy</name></category></path>
    <subCategories><category><id>abcat0010000</id></category></subCategories>
  </category>
  <category>
    <id>abcat0010000</id>
    <name>Gift Center</name>
    <path>
      <category><id>cat00000</id><name>Best Buy</name></category>
      <category><id>abcat0010000</id><name>Gift Center</name></category>
    </path>
  </category>
</categories>"#;

        let document = parse_xml_document(xml).unwrap();
        assert_eq!(document.categories.len(), 2);

        let gift = &document.categories[1];
        assert_eq!(gift.id, "abcat0010000");
        assert_eq!(gift.name.as_deref(), Some("Gift Center"));
        let path: Vec<&str> = gift.path.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(path, vec!["cat00000", "abcat0010000"]);
    }

    #[test]
    fn entity_escapes_are_decoded() {
        let xml = "<categories><category><id>a</id><name>TV &amp; Home</name>\
                   <path><category><id>a</id></category></path></category></categories>";
        let document = parse_xml_document(xml).unwrap();
        assert_eq!(document.categories[0].name.as_deref(), Some("TV & Home"));
    }

    #[test]
    fn category_without_id_is_malformed() {
        let xml = "<categories><category><name>nameless</name></category></categories>";
        let err = parse_xml_document(xml).unwrap_err();
        assert!(matches!(err, TaxonomyError::MalformedTaxonomy(msg) if msg.contains("without <id>")));
    }

    #[test]
    fn wrong_root_element_is_malformed() {
        let err = parse_xml_document("<products/>").unwrap_err();
        assert!(matches!(err, TaxonomyError::MalformedTaxonomy(msg) if msg.contains("<products>")));
    }

    #[test]
    fn broken_markup_is_xml_error() {
        let err = parse_xml_document("<categories><category>").unwrap_err();
        assert!(matches!(err, TaxonomyError::Xml(_)));
    }
}
