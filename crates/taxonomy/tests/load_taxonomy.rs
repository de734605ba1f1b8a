use labeler_taxonomy::{load_taxonomy, Taxonomy, TaxonomyError};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

const XML_EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<categories>
  <category>
    <id>cat00000</id>
    <name>Best Buy</name>
    <active>true</active>
    <path>
      <category><id>cat00000</id><name>Best Buy</name></category>
    </path>
    <subCategories>
      <category><id>abcat0100000</id><name>TV &amp; Home Theater</name></category>
    </subCategories>
  </category>
  <category>
    <id>abcat0100000</id>
    <name>TV &amp; Home Theater</name>
    <path>
      <category><id>cat00000</id><name>Best Buy</name></category>
      <category><id>abcat0100000</id><name>TV &amp; Home Theater</name></category>
    </path>
  </category>
  <category>
    <id>abcat0101000</id>
    <name>TVs</name>
    <path>
      <category><id>cat00000</id><name>Best Buy</name></category>
      <category><id>abcat0100000</id><name>TV &amp; Home Theater</name></category>
      <category><id>abcat0101000</id><name>TVs</name></category>
    </path>
  </category>
  <category>
    <id>abcat0101001</id>
    <name>All Flat-Panel TVs</name>
    <path>
      <category><id>cat00000</id><name>Best Buy</name></category>
      <category><id>abcat0100000</id><name>TV &amp; Home Theater</name></category>
      <category><id>abcat0101000</id><name>TVs</name></category>
      <category><id>abcat0101001</id><name>All Flat-Panel TVs</name></category>
    </path>
  </category>
  <category>
    <id>abcat0500000</id>
    <name>Computers &amp; Tablets</name>
    <path>
      <category><id>cat00000</id><name>Best Buy</name></category>
      <category><id>abcat0500000</id><name>Computers &amp; Tablets</name></category>
    </path>
  </category>
</categories>
"#;

const JSON_EXPORT: &str = r#"{
  "categories": [
    {"id": "cat00000", "name": "Best Buy", "path": [{"id": "cat00000", "name": "Best Buy"}]},
    {"id": "abcat0100000", "name": "TV & Home Theater", "path": [
      {"id": "cat00000"}, {"id": "abcat0100000"}
    ]},
    {"id": "abcat0101000", "name": "TVs", "path": [
      {"id": "cat00000"}, {"id": "abcat0100000"}, {"id": "abcat0101000"}
    ]},
    {"id": "abcat0101001", "name": "All Flat-Panel TVs", "path": [
      {"id": "cat00000"}, {"id": "abcat0100000"}, {"id": "abcat0101000"}, {"id": "abcat0101001"}
    ]},
    {"id": "abcat0500000", "name": "Computers & Tablets", "path": [
      {"id": "cat00000"}, {"id": "abcat0500000"}
    ]}
  ]
}"#;

fn assert_export_shape(taxonomy: &Taxonomy) {
    assert_eq!(taxonomy.len(), 5);
    assert_eq!(taxonomy.root().id, "cat00000");
    assert_eq!(taxonomy.max_depth(), 3);
    assert_eq!(
        taxonomy.ancestors("abcat0101001").collect::<Vec<_>>(),
        vec!["abcat0101000", "abcat0100000", "cat00000"]
    );
    assert_eq!(
        taxonomy.get("abcat0101000").and_then(|c| c.name.clone()),
        Some("TVs".to_string())
    );
}

#[test]
fn loads_xml_category_export_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("categories.xml");
    fs::write(&path, XML_EXPORT).unwrap();

    let taxonomy = load_taxonomy(&path).unwrap();

    assert_export_shape(&taxonomy);
    assert_eq!(
        taxonomy.get("abcat0100000").and_then(|c| c.name.clone()),
        Some("TV & Home Theater".to_string())
    );
}

#[test]
fn loads_json_category_export_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("categories.json");
    fs::write(&path, JSON_EXPORT).unwrap();

    assert_export_shape(&load_taxonomy(&path).unwrap());
}

#[test]
fn xml_with_two_roots_is_malformed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("categories.xml");
    fs::write(
        &path,
        "<categories>\
           <category><id>r1</id><path><category><id>r1</id></category></path></category>\
           <category><id>r2</id><path><category><id>r2</id></category></path></category>\
         </categories>",
    )
    .unwrap();

    let err = load_taxonomy(&path).unwrap_err();
    assert!(matches!(err, TaxonomyError::MalformedTaxonomy(_)));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = load_taxonomy(&dir.path().join("absent.xml")).unwrap_err();
    assert!(matches!(err, TaxonomyError::Io(_)));
}
