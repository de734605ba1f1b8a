use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const CATEGORIES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<categories>
  <category>
    <id>cat00000</id><name>Best Buy</name>
    <path><category><id>cat00000</id><name>Best Buy</name></category></path>
  </category>
  <category>
    <id>abcat01</id><name>TV &amp; Home Theater</name>
    <path>
      <category><id>cat00000</id></category>
      <category><id>abcat01</id></category>
    </path>
  </category>
  <category>
    <id>abcat0101</id><name>TVs</name>
    <path>
      <category><id>cat00000</id></category>
      <category><id>abcat01</id></category>
      <category><id>abcat0101</id></category>
    </path>
  </category>
  <category>
    <id>abcat0102</id><name>Remotes</name>
    <path>
      <category><id>cat00000</id></category>
      <category><id>abcat01</id></category>
      <category><id>abcat0102</id></category>
    </path>
  </category>
  <category>
    <id>abcat05</id><name>Computers</name>
    <path>
      <category><id>cat00000</id></category>
      <category><id>abcat05</id></category>
    </path>
  </category>
</categories>
"#;

const TRAIN: &str = "user,category,query\n\
u1,abcat0101,Flat TVs\n\
u2,abcat0101,OLED TV\n\
u3,abcat0102,TV Remote\n\
u4,abcat05,Laptop\n\
u5,abcat05,laptops\n\
u6,abcat05,Gaming Laptop\n\
u7,cat00000,gift card\n\
u8,pcmcat404,whatever\n";

fn write_inputs(root: &Path) {
    fs::write(root.join("categories.xml"), CATEGORIES).unwrap();
    fs::write(root.join("train.csv"), TRAIN).unwrap();
}

#[allow(deprecated)]
fn labeler(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("labeler").expect("binary");
    cmd.current_dir(workdir);
    cmd
}

#[test]
fn label_rolls_up_and_writes_fasttext_lines() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    write_inputs(root);

    let output = labeler(root)
        .args([
            "label",
            "--taxonomy",
            "categories.xml",
            "--examples",
            "train.csv",
            "--output",
            "out/labeled_queries.txt",
            "--min-support",
            "3",
            "--stemmer",
            "plural",
            "--json",
        ])
        .output()
        .expect("command run");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let response: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let summary = &response["summary"];
    assert_eq!(summary["loaded"], 8);
    assert_eq!(summary["dropped_on_load"], 2);
    assert_eq!(summary["emitted"], 6);
    assert_eq!(summary["labels"], 2);
    assert_eq!(summary["rounds"], 2);
    assert_eq!(summary["promotions"], 2);
    assert_eq!(summary["root_shortfalls"], 0);

    let written = fs::read_to_string(root.join("out/labeled_queries.txt")).unwrap();
    assert_eq!(
        written,
        "__label__abcat01 flat tv\n\
         __label__abcat01 oled tv\n\
         __label__abcat01 tv remote\n\
         __label__abcat05 laptop\n\
         __label__abcat05 laptop\n\
         __label__abcat05 gaming laptop\n"
    );
}

#[test]
fn label_reads_config_file_from_working_directory() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    write_inputs(root);
    fs::write(
        root.join("labeler.toml"),
        r##"
[input]
taxonomy = "categories.xml"
examples = "train.csv"

[output]
path = "labeled.txt"
label_prefix = "#"

[rollup]
min_support = 1

[text]
stemmer = "none"
"##,
    )
    .unwrap();

    labeler(root)
        .arg("label")
        .assert()
        .success()
        .stdout(predicate::str::contains("labeled=6"));

    let written = fs::read_to_string(root.join("labeled.txt")).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines[0], "#abcat0101 flat tvs");
    assert_eq!(lines[2], "#abcat0102 tv remote");
    assert_eq!(lines.len(), 6);
}

#[test]
fn label_stems_with_porter_by_default() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::write(root.join("categories.xml"), CATEGORIES).unwrap();
    fs::write(
        root.join("train.csv"),
        "category,query\nabcat0101,Charging Cables\nabcat0101,running shoes\n",
    )
    .unwrap();

    labeler(root)
        .args([
            "label",
            "--taxonomy",
            "categories.xml",
            "--examples",
            "train.csv",
            "--output",
            "labeled.txt",
        ])
        .assert()
        .success();

    let written = fs::read_to_string(root.join("labeled.txt")).unwrap();
    assert_eq!(
        written,
        "__label__abcat0101 charg cabl\n__label__abcat0101 run shoe\n"
    );
}

#[test]
fn json_taxonomy_is_still_accepted() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::write(
        root.join("categories.json"),
        r#"{"categories": [
            {"id": "cat00000", "path": [{"id": "cat00000"}]},
            {"id": "abcat05", "path": [{"id": "cat00000"}, {"id": "abcat05"}]}
        ]}"#,
    )
    .unwrap();

    let output = labeler(root)
        .args(["inspect", "--taxonomy", "categories.json", "--json"])
        .output()
        .expect("command run");
    assert!(output.status.success());

    let response: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(response["categories"], 2);
    assert_eq!(response["max_depth"], 1);
}

#[test]
fn malformed_taxonomy_fails_before_rollup() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::write(
        root.join("categories.xml"),
        "<categories>\
           <category><id>r1</id><path><category><id>r1</id></category></path></category>\
           <category><id>r2</id><path><category><id>r2</id></category></path></category>\
         </categories>",
    )
    .unwrap();
    fs::write(root.join("train.csv"), TRAIN).unwrap();

    labeler(root)
        .args(["label", "--taxonomy", "categories.xml", "--examples", "train.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed taxonomy"));

    assert!(!root.join("datasets").exists());
}

#[test]
fn inspect_reports_tree_shape() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    write_inputs(root);

    let output = labeler(root)
        .args(["inspect", "--taxonomy", "categories.xml", "--json"])
        .output()
        .expect("command run");
    assert!(output.status.success());

    let response: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(response["categories"], 5);
    assert_eq!(response["root"], "cat00000");
    assert_eq!(response["max_depth"], 2);
    assert_eq!(response["leaves"], 3);
}

#[test]
fn synonyms_filters_by_threshold() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::write(
        root.join("neighbors.json"),
        r#"{
            "laptop": [{"word": "notebook", "similarity": 0.9}, {"word": "ultrabook", "similarity": 0.8}],
            "tv": [{"word": "hdtv", "similarity": 0.7}]
        }"#,
    )
    .unwrap();
    fs::write(root.join("words.txt"), "laptop\ntv\n\n").unwrap();

    labeler(root)
        .args([
            "synonyms",
            "--neighbors",
            "neighbors.json",
            "--words",
            "words.txt",
            "--output",
            "out/synonyms.csv",
            "--threshold",
            "0.75",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("synonym_lines=1"));

    let written = fs::read_to_string(root.join("out/synonyms.csv")).unwrap();
    assert_eq!(written, "notebook,ultrabook\n");
}
