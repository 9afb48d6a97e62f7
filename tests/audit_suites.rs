//! Diagnostic Suite Tests
//!
//! The invariant validator and the content-schema suite audit a written
//! tree exhaustively: every violation reported in one pass, nonzero
//! outcome left to the caller.

mod common;

use std::fs;

use cp12_core::{BuildPipeline, InvariantValidator, SchemaSuite};

#[test]
fn validator_passes_on_a_fresh_build() {
    let (temp, manifest) = common::scaffold();
    let root = temp.path();
    BuildPipeline::new(root, manifest.clone()).build(false).unwrap();

    let report = InvariantValidator::new().run(root, &manifest).unwrap();
    assert!(report.passed(), "{}", report.render());
}

#[test]
fn validator_reports_exactly_one_violation_for_an_orphan_key() {
    let (temp, manifest) = common::scaffold();
    let root = temp.path();
    BuildPipeline::new(root, manifest.clone()).build(false).unwrap();

    let patched = common::STRINGS_EN.replace(
        r#""nav.rooms": "Rooms","#,
        r#""nav.rooms": "Rooms", "foo.bar": "Orphan","#,
    );
    common::write(root, "src/data/strings.en.json", &patched);

    let report = InvariantValidator::new().run(root, &manifest).unwrap();
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1, "{}", report.render());
    assert!(failures[0].id.starts_with("i18n"));
    assert!(failures[0].description.contains("foo.bar"));
}

#[test]
fn validator_catches_post_write_stylesheet_tampering() {
    let (temp, manifest) = common::scaffold();
    let root = temp.path();
    BuildPipeline::new(root, manifest.clone()).build(false).unwrap();

    // A hand-edit to the written artifact, bypassing the build.
    let css = fs::read_to_string(root.join("cp12.css")).unwrap()
        + "\n.legacy { background: url(img/old-hero.jpg); }\n";
    fs::write(root.join("cp12.css"), css).unwrap();

    let report = InvariantValidator::new().run(root, &manifest).unwrap();
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1, "{}", report.render());
    assert_eq!(failures[0].id, "css-no-legacy-paths");
}

#[test]
fn validator_flags_img_tags_outside_comments() {
    let (temp, manifest) = common::scaffold();
    let root = temp.path();
    BuildPipeline::new(root, manifest.clone()).build(false).unwrap();

    let document = fs::read_to_string(root.join("index.html"))
        .unwrap()
        .replace(
            "<div id=\"rooms-grid\"></div>",
            "<div id=\"rooms-grid\"><img src=\"x.jpg\"></div>",
        );
    fs::write(root.join("index.html"), document).unwrap();

    let report = InvariantValidator::new().run(root, &manifest).unwrap();
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1, "{}", report.render());
    assert_eq!(failures[0].id, "html-no-img-tags");
}

#[test]
fn schema_suite_passes_on_a_fresh_build() {
    let (temp, manifest) = common::scaffold();
    let root = temp.path();
    BuildPipeline::new(root, manifest.clone()).build(false).unwrap();

    let report = SchemaSuite::new().run(root, &manifest);
    assert!(report.passed(), "{}", report.render());
}

#[test]
fn schema_suite_flags_a_missing_source_file() {
    let (temp, manifest) = common::scaffold();
    let root = temp.path();
    BuildPipeline::new(root, manifest.clone()).build(false).unwrap();

    fs::remove_file(root.join("src/shared/scroll-reveal.js")).unwrap();

    let report = SchemaSuite::new().run(root, &manifest);
    let failures: Vec<_> = report.failures().collect();
    assert!(!report.passed());
    assert!(failures
        .iter()
        .any(|f| f.id == "src-exists" && f.description.contains("scroll-reveal.js")));
}

#[test]
fn schema_suite_flags_a_cardinality_drift() {
    let (temp, manifest) = common::scaffold();
    let root = temp.path();
    BuildPipeline::new(root, manifest.clone()).build(false).unwrap();

    // Drop the second room after the build: source and output now both
    // disagree with the documented cardinality.
    let rooms: serde_json::Value = serde_json::from_str(common::ROOMS_JSON).unwrap();
    let one_room = serde_json::Value::Array(vec![rooms[0].clone()]);
    common::write(
        root,
        "src/data/rooms.json",
        &serde_json::to_string_pretty(&one_room).unwrap(),
    );

    let report = SchemaSuite::new().run(root, &manifest);
    assert!(!report.passed());
    assert!(report
        .failures()
        .any(|f| f.description.contains("rooms has 2 entries (found 1)")));
}

#[test]
fn schema_suite_flags_a_missing_metadata_landmark() {
    let (temp, manifest) = common::scaffold();
    let root = temp.path();
    BuildPipeline::new(root, manifest.clone()).build(false).unwrap();

    let document = fs::read_to_string(root.join("index.html"))
        .unwrap()
        .replace(
            "<meta property=\"og:image\" content=\"https://cp12.example/og.jpg\">\n",
            "",
        );
    fs::write(root.join("index.html"), document).unwrap();

    let report = SchemaSuite::new().run(root, &manifest);
    assert!(!report.passed());
    assert!(report
        .failures()
        .any(|f| f.description.contains("og:image")));
}

#[test]
fn schema_suite_flags_a_second_large_journal_card() {
    let (temp, manifest) = common::scaffold();
    let root = temp.path();
    BuildPipeline::new(root, manifest.clone()).build(false).unwrap();

    let journal = fs::read_to_string(root.join("src/data/journal.json"))
        .unwrap()
        .replace(r#""large": false"#, r#""large": true"#);
    common::write(root, "src/data/journal.json", &journal);

    let report = SchemaSuite::new().run(root, &manifest);
    assert!(!report.passed());
    assert!(report
        .failures()
        .any(|f| f.description.contains("large card") && f.description.contains("found 2")));
}
