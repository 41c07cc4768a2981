//! Golden-file tests: every `tests/cases/<name>.html` is rendered at the
//! width listed below and compared with `tests/cases/<name>.out`.
//!
//! Run with:
//!   cargo test --test golden

use pretty_assertions::assert_eq;
use std::path::PathBuf;
use thread2text::render;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/cases")
}

/// Case name and the width it is rendered at.
const CASES: [(&str, usize); 4] = [
    ("hn_comment", 70),
    ("lobsters_nested", 40),
    ("breaks_and_entities", 30),
    ("malformed", 70),
];

fn read_case(name: &str, ext: &str) -> String {
    let path = cases_dir().join(format!("{name}.{ext}"));
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn test_golden_cases() {
    for (name, width) in CASES {
        let html = read_case(name, "html");
        let expected = read_case(name, "out");
        let expected = expected.strip_suffix('\n').unwrap_or(&expected);

        assert_eq!(render(&html, width), expected, "case {name} at width {width}");
    }
}

#[test]
fn test_every_fixture_is_listed() {
    let mut on_disk: Vec<String> = std::fs::read_dir(cases_dir())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "html"))
        .filter_map(|p| p.file_stem()?.to_str().map(String::from))
        .collect();
    on_disk.sort();

    let mut listed: Vec<String> = CASES.iter().map(|(n, _)| n.to_string()).collect();
    listed.sort();

    assert_eq!(on_disk, listed);
}
