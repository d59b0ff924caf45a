// Diagnostic formatting for the registered corpora.

use mdconform::{report, Config, TestCase};
use pretty_assertions::assert_eq;

#[test]
fn gfm_header_links_to_example() {
    let case = TestCase::new(198, "Tables (extension)", "| a |", "");
    let out = report::format(Config::GFM.base_url, "LOOSE", &case, "");
    let header = out.lines().next().unwrap();
    assert_eq!(
        header,
        "LOOSE: https://github.github.com/gfm/#example-198 @ Tables (extension)"
    );
}

#[test]
fn fault_text_is_shown_as_actual() {
    let case = TestCase::new(1, "Tabs", "a", "<p>a</p>");
    let out = report::format(Config::COMMONMARK.base_url, "ERROR", &case, "boom\nat render");
    assert!(out.contains("actual:\n    boom\n    at·render\n"), "{out}");
    assert!(out.ends_with("-----------------------\n"));
}
