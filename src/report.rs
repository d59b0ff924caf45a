// Human-readable diagnostics for a single test case.

use url::Url;

use crate::corpus::TestCase;

const INDENT: &str = "    ";
const SEPARATOR: &str = "-----------------------";

/// Link to an example in the canonical specification.
pub fn example_url(base_url: &str, example: u32) -> String {
    let anchor = format!("example-{example}");
    match Url::parse(base_url) {
        Ok(mut url) => {
            url.set_fragment(Some(&anchor));
            url.to_string()
        }
        Err(_) => format!("{base_url}#{anchor}"),
    }
}

/// Format the diagnostic block for one case.
///
/// `actual` is the rendered output, or the fault text when rendering failed.
pub fn format(base_url: &str, label: &str, test_case: &TestCase, actual: &str) -> String {
    let mut out = format!(
        "{label}: {} @ {}\n",
        example_url(base_url, test_case.example),
        test_case.section
    );
    push_block(&mut out, "input", &test_case.markdown);
    push_block(&mut out, "expected", &test_case.html);
    push_block(&mut out, "actual", actual);
    out.push_str(SEPARATOR);
    out.push('\n');
    out
}

/// Print the diagnostic block for one case to stdout.
pub fn print(base_url: &str, label: &str, test_case: &TestCase, actual: &str) {
    print!("{}", format(base_url, label, test_case, actual));
}

fn push_block(out: &mut String, title: &str, text: &str) {
    out.push_str(title);
    out.push_str(":\n");
    for line in text.split('\n') {
        if !line.is_empty() {
            out.push_str(INDENT);
            out.push_str(&visible_whitespace(line));
        }
        out.push('\n');
    }
}

/// Spaces become `·` and tabs become `→`.
pub fn visible_whitespace(line: &str) -> String {
    line.chars()
        .map(|c| match c {
            ' ' => '·',
            '\t' => '→',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn url_gets_example_anchor() {
        assert_eq!(
            example_url("https://spec.commonmark.org/0.30/", 42),
            "https://spec.commonmark.org/0.30/#example-42"
        );
        assert_eq!(example_url("not a url", 3), "not a url#example-3");
    }

    #[test]
    fn whitespace_is_visible() {
        assert_eq!(visible_whitespace("\tfoo bar"), "→foo·bar");
        assert_eq!(visible_whitespace("plain"), "plain");
    }

    #[test]
    fn full_block() {
        let case = TestCase::new(5, "Tabs", "\tfoo", "<pre><code>foo\n</code></pre>\n");
        let out = format(
            "https://spec.commonmark.org/0.30/",
            "FAIL",
            &case,
            "<p>foo</p>\n",
        );
        let expected = "\
FAIL: https://spec.commonmark.org/0.30/#example-5 @ Tabs
input:
    →foo
expected:
    <pre><code>foo
    </code></pre>

actual:
    <p>foo</p>

-----------------------
";
        assert_eq!(out, expected);
    }
}
