// GFM extended autolinks: `www.` links, `http(s)://` and `ftp://` URLs, and
// bare e-mail addresses found in plain text.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<url>(?:https?://|ftp://|www\.)[^\s<]+)|(?P<email>[A-Za-z0-9.+_-]+@[A-Za-z0-9_-]+(?:\.[A-Za-z0-9_-]+)+)",
    )
    .expect("autolink pattern")
});

static TRAILING_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&[A-Za-z0-9]+;$").expect("entity pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AutolinkKind {
    Url,
    Email,
}

/// An autolink found in a text run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Autolink {
    /// Byte range of the link text within the scanned text.
    pub range: Range<usize>,
    /// Link destination (`www.` links gain an `http://` scheme).
    pub href: String,
    pub kind: AutolinkKind,
}

/// Find every extended autolink in `text`, in order.
///
/// `at_boundary` says whether the start of `text` counts as a URL boundary,
/// i.e. the run starts a block or follows whitespace or one of `*_~(`.
pub(crate) fn find(text: &str, at_boundary: bool) -> Vec<Autolink> {
    let mut links = Vec::new();
    for caps in CANDIDATE.captures_iter(text) {
        if let Some(m) = caps.name("url") {
            if !url_may_start(text, m.start(), at_boundary) {
                continue;
            }
            let end = m.start() + trim_trailing(m.as_str()).len();
            let link_text = &text[m.start()..end];
            if link_text.len() <= prefix_len(m.as_str()) || !valid_domain(link_text) {
                continue;
            }
            let href = if link_text.starts_with("www.") {
                format!("http://{link_text}")
            } else {
                link_text.to_string()
            };
            links.push(Autolink {
                range: m.start()..end,
                href,
                kind: AutolinkKind::Url,
            });
        } else if let Some(m) = caps.name("email") {
            let address = m.as_str();
            if address.ends_with(['-', '_']) {
                continue;
            }
            links.push(Autolink {
                range: m.range(),
                href: address.to_string(),
                kind: AutolinkKind::Email,
            });
        }
    }
    links
}

/// URL autolinks start a line, follow whitespace, or follow one of `*_~(`.
fn url_may_start(text: &str, start: usize, at_boundary: bool) -> bool {
    match text[..start].chars().next_back() {
        None => at_boundary,
        Some(c) => is_boundary(c),
    }
}

pub(crate) fn is_boundary(c: char) -> bool {
    c.is_whitespace() || matches!(c, '*' | '_' | '~' | '(')
}

fn prefix_len(candidate: &str) -> usize {
    ["https://", "http://", "ftp://", "www."]
        .into_iter()
        .find(|p| candidate.starts_with(p))
        .map_or(0, str::len)
}

/// Drop trailing punctuation, unbalanced closing parens, and a trailing
/// entity reference.
fn trim_trailing(mut s: &str) -> &str {
    loop {
        let Some(last) = s.chars().next_back() else {
            return s;
        };
        match last {
            '?' | '!' | '.' | ',' | ':' | '*' | '_' | '~' | '"' | '\'' => {
                s = &s[..s.len() - 1];
            }
            ')' => {
                let opens = s.matches('(').count();
                let closes = s.matches(')').count();
                if closes > opens {
                    s = &s[..s.len() - 1];
                } else {
                    return s;
                }
            }
            ';' => match TRAILING_ENTITY.find(s) {
                Some(m) => s = &s[..m.start()],
                None => return s,
            },
            _ => return s,
        }
    }
}

/// The host part must be dot-separated segments of alphanumerics, `-` and
/// `_`, with no underscore in the last two segments.
fn valid_domain(link: &str) -> bool {
    let rest = link
        .strip_prefix("https://")
        .or_else(|| link.strip_prefix("http://"))
        .or_else(|| link.strip_prefix("ftp://"))
        .unwrap_or(link);
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = host.split('.').collect();
    if host.is_empty() || segments.iter().any(|s| s.is_empty()) {
        return false;
    }
    if link.starts_with("www.") && segments.len() < 2 {
        return false;
    }
    let well_formed = segments
        .iter()
        .all(|s| s.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_'));
    let tail_clean = segments.iter().rev().take(2).all(|s| !s.contains('_'));
    well_formed && tail_clean
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<&str> {
        find(input, true).into_iter().map(|l| &input[l.range]).collect()
    }

    #[test]
    fn www_link_gains_scheme() {
        let links = find("www.commonmark.org", true);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].href, "http://www.commonmark.org");
        assert_eq!(links[0].kind, AutolinkKind::Url);
    }

    #[test]
    fn trailing_punctuation_is_dropped() {
        assert_eq!(
            texts("Visit www.commonmark.org/a.b."),
            vec!["www.commonmark.org/a.b"]
        );
        assert_eq!(texts("see http://example.com?"), vec!["http://example.com"]);
    }

    #[test]
    fn parentheses_are_balanced() {
        assert_eq!(
            texts("www.google.com/search?q=Markup+(business)"),
            vec!["www.google.com/search?q=Markup+(business)"]
        );
        assert_eq!(
            texts("(www.google.com/search?q=Markup+(business)))"),
            vec!["www.google.com/search?q=Markup+(business)"]
        );
    }

    #[test]
    fn trailing_entity_is_dropped() {
        assert_eq!(
            texts("www.google.com/search?q=commonmark&hl;"),
            vec!["www.google.com/search?q=commonmark"]
        );
        assert_eq!(
            texts("www.google.com/search?q=commonmark&hl=en"),
            vec!["www.google.com/search?q=commonmark&hl=en"]
        );
    }

    #[test]
    fn underscore_in_last_segments_rejected() {
        assert!(find("www.xxx.yyy._zzz", true).is_empty());
        assert_eq!(texts("www._xxx.yyy.zzz"), vec!["www._xxx.yyy.zzz"]);
    }

    #[test]
    fn url_must_follow_boundary() {
        assert!(find("foohttp://example.com", true).is_empty());
        assert_eq!(texts("*http://example.com"), vec!["http://example.com"]);
    }

    #[test]
    fn run_start_respects_preceding_context() {
        assert!(find("www.commonmark.org", false).is_empty());
        assert!(find("http://example.com", false).is_empty());
        let links = find("x www.commonmark.org", false);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].range, 2..20);
        // e-mail addresses have no boundary rule
        assert_eq!(find("foo@bar.baz", false).len(), 1);
    }

    #[test]
    fn email_addresses() {
        let links = find("mail foo@bar.baz now", true);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].kind, AutolinkKind::Email);
        assert_eq!(links[0].href, "foo@bar.baz");
        assert!(find("a.b-c_d@a.b-", true).is_empty());
        assert_eq!(texts("a.b-c_d@a.b."), vec!["a.b-c_d@a.b"]);
    }

    #[test]
    fn plain_text_has_no_links() {
        assert!(find("nothing to see here", true).is_empty());
        assert!(find("www..", true).is_empty());
        assert!(find("http://.", true).is_empty());
    }
}
