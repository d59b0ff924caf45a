// GFM tagfilter: neutralize raw HTML tags that change how following content
// is interpreted, by escaping their leading `<`.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)<(/?(?:title|textarea|style|xmp|iframe|noembed|noframes|script|plaintext))([\s/>]|$)",
    )
    .expect("tagfilter pattern")
});

/// Escape disallowed tags in a chunk of raw HTML.
pub(crate) fn filter(html: &str) -> Cow<'_, str> {
    DISALLOWED.replace_all(html, "&lt;$1$2")
}
