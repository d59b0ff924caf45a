// Bundled renderer backed by pulldown-cmark.
//
// Tables and strikethrough map onto pulldown-cmark options. Extended
// autolinks and the tagfilter have no native switch, so they run as passes
// over the event stream before HTML is written.

use pulldown_cmark::{html, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream};

use super::autolink::{self, AutolinkKind};
use super::tagfilter;
use super::{RenderFault, Renderer};
use crate::extension::{BlockSyntax, InlineSyntax, RendererConfig};

/// CommonMark renderer with GFM extensions, built on pulldown-cmark.
///
/// ```
/// use mdconform::{resolve, PulldownRenderer, Renderer};
///
/// let config = resolve(["strikethrough"]).unwrap();
/// let html = PulldownRenderer.render("~~gone~~", &config).unwrap();
/// assert_eq!(html, "<p><del>gone</del></p>\n");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PulldownRenderer;

impl Renderer for PulldownRenderer {
    fn render(&self, markdown: &str, config: &RendererConfig) -> Result<String, RenderFault> {
        let parser = Parser::new_ext(markdown, parser_options(config));
        let autolinks = config.has_inline(InlineSyntax::Autolink);

        let mut events: Vec<Event<'_>> = Vec::new();
        // Autolinks are not created inside links, images or code blocks.
        let mut link_depth = 0usize;
        let mut in_code_block = false;
        // Whether the next text run starts at a URL boundary.
        let mut at_boundary = true;

        for event in TextMergeStream::new(parser) {
            let next_boundary = match &event {
                Event::Text(text) => text
                    .chars()
                    .next_back()
                    .map_or(at_boundary, autolink::is_boundary),
                Event::Code(_)
                | Event::InlineHtml(_)
                | Event::InlineMath(_)
                | Event::FootnoteReference(_)
                | Event::End(TagEnd::Link | TagEnd::Image) => false,
                _ => true,
            };
            match event {
                Event::Start(Tag::Link { .. } | Tag::Image { .. }) => {
                    link_depth += 1;
                    events.push(event);
                }
                Event::End(TagEnd::Link | TagEnd::Image) => {
                    link_depth = link_depth.saturating_sub(1);
                    events.push(event);
                }
                Event::Start(Tag::CodeBlock(_)) => {
                    in_code_block = true;
                    events.push(event);
                }
                Event::End(TagEnd::CodeBlock) => {
                    in_code_block = false;
                    events.push(event);
                }
                Event::Text(text) if autolinks && link_depth == 0 && !in_code_block => {
                    push_autolinked(&mut events, text, at_boundary);
                }
                Event::Html(raw) if config.tagfilter => {
                    events.push(Event::Html(filtered(&raw)));
                }
                Event::InlineHtml(raw) if config.tagfilter => {
                    events.push(Event::InlineHtml(filtered(&raw)));
                }
                other => events.push(other),
            }
            at_boundary = next_boundary;
        }

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());
        Ok(out)
    }
}

fn parser_options(config: &RendererConfig) -> Options {
    let mut options = Options::empty();
    if config.has_block(BlockSyntax::Table) {
        options.insert(Options::ENABLE_TABLES);
    }
    if config.has_inline(InlineSyntax::Strikethrough) {
        options.insert(Options::ENABLE_STRIKETHROUGH);
    }
    options
}

fn filtered(raw: &str) -> CowStr<'static> {
    CowStr::from(tagfilter::filter(raw).into_owned())
}

/// Split a text run around its autolinks, emitting link events for each.
fn push_autolinked<'a>(events: &mut Vec<Event<'a>>, text: CowStr<'a>, at_boundary: bool) {
    let links = autolink::find(&text, at_boundary);
    if links.is_empty() {
        events.push(Event::Text(text));
        return;
    }

    let mut last = 0;
    for link in links {
        if link.range.start > last {
            events.push(Event::Text(text[last..link.range.start].to_string().into()));
        }
        let link_type = match link.kind {
            AutolinkKind::Url => LinkType::Autolink,
            AutolinkKind::Email => LinkType::Email,
        };
        events.push(Event::Start(Tag::Link {
            link_type,
            dest_url: link.href.into(),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        events.push(Event::Text(text[link.range.clone()].to_string().into()));
        events.push(Event::End(TagEnd::Link));
        last = link.range.end;
    }
    if last < text.len() {
        events.push(Event::Text(text[last..].to_string().into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::resolve;

    fn render(markdown: &str, extensions: &[&str]) -> String {
        let config = resolve(extensions).unwrap();
        PulldownRenderer.render(markdown, &config).unwrap()
    }

    #[test]
    fn plain_commonmark() {
        assert_eq!(render("*a*", &[]), "<p><em>a</em></p>\n");
    }

    #[test]
    fn strikethrough_needs_extension() {
        assert_eq!(render("~~a~~", &["strikethrough"]), "<p><del>a</del></p>\n");
        assert_eq!(render("~~a~~", &[]), "<p>~~a~~</p>\n");
    }

    #[test]
    fn table_needs_extension() {
        let md = "| a | b |\n| - | - |\n| c | d |\n";
        assert!(render(md, &["table"]).contains("<table>"));
        assert!(!render(md, &[]).contains("<table>"));
    }

    #[test]
    fn www_autolink() {
        assert_eq!(
            render("www.commonmark.org", &["autolink"]),
            "<p><a href=\"http://www.commonmark.org\">www.commonmark.org</a></p>\n"
        );
        assert_eq!(render("www.commonmark.org", &[]), "<p>www.commonmark.org</p>\n");
    }

    #[test]
    fn email_autolink() {
        assert_eq!(
            render("foo@bar.baz", &["autolink"]),
            "<p><a href=\"mailto:foo@bar.baz\">foo@bar.baz</a></p>\n"
        );
    }

    #[test]
    fn no_autolink_inside_code_or_links() {
        assert_eq!(
            render("`www.commonmark.org`", &["autolink"]),
            "<p><code>www.commonmark.org</code></p>\n"
        );
        let out = render("[www.a.org](/x)", &["autolink"]);
        assert_eq!(out, "<p><a href=\"/x\">www.a.org</a></p>\n");
        let out = render("    www.a.org\n", &["autolink"]);
        assert!(!out.contains("<a"));
    }

    #[test]
    fn autolink_needs_boundary_after_inline_markup() {
        assert_eq!(
            render("`code`www.x.com", &["autolink"]),
            "<p><code>code</code>www.x.com</p>\n"
        );
        assert!(!render("<span>www.x.com", &["autolink"]).contains("href"));
        assert!(!render("[a](/b)www.x.com", &["autolink"]).contains("http://www.x.com"));
        assert_eq!(
            render("`code` www.x.com", &["autolink"]),
            "<p><code>code</code> <a href=\"http://www.x.com\">www.x.com</a></p>\n"
        );
        assert_eq!(
            render("*www.x.com*", &["autolink"]),
            "<p><em><a href=\"http://www.x.com\">www.x.com</a></em></p>\n"
        );
        assert_eq!(
            render("a\nwww.x.com", &["autolink"]),
            "<p>a\n<a href=\"http://www.x.com\">www.x.com</a></p>\n"
        );
    }

    #[test]
    fn all_gfm_extensions_together() {
        let md = "| a |\n| - |\n| ~~b~~ |\n\nsee www.x.com <title>\n";
        let out = render(md, &["table", "strikethrough", "autolink", "tagfilter"]);
        assert!(out.contains("<table>"), "{out}");
        assert!(out.contains("<td><del>b</del></td>"), "{out}");
        assert!(
            out.contains("<a href=\"http://www.x.com\">www.x.com</a>"),
            "{out}"
        );
        assert!(out.contains("&lt;title>"), "{out}");
        assert!(!out.contains("<title>"), "{out}");
    }

    #[test]
    fn tagfilter_escapes_raw_html() {
        assert_eq!(
            render("<strong> <title> <style> <em>", &["tagfilter"]),
            "<p><strong> &lt;title> &lt;style> <em></p>\n"
        );
        assert_eq!(
            render("<strong> <title> <style> <em>", &[]),
            "<p><strong> <title> <style> <em></p>\n"
        );
    }
}
