//! Markdown to sanitized HTML.
//!
//! Raw HTML in the source is never passed through: it is emitted as escaped
//! text. Link and image destinations are checked against a scheme allowlist
//! and blanked when they fail.

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};

const LINK_SCHEMES: &[&str] = &["http", "https", "mailto", "irc", "ircs", "xmpp"];
const IMAGE_SCHEMES: &[&str] = &["http", "https"];

pub fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Render markdown (CommonMark + GFM tables, strikethrough, task lists)
pub fn render_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, options()).map(sanitize);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn sanitize(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: allow_url(dest_url, LINK_SCHEMES),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: allow_url(dest_url, IMAGE_SCHEMES),
            title,
            id,
        }),
        other => other,
    }
}

fn allow_url<'a>(url: CowStr<'a>, schemes: &[&str]) -> CowStr<'a> {
    match scheme(&url) {
        Some(scheme) if !schemes.contains(&scheme.as_str()) => {
            log::debug!("Dropping link with disallowed scheme {scheme:?}");
            CowStr::Borrowed("")
        }
        _ => url,
    }
}

/// Lowercased URL scheme, or `None` for relative URLs and fragments.
///
/// Whitespace and control characters are ignored the way browsers ignore
/// them, so `java\tscript:` is still seen as `javascript`.
fn scheme(url: &str) -> Option<String> {
    let cleaned: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
        .collect();

    let colon = cleaned.find(':')?;
    let candidate = &cleaned[..colon];
    if candidate.contains(['/', '?', '#']) {
        return None;
    }
    Some(candidate.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_renders_heading_and_emphasis() {
        assert_eq!(render_html("# Title"), "<h1>Title</h1>\n");
        assert_eq!(
            render_html("**bold** and _it_"),
            "<p><strong>bold</strong> and <em>it</em></p>\n"
        );
    }

    #[test]
    fn test_renders_toolbar_output() {
        let html = render_html("- item\n\n```\na\nb\n```");
        assert!(html.contains("<ul>\n<li>item</li>\n</ul>"));
        assert!(html.contains("<pre><code>a\nb\n</code></pre>"));
    }

    #[test]
    fn test_escapes_script_block() {
        let html = render_html("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_escapes_inline_html() {
        let html = render_html("hello <img src=x onerror=alert(1)> there");
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img"));
    }

    #[test]
    fn test_blanks_javascript_links() {
        let html = render_html("[click](javascript:alert(1))");
        assert!(!html.contains("javascript"));
        assert!(html.contains("<a href=\"\">click</a>"));
    }

    #[test]
    fn test_keeps_safe_links() {
        let html = render_html("[docs](https://example.com/a?b=c)");
        assert!(html.contains("href=\"https://example.com/a?b=c\""));
    }

    #[test]
    fn test_images_only_allow_http() {
        let html = render_html("![alt](mailto:someone@example.com)");
        assert!(!html.contains("mailto"));
    }

    #[test]
    fn test_gfm_strikethrough_and_tables() {
        let html = render_html("~~gone~~\n\n| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("<table>"));
    }

    #[rstest]
    #[case("https://example.com", Some("https"))]
    #[case("HTTP://EXAMPLE.COM", Some("http"))]
    #[case("java\tscript:alert(1)", Some("javascript"))]
    #[case(" javascript:alert(1)", Some("javascript"))]
    #[case("relative/path:with-colon", None)]
    #[case("#fragment", None)]
    #[case("?q=a:b", None)]
    #[case("url", None)]
    fn test_scheme(#[case] url: &str, #[case] expected: Option<&str>) {
        assert_eq!(scheme(url).as_deref(), expected);
    }
}
