//! Task Description Markdown
//!
//! Descriptions are user content shared between members, so raw HTML is
//! shown as text and links are limited to safe schemes.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use pulldown_cmark::{html::push_html, CowStr, Event, Options, Parser, Tag};

/// Characters escaped inside link targets
const URL_ESCAPE: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`');

const SAFE_SCHEMES: &[&str] = &["http:", "https:", "mailto:"];

/// Render markdown to sanitized HTML
pub fn render_markdown(text: &str) -> String {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS;
    let events = Parser::new_ext(text, options).map(|event| match event {
        Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
        Event::Start(Tag::Link { link_type, dest_url, title, id }) => Event::Start(Tag::Link {
            link_type,
            dest_url: sanitize_url(&dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image { link_type, dest_url, title, id }) => Event::Start(Tag::Image {
            link_type,
            dest_url: sanitize_url(&dest_url),
            title,
            id,
        }),
        other => other,
    });

    let mut html = String::new();
    push_html(&mut html, events);
    html
}

/// Keep relative and safe absolute urls, replace the rest with `#`
fn sanitize_url(url: &str) -> CowStr<'static> {
    let trimmed = url.trim();
    let lower = trimmed.to_ascii_lowercase();
    let scheme_end = lower.find(|c: char| c == ':' || c == '/' || c == '?' || c == '#');
    let has_scheme = matches!(scheme_end, Some(i) if lower[i..].starts_with(':'));

    if has_scheme && !SAFE_SCHEMES.iter().any(|s| lower.starts_with(s)) {
        return CowStr::from("#");
    }
    CowStr::from(utf8_percent_encode(trimmed, URL_ESCAPE).to_string())
}

/// Plain-text preview for tables and toasts
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{}…", cut.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_formatting() {
        let html = render_markdown("**vacib** ~~köhnə~~");
        assert!(html.contains("<strong>vacib</strong>"));
        assert!(html.contains("<del>köhnə</del>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render_markdown("salam <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_unsafe_links_neutralized() {
        let html = render_markdown("[bax](javascript:alert(1))");
        assert!(html.contains(r##"href="#""##));
        let html = render_markdown("[bax](JavaScript:alert(1))");
        assert!(html.contains(r##"href="#""##));
    }

    #[test]
    fn test_safe_links_kept() {
        let html = render_markdown("[docs](https://example.az/docs)");
        assert!(html.contains(r#"href="https://example.az/docs""#));
        assert_eq!(sanitize_url("https://example.az/a b").as_ref(), "https://example.az/a%20b");
        assert_eq!(sanitize_url("/task/5").as_ref(), "/task/5");
        assert_eq!(sanitize_url("mailto:leyla@mail.az").as_ref(), "mailto:leyla@mail.az");
        assert_eq!(sanitize_url("data:text/html,x").as_ref(), "#");
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("bir  iki\nüç", 20), "bir iki üç");
        assert_eq!(preview("abcdef", 3), "abc…");
    }
}
