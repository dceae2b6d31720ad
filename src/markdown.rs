//! Markdown Rendering
//!
//! Tutorial and weekly-report bodies through pulldown-cmark with:
//! - Single newlines kept as line breaks
//! - Syntax highlighting (syntect)
//! - Video links in image syntax: `![demo](https://youtu.be/..)` becomes a
//!   player, `.mp4`/`.webm` files become `<video>`
//! - Raw HTML shown as text

use std::sync::OnceLock;

use pulldown_cmark::{html::push_html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::media::{self, VideoHost};

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme() -> Option<&'static Theme> {
    THEME_SET.get_or_init(ThemeSet::load_defaults).themes.get("InspiredGitHub")
}

fn options() -> Options {
    Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS
}

pub fn render_markdown(text: &str) -> String {
    let parser = Parser::new_ext(text, options());
    let events = transform_events(parser);
    let mut html = String::new();
    push_html(&mut html, events.into_iter());
    html
}

enum State {
    Normal,
    InCodeBlock { lang: Option<String>, content: String },
    /// Swallowing alt text of a replaced image
    InMedia { depth: usize },
}

fn transform_events(parser: Parser<'_>) -> Vec<Event<'_>> {
    let mut events = Vec::new();
    let mut state = State::Normal;

    for event in parser {
        match state {
            State::Normal => match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(l) if !l.is_empty() => Some(l.to_string()),
                        _ => None,
                    };
                    state = State::InCodeBlock { lang, content: String::new() };
                }
                Event::Start(Tag::Image { dest_url, .. }) => {
                    events.push(Event::Html(CowStr::from(media_html(&dest_url))));
                    state = State::InMedia { depth: 0 };
                }
                Event::SoftBreak => events.push(Event::HardBreak),
                Event::Html(raw) | Event::InlineHtml(raw) => events.push(Event::Text(raw)),
                other => events.push(other),
            },

            State::InCodeBlock { ref lang, ref mut content } => match event {
                Event::Text(t) => content.push_str(&t),
                Event::End(TagEnd::CodeBlock) => {
                    let html = highlight_code(content, lang.as_deref());
                    events.push(Event::Html(CowStr::from(html)));
                    state = State::Normal;
                }
                _ => {}
            },

            State::InMedia { ref mut depth } => match event {
                Event::Start(_) => *depth += 1,
                Event::End(_) if *depth == 0 => state = State::Normal,
                Event::End(_) => *depth -= 1,
                _ => {}
            },
        }
    }

    events
}

fn media_html(url: &str) -> String {
    let src = escape_html(url);
    if is_video_file(url) {
        return format!(r#"<video controls src="{}" class="md-video"></video>"#, src);
    }
    match media::video_host(url) {
        VideoHost::YouTube | VideoHost::Bilibili => format!(
            r#"<div class="video-container"><iframe src="{}" frameborder="0" allowfullscreen></iframe></div>"#,
            escape_html(&media::embed_url(url))
        ),
        VideoHost::Other => format!(r#"<img src="{}" loading="lazy" class="md-image" />"#, src),
    }
}

fn is_video_file(url: &str) -> bool {
    let lower = url.to_lowercase();
    [".mp4", ".webm", ".mov", ".mkv"]
        .iter()
        .any(|ext| lower.ends_with(ext))
}

fn highlight_code(code: &str, lang: Option<&str>) -> String {
    let plain = || format!("<pre><code>{}</code></pre>", escape_html(code));
    let Some(theme) = theme() else {
        return plain();
    };
    let ss = syntax_set();
    let syntax = lang
        .and_then(|l| ss.find_syntax_by_token(l))
        .unwrap_or_else(|| ss.find_syntax_plain_text());

    highlighted_html_for_string(code, ss, syntax, theme).unwrap_or_else(|_| plain())
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_newline_is_a_break() {
        let html = render_markdown("line one\nline two");
        assert!(html.contains("line one<br />"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render_markdown("hi <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_youtube_image_becomes_player() {
        let html = render_markdown("![demo](https://youtu.be/abc123)");
        assert!(html.contains(r#"<iframe src="https://www.youtube.com/embed/abc123""#));
        assert!(!html.contains("demo"));
    }

    #[test]
    fn test_video_file_and_plain_image() {
        let html = render_markdown("![clip](/media/clip.MP4)\n\n![pic](/img/a.png)");
        assert!(html.contains(r#"<video controls src="/media/clip.MP4""#));
        assert!(html.contains(r#"<img src="/img/a.png""#));
    }

    #[test]
    fn test_code_block_is_highlighted() {
        let html = render_markdown("```rust\nfn main() {}\n```");
        assert!(html.contains("<pre"));
        assert!(html.contains("main"));
    }
}
