//! Inline formatting: one line of raw Markdown to an HTML-safe fragment.
//!
//! The text is escaped first, then run through an ordered list of rewrite
//! rules. Markup produced by a rule is parked in a stash and replaced by an
//! opaque placeholder, so later rules can match around it but never inside
//! it: attribute values and code spans are rewritten exactly once.

use regex::{Captures, Regex};
use std::sync::OnceLock;

const OPEN: char = '\u{E000}';
const CLOSE: char = '\u{E001}';

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            // Reserved for placeholders.
            OPEN | CLOSE => {}
            _ => out.push(ch),
        }
    }
    out
}

/// Format one run of text. `media` enables image syntax.
pub fn format_inline(text: &str, media: bool) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut stash = Stash::default();
    let mut out = escape_html(text);
    for rule in RULES {
        if rule.media_only && !media {
            continue;
        }
        out = (rule.pattern)()
            .replace_all(&out, |caps: &Captures| (rule.rewrite)(caps, &mut stash))
            .into_owned();
    }

    stash.restore(out)
}

#[derive(Default)]
struct Stash {
    parked: Vec<String>,
}

impl Stash {
    fn park(&mut self, markup: String) -> String {
        let placeholder = format!("{OPEN}{}{CLOSE}", self.parked.len());
        self.parked.push(markup);
        placeholder
    }

    /// Substitute placeholders until none remain. Parked markup can only
    /// refer to entries parked before it, so this terminates.
    fn restore(&self, mut text: String) -> String {
        while text.contains(OPEN) {
            text = re_placeholder()
                .replace_all(&text, |caps: &Captures| {
                    caps[1]
                        .parse::<usize>()
                        .ok()
                        .and_then(|i| self.parked.get(i))
                        .cloned()
                        .unwrap_or_default()
                })
                .into_owned();
        }
        text
    }
}

struct Rule {
    pattern: fn() -> &'static Regex,
    rewrite: fn(&Captures, &mut Stash) -> String,
    media_only: bool,
}

const RULES: &[Rule] = &[
    Rule {
        pattern: re_image,
        rewrite: rewrite_image,
        media_only: true,
    },
    Rule {
        pattern: re_link,
        rewrite: rewrite_link,
        media_only: false,
    },
    Rule {
        pattern: re_code,
        rewrite: rewrite_code,
        media_only: false,
    },
    Rule {
        pattern: re_strong_star,
        rewrite: rewrite_strong,
        media_only: false,
    },
    Rule {
        pattern: re_strong_underscore,
        rewrite: rewrite_strong,
        media_only: false,
    },
    Rule {
        pattern: re_em_star,
        rewrite: rewrite_em,
        media_only: false,
    },
    Rule {
        pattern: re_em_underscore,
        rewrite: rewrite_em,
        media_only: false,
    },
];

fn re_placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("\u{E000}(\\d+)\u{E001}").expect("placeholder regex"))
}

// Patterns run over already-escaped text, so an optional `"title"` shows up
// as `&quot;title&quot;`. URL and title captures never span a placeholder:
// parked markup must not end up inside an attribute value.

fn re_image() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"!\[([^\]]*)\]\(([^)\s\x{E000}\x{E001}]+)(?:\s+&quot;([^\x{E000}\x{E001}]+?)&quot;)?\)")
            .expect("image regex")
    })
}

fn re_link() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\[([^\]]+)\]\(([^)\s\x{E000}\x{E001}]+)(?:\s+&quot;([^\x{E000}\x{E001}]+?)&quot;)?\)")
            .expect("link regex")
    })
}

fn re_code() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"`([^`]+)`").expect("code regex"))
}

fn re_strong_star() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*([^*]+)\*\*").expect("strong regex"))
}

fn re_strong_underscore() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"__([^_]+)__").expect("strong regex"))
}

fn re_em_star() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*([^*]+)\*").expect("em regex"))
}

fn re_em_underscore() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_([^_]+)_").expect("em regex"))
}

fn capture<'a>(caps: &'a Captures, index: usize) -> &'a str {
    caps.get(index).map_or("", |m| m.as_str())
}

fn title_attr(caps: &Captures) -> String {
    match caps.get(3) {
        Some(title) => format!(" title=\"{}\"", title.as_str()),
        None => String::new(),
    }
}

fn rewrite_image(caps: &Captures, stash: &mut Stash) -> String {
    stash.park(format!(
        "<img src=\"{}\" alt=\"{}\"{} />",
        capture(caps, 2),
        capture(caps, 1),
        title_attr(caps)
    ))
}

fn rewrite_link(caps: &Captures, stash: &mut Stash) -> String {
    stash.park(format!(
        "<a href=\"{}\"{}>{}</a>",
        capture(caps, 2),
        title_attr(caps),
        capture(caps, 1)
    ))
}

fn rewrite_code(caps: &Captures, stash: &mut Stash) -> String {
    stash.park(format!("<code>{}</code>", capture(caps, 1)))
}

// Only the tags are parked; the wrapped text stays open to later rules.
fn wrap(tag: &str, caps: &Captures, stash: &mut Stash) -> String {
    let open = stash.park(format!("<{tag}>"));
    let close = stash.park(format!("</{tag}>"));
    format!("{open}{}{close}", capture(caps, 1))
}

fn rewrite_strong(caps: &Captures, stash: &mut Stash) -> String {
    wrap("strong", caps, stash)
}

fn rewrite_em(caps: &Captures, stash: &mut Stash) -> String {
    wrap("em", caps, stash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("plain text", "plain text")]
    #[case("**bold**", "<strong>bold</strong>")]
    #[case("__bold__", "<strong>bold</strong>")]
    #[case("*it*", "<em>it</em>")]
    #[case("_it_", "<em>it</em>")]
    #[case("`x < y`", "<code>x &lt; y</code>")]
    #[case("a **b** and *c*", "a <strong>b</strong> and <em>c</em>")]
    #[case("__a **b** c__", "<strong>a <strong>b</strong> c</strong>")]
    #[case("**a _b_ c**", "<strong>a <em>b</em> c</strong>")]
    #[case("*unclosed", "*unclosed")]
    #[case("", "")]
    fn formats_inline(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(format_inline(input, true), expected);
    }

    #[test]
    fn escapes_before_anything_else() {
        assert_eq!(
            format_inline("<script>&\"'", true),
            "&lt;script&gt;&amp;&quot;&#39;"
        );
    }

    #[test]
    fn link_with_title() {
        assert_eq!(
            format_inline("see [docs](https://x.dev/a \"The Docs\")", true),
            "see <a href=\"https://x.dev/a\" title=\"The Docs\">docs</a>"
        );
    }

    #[test]
    fn link_label_is_not_formatted() {
        assert_eq!(
            format_inline("[*label*](u)", true),
            "<a href=\"u\">*label*</a>"
        );
    }

    #[test]
    fn link_href_is_not_rewritten_by_emphasis() {
        assert_eq!(
            format_inline("[x](http://a_b_c.dev) and _y_", true),
            "<a href=\"http://a_b_c.dev\">x</a> and <em>y</em>"
        );
    }

    #[test]
    fn link_href_is_escaped_once() {
        assert_eq!(
            format_inline("[q](/s?a=1&b=2)", true),
            "<a href=\"/s?a=1&amp;b=2\">q</a>"
        );
    }

    #[rstest]
    #[case("[x](![a](b))", "[x](<img src=\"b\" alt=\"a\" />)")]
    #[case(
        "[x](u \"![a](b)\")",
        "[x](u &quot;<img src=\"b\" alt=\"a\" />&quot;)"
    )]
    #[case(
        "[x](![a](onmouseover=alert`1`//))",
        "[x](<img src=\"onmouseover=alert`1`//\" alt=\"a\" />)"
    )]
    fn image_markup_never_lands_in_link_attributes(#[case] input: &str, #[case] expected: &str) {
        let html = format_inline(input, true);
        assert_eq!(html, expected);
        assert!(!html.contains("<a "));
    }

    #[test]
    fn image_as_link_label() {
        assert_eq!(
            format_inline("[![a](b)](u)", true),
            "<a href=\"u\"><img src=\"b\" alt=\"a\" /></a>"
        );
    }

    #[test]
    fn image_when_media_enabled() {
        assert_eq!(
            format_inline("![a cat](cat.png \"Cat\")", true),
            "<img src=\"cat.png\" alt=\"a cat\" title=\"Cat\" />"
        );
    }

    #[test]
    fn image_without_media_is_left_to_links() {
        assert_eq!(
            format_inline("![a cat](cat.png)", false),
            "!<a href=\"cat.png\">a cat</a>"
        );
    }

    #[test]
    fn linked_image() {
        assert_eq!(
            format_inline("[![logo](l.png)](https://x.dev)", true),
            "<a href=\"https://x.dev\"><img src=\"l.png\" alt=\"logo\" /></a>"
        );
    }

    #[test]
    fn code_content_is_verbatim() {
        assert_eq!(
            format_inline("`**not bold**` but **bold**", true),
            "<code>**not bold**</code> but <strong>bold</strong>"
        );
    }

    #[test]
    fn placeholder_characters_in_input_are_dropped() {
        assert_eq!(format_inline("a\u{E000}0\u{E001}b", true), "a0b");
    }
}
