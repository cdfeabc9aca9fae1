use mdimport::{BlankLines, RenderConfig, extract_title, markdown_to_html, render_markdown};
use pretty_assertions::assert_eq;

const ARTICLE: &str = r#"# My Post

Intro with **bold** and a [link](https://example.com "Home").

## Setup

1. Install
2. Run `cargo`

```rust
let x = 1 < 2;
```

> Quoted *text*

---

![Alt](https://img/x.png)
- one
- two
"#;

#[test]
fn renders_full_article() {
    let expected = concat!(
        "<p>Intro with <strong>bold</strong> and a ",
        "<a href=\"https://example.com\" title=\"Home\">link</a>.</p>",
        "<p><strong>Setup</strong></p>",
        "<ol><li>Install</li><li>Run <code>cargo</code></li></ol>",
        "<pre><code class=\"language-rust\">let x = 1 &lt; 2;\n</code></pre>",
        "<blockquote><p>Quoted <em>text</em></p></blockquote>",
        "<hr />",
        "<p><img src=\"https://img/x.png\" alt=\"Alt\" /></p>",
        "<ul><li>one</li><li>two</li></ul>",
    );

    assert_eq!(markdown_to_html(ARTICLE), expected);
    assert_eq!(extract_title(ARTICLE), "My Post");
}

#[test]
fn compact_keeps_title_and_blank_lines() {
    assert_eq!(
        render_markdown("# T\n\nA\n- x\n---", &RenderConfig::compact()),
        "<h1>T</h1><p><br></p><p>A</p><ul><li>x</li></ul><p>---</p>"
    );
}

#[test]
fn crlf_input_renders_like_lf() {
    let lf = ARTICLE.to_string();
    let crlf = lf.replace('\n', "\r\n");
    assert_eq!(markdown_to_html(&crlf), markdown_to_html(&lf));
}

#[test]
fn preserved_blank_lines_with_full_rendering() {
    let config = RenderConfig {
        blank_lines: BlankLines::Preserve,
        ..RenderConfig::full()
    };
    assert_eq!(
        render_markdown("# T\n\nOne\n\nTwo", &config),
        "<p><br></p><p>One</p><p><br></p><p>Two</p>"
    );
}
