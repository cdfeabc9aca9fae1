use crate::block::{Block, ListKind};
use crate::config::{BlankLines, HeadingStyle, RenderConfig};
use crate::inline::{escape_html, format_inline};

/// Convert blocks to an HTML fragment for a contenteditable surface
pub fn blocks_to_html(blocks: &[Block], config: &RenderConfig) -> String {
    let mut out = String::new();
    let mut open_list: Option<ListKind> = None;

    for block in blocks {
        match block {
            Block::ListItem { kind, text } => {
                if open_list != Some(*kind) || !config.group_list_items {
                    close_list(&mut open_list, &mut out);
                    out.push('<');
                    out.push_str(kind.tag());
                    out.push('>');
                    open_list = Some(*kind);
                }
                out.push_str("<li>");
                out.push_str(&format_inline(text, config.support_media));
                out.push_str("</li>");
            }
            _ => {
                close_list(&mut open_list, &mut out);
                emit_block(block, config, &mut out);
            }
        }
    }

    close_list(&mut open_list, &mut out);
    out
}

fn close_list(open_list: &mut Option<ListKind>, out: &mut String) {
    if let Some(kind) = open_list.take() {
        out.push_str("</");
        out.push_str(kind.tag());
        out.push('>');
    }
}

fn emit_block(block: &Block, config: &RenderConfig, out: &mut String) {
    let media = config.support_media;
    match block {
        Block::Heading { level, text } => match config.heading_style {
            HeadingStyle::Structural => {
                out.push_str(&format!("<h{level}>{}</h{level}>", format_inline(text, media)));
            }
            HeadingStyle::InlineBold => {
                out.push_str("<p><strong>");
                out.push_str(&format_inline(text, media));
                out.push_str("</strong></p>");
            }
        },
        Block::Paragraph { lines } => {
            out.push_str("<p>");
            out.push_str(&format_inline(lines.join(" ").trim(), media));
            out.push_str("</p>");
        }
        Block::CodeBlock { language, lines } => {
            out.push_str("<pre><code");
            if let Some(lang) = language {
                out.push_str(&format!(" class=\"language-{}\"", escape_html(lang)));
            }
            out.push('>');
            for line in lines {
                out.push_str(&escape_html(line));
                out.push('\n');
            }
            out.push_str("</code></pre>");
        }
        Block::Blockquote { text } => {
            out.push_str("<blockquote><p>");
            out.push_str(&format_inline(text, media));
            out.push_str("</p></blockquote>");
        }
        Block::ThematicBreak => {
            out.push_str("<hr />");
        }
        Block::BlankSeparator => {
            if config.blank_lines == BlankLines::Preserve {
                out.push_str("<p><br></p>");
            }
        }
        // Grouped by the caller
        Block::ListItem { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use crate::config::RenderConfig;
    use crate::{markdown_to_html, render_markdown};
    use pretty_assertions::assert_eq;

    #[test]
    fn leading_h1_is_dropped() {
        assert_eq!(markdown_to_html("# Title\n\nBody"), "<p>Body</p>");
    }

    #[test]
    fn headings_as_bold_paragraphs() {
        assert_eq!(
            markdown_to_html("# Title\n## Section"),
            "<p><strong>Section</strong></p>"
        );
    }

    #[test]
    fn structural_headings() {
        assert_eq!(
            render_markdown("# Title\n### *Deep*", &RenderConfig::compact()),
            "<h1>Title</h1><h3><em>Deep</em></h3>"
        );
    }

    #[test]
    fn paragraph_lines_are_joined() {
        assert_eq!(
            markdown_to_html("Hello\nworld"),
            "<p>Hello world</p>"
        );
    }

    #[test]
    fn list_grouping() {
        assert_eq!(
            markdown_to_html("- a\n- b\n1. c"),
            "<ul><li>a</li><li>b</li></ul><ol><li>c</li></ol>"
        );
    }

    #[test]
    fn blank_line_splits_lists() {
        assert_eq!(
            markdown_to_html("- a\n\n- b"),
            "<ul><li>a</li></ul><ul><li>b</li></ul>"
        );
    }

    #[test]
    fn ungrouped_list_items() {
        let config = RenderConfig {
            group_list_items: false,
            ..RenderConfig::compact()
        };
        assert_eq!(
            render_markdown("- a\n- b", &config),
            "<ul><li>a</li></ul><ul><li>b</li></ul>"
        );
    }

    #[test]
    fn code_block() {
        assert_eq!(
            markdown_to_html("```js\nlet x = 1;\n```"),
            "<pre><code class=\"language-js\">let x = 1;\n</code></pre>"
        );
    }

    #[test]
    fn code_block_is_not_formatted() {
        assert_eq!(
            markdown_to_html("```\n*not emphasis* <b>\n```"),
            "<pre><code>*not emphasis* &lt;b&gt;\n</code></pre>"
        );
    }

    #[test]
    fn code_language_is_escaped() {
        assert_eq!(
            markdown_to_html("```\"x\"\n```"),
            "<pre><code class=\"language-&quot;x&quot;\"></code></pre>"
        );
    }

    #[test]
    fn unterminated_code_block() {
        assert_eq!(
            markdown_to_html("para\n```\nopen"),
            "<p>para</p><pre><code>open\n</code></pre>"
        );
    }

    #[test]
    fn blockquote_and_rule() {
        assert_eq!(
            markdown_to_html("> quoted **text**\n\n---"),
            "<blockquote><p>quoted <strong>text</strong></p></blockquote><hr />"
        );
    }

    #[test]
    fn compact_preserves_blank_lines() {
        assert_eq!(
            render_markdown("a\n\nb", &RenderConfig::compact()),
            "<p>a</p><p><br></p><p>b</p>"
        );
    }

    #[test]
    fn escapes_script() {
        let html = markdown_to_html("<script>alert('x') & \"y\"</script>");
        assert!(!html.contains("<script>"));
        assert_eq!(
            html,
            "<p>&lt;script&gt;alert(&#39;x&#39;) &amp; &quot;y&quot;&lt;/script&gt;</p>"
        );
    }

    #[test]
    fn empty_document() {
        assert_eq!(markdown_to_html(""), "");
        assert_eq!(markdown_to_html("  \n\t\n"), "");
    }
}
