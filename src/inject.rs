//! Writing an imported document into the resolved editors.

use regex::Regex;
use std::sync::OnceLock;

use crate::classify::is_native_input;
use crate::config::{Config, ResolverConfig};
use crate::error::{Error, Result};
use crate::page::Page;
use crate::resolver::{Targets, wait_for_editors};
use crate::title::{UNTITLED, extract_title};

/// What an import wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub title: String,
    pub html_len: usize,
}

/// Render `markdown`, find both editors and fill them in.
pub fn import_markdown<P: Page>(
    page: &mut P,
    markdown: &str,
    config: &Config,
) -> Result<ImportReport> {
    if markdown.trim().is_empty() {
        return Err(Error::EmptyInput);
    }

    let title = extract_title(markdown);
    let html = crate::render_markdown(markdown, &config.render);

    let Targets {
        title: title_node,
        body: body_node,
    } = wait_for_editors(page, &config.resolver).into_targets()?;

    log::info!("Importing {title:?} ({} bytes of HTML)", html.len());
    page.replace_text(&title_node, &title);
    write_html(page, &body_node, &html);

    Ok(ImportReport {
        title,
        html_len: html.len(),
    })
}

/// Write only the title, leaving the body untouched.
pub fn set_title<P: Page>(page: &mut P, title: &str, config: &ResolverConfig) -> Result<()> {
    let resolution = wait_for_editors(page, config);
    let Some(title_node) = resolution.title else {
        return Err(Error::NoTitleTarget {
            editables: resolution.editables,
        });
    };
    if resolution.body.as_ref() == Some(&title_node) {
        return Err(Error::TargetConflict);
    }

    let title = if title.trim().is_empty() {
        UNTITLED
    } else {
        title
    };
    page.replace_text(&title_node, title);
    Ok(())
}

/// Clear the body editor so the host can paste into it. The title editor is
/// not required, but must not be the same node as the body.
pub fn prepare_body_for_paste<P: Page>(page: &mut P, config: &ResolverConfig) -> Result<()> {
    let resolution = wait_for_editors(page, config);
    let Some(body_node) = resolution.body else {
        return Err(Error::NoBodyTarget {
            editables: resolution.editables,
        });
    };
    if resolution.title.as_ref() == Some(&body_node) {
        return Err(Error::TargetConflict);
    }

    log::debug!("Clearing body editor {body_node:?} for paste");
    page.replace_text(&body_node, "");
    Ok(())
}

/// Native inputs only take plain text; rich editors may still refuse HTML.
fn write_html<P: Page>(page: &mut P, node: &P::Node, html: &str) {
    if is_native_input(page, node) {
        page.replace_text(node, &strip_tags(html));
        return;
    }
    if !page.replace_html(node, html) {
        log::warn!("Editor refused HTML, inserting plain text instead");
        page.replace_text(node, &html_to_plain_text(html));
    }
}

fn re_paragraph_gap() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"</p>\s*<p>").expect("paragraph gap regex"))
}

fn re_line_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<br\s*/?>").expect("line break regex"))
}

fn re_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("tag regex"))
}

fn strip_tags(html: &str) -> String {
    re_tag().replace_all(html, "").into_owned()
}

/// Readable plain text for a rendered fragment: paragraphs become blank-line
/// separated and list items become `- ` lines. Entities are left as is.
pub fn html_to_plain_text(html: &str) -> String {
    let text = re_paragraph_gap().replace_all(html, "\n\n");
    let text = text.replace("<li>", "- ").replace("</li>", "\n");
    let text = re_line_break().replace_all(&text, "\n");
    strip_tags(&text).trim().to_string()
}
