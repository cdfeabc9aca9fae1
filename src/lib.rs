mod block;
mod classify;
mod config;
mod error;
mod html;
mod inject;
mod inline;
mod page;
mod parser;
mod resolver;
mod snapshot;
mod source;
mod title;

pub use block::{Block, ListKind};
pub use classify::{is_visible, resolve_editable_target, visible_editable_targets};
pub use config::{BlankLines, Config, HeadingStyle, RenderConfig, ResolverConfig};
pub use error::{Error, Result};
pub use inject::{
    ImportReport, html_to_plain_text, import_markdown, prepare_body_for_paste, set_title,
};
pub use inline::{escape_html, format_inline};
pub use page::{Marker, Page, Rect, Selector};
pub use resolver::{
    Resolution, Targets, find_body_target, find_title_target, wait_for_editors,
    wait_for_editors_within,
};
pub use snapshot::{ElementSpec, NodeId, PageSpec, Snapshot};
pub use source::{is_accepted_source, title_fallback_for};
pub use title::{extract_title, extract_title_or};

/// Parse markdown text into a vector of blocks.
pub fn parse(markdown: &str, config: &RenderConfig) -> Vec<Block> {
    parser::parse(markdown, config)
}

/// Convert markdown to an HTML fragment with a custom config.
pub fn render_markdown(markdown: &str, config: &RenderConfig) -> String {
    let blocks = parse(markdown, config);
    html::blocks_to_html(&blocks, config)
}

/// Convert markdown to an HTML fragment using the default config.
pub fn markdown_to_html(markdown: &str) -> String {
    render_markdown(markdown, &Config::compiled_default().render)
}
