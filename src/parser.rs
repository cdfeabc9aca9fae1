use regex::Regex;
use std::sync::OnceLock;

use crate::block::{Block, ListKind};
use crate::config::RenderConfig;

/// Normalize line endings and split a document into lines.
pub fn lines(markdown: &str) -> Vec<String> {
    markdown
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .split('\n')
        .map(str::to_string)
        .collect()
}

pub(crate) fn re_heading() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("heading regex"))
}

fn re_thematic_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:-{3,}|\*{3,})$").expect("thematic break regex"))
}

fn re_blockquote() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^>\s?(.*)$").expect("blockquote regex"))
}

pub(crate) fn re_unordered_item() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-*+]\s+(.+)$").expect("unordered item regex"))
}

pub(crate) fn re_ordered_item() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+[.)]\s+(.+)$").expect("ordered item regex"))
}

/// Parse markdown text into a list of blocks.
pub fn parse(markdown: &str, config: &RenderConfig) -> Vec<Block> {
    let mut state = ParseState::default();

    for line in lines(markdown) {
        process_line(line, config, &mut state);
    }

    state.finish()
}

#[derive(Default)]
struct ParseState {
    blocks: Vec<Block>,

    // Lines waiting to be merged into one paragraph
    paragraph: Vec<String>,

    // Code block state
    in_code_block: bool,
    code_language: Option<String>,
    code_lines: Vec<String>,

    // Set once the leading heading has been consumed as the title
    title_dropped: bool,
}

impl ParseState {
    fn flush_paragraph(&mut self) {
        if !self.paragraph.is_empty() {
            let lines = std::mem::take(&mut self.paragraph);
            self.blocks.push(Block::Paragraph { lines });
        }
    }

    fn emit(&mut self, block: Block) {
        self.flush_paragraph();
        self.blocks.push(block);
    }

    fn close_code_block(&mut self) {
        self.in_code_block = false;
        let language = self.code_language.take();
        let lines = std::mem::take(&mut self.code_lines);
        self.blocks.push(Block::CodeBlock { language, lines });
    }

    /// True until the first block with content has been emitted.
    fn at_document_start(&self) -> bool {
        !self.title_dropped
            && self.paragraph.is_empty()
            && !self.blocks.iter().any(Block::is_content)
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush_paragraph();
        if self.in_code_block {
            self.close_code_block();
        }
        self.blocks
    }
}

fn process_line(line: String, config: &RenderConfig, state: &mut ParseState) {
    let trimmed = line.trim();

    // Fences toggle code blocks
    if let Some(rest) = trimmed.strip_prefix("```") {
        if state.in_code_block {
            state.close_code_block();
        } else {
            state.flush_paragraph();
            let language = rest.trim();
            state.code_language = (!language.is_empty()).then(|| language.to_string());
            state.in_code_block = true;
        }
        return;
    }

    if state.in_code_block {
        state.code_lines.push(line);
        return;
    }

    if trimmed.is_empty() {
        state.emit(Block::BlankSeparator);
        return;
    }

    if config.support_media && re_thematic_break().is_match(trimmed) {
        state.emit(Block::ThematicBreak);
        return;
    }

    if let Some(caps) = re_heading().captures(trimmed) {
        let level = caps[1].len() as u8;
        let text = caps[2].trim().to_string();

        // The editor's title field shows this heading instead
        if level == 1 && config.skip_leading_h1 && state.at_document_start() {
            log::debug!("Dropping leading heading {text:?}");
            state.title_dropped = true;
            return;
        }

        state.emit(Block::Heading { level, text });
        return;
    }

    if config.support_media {
        if let Some(caps) = re_blockquote().captures(trimmed) {
            let text = caps[1].to_string();
            state.emit(Block::Blockquote { text });
            return;
        }
    }

    if let Some(caps) = re_unordered_item().captures(trimmed) {
        let text = caps[1].to_string();
        state.emit(Block::ListItem {
            kind: ListKind::Unordered,
            text,
        });
        return;
    }

    if let Some(caps) = re_ordered_item().captures(trimmed) {
        let text = caps[1].to_string();
        state.emit(Block::ListItem {
            kind: ListKind::Ordered,
            text,
        });
        return;
    }

    state.paragraph.push(trimmed.to_string());
}
