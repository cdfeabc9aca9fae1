/// Which kind of list a list item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

impl ListKind {
    pub(crate) fn tag(self) -> &'static str {
        match self {
            ListKind::Ordered => "ol",
            ListKind::Unordered => "ul",
        }
    }
}

/// Block-level elements parsed from Markdown.
///
/// Text fields hold raw Markdown; inline formatting happens when the block
/// is rendered. List items are kept flat and grouped into containers by the
/// HTML renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: u8,
        text: String,
    },
    Paragraph {
        lines: Vec<String>,
    },
    CodeBlock {
        language: Option<String>,
        lines: Vec<String>,
    },
    ListItem {
        kind: ListKind,
        text: String,
    },
    Blockquote {
        text: String,
    },
    ThematicBreak,
    BlankSeparator,
}

impl Block {
    /// Blank separators carry no content of their own.
    pub fn is_content(&self) -> bool {
        !matches!(self, Block::BlankSeparator)
    }
}
