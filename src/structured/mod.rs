//! Structured document tree owned by the structured view
//!
//! The tree is a flat list of blocks, each holding inline spans with marks.
//!
//! # Position indexing
//!
//! Every block occupies `len + 2` positions: an opening token, one position per
//! character, and a closing token. For a block starting at `p`, its characters
//! live at `[p + 1, p + 1 + len)`. The document size is the sum over all blocks.
//!
//! ```text
//! "# Hi\n\nok"   ->  [open] H i [close] [open] o k [close]
//!                      0    1 2    3      4    5 6    7
//! ```
//!
//! A range spanning several blocks is joined into its first block when replaced.

mod parse;
mod serialize;

pub use parse::parse_markdown;
pub use serialize::to_markdown;

use crate::error::{CoreError, CoreResult};

/// Inline formatting carried by a span
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Marks {
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
    pub link: Option<String>,
}

impl Marks {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

/// A run of text with uniform marks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub marks: Marks,
}

impl Span {
    pub fn new(text: impl Into<String>, marks: Marks) -> Self {
        Self {
            text: text.into(),
            marks,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Marks::plain())
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    /// ATX heading, level 1-6
    Heading(u8),
    /// List item at a nesting depth (0 = top level). `number` is set for ordered items.
    ListItem { number: Option<u64>, depth: usize },
    /// Paragraph inside a block quote
    Quote,
    /// Fenced code block with its info string
    CodeBlock { info: String },
    /// Thematic break
    Rule,
    /// Raw HTML block, kept verbatim
    Html,
}

impl BlockKind {
    /// Blocks whose content is raw text rather than marked-up inline spans
    pub fn is_raw(&self) -> bool {
        matches!(self, BlockKind::CodeBlock { .. } | BlockKind::Html)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub spans: Vec<Span>,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            spans: Vec::new(),
        }
    }

    pub fn with_text(kind: BlockKind, text: impl Into<String>) -> Self {
        let mut block = Self::new(kind);
        block.spans.push(Span::plain(text));
        normalize_spans(&mut block.spans);
        block
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.spans.iter().map(Span::char_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.text.is_empty())
    }

    /// Plain text with marks stripped
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Number of positions the block occupies
    fn size(&self) -> usize {
        self.len() + 2
    }
}

/// The structured view's document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredDoc {
    blocks: Vec<Block>,
}

impl StructuredDoc {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Parse canonical or hand-written markdown into a tree
    pub fn parse(markdown: &str) -> Self {
        Self::new(parse_markdown(markdown))
    }

    /// Serialize back to canonical markdown
    pub fn to_markdown(&self) -> String {
        to_markdown(&self.blocks)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Total number of positions
    pub fn size(&self) -> usize {
        self.blocks.iter().map(Block::size).sum()
    }

    /// Position of block `idx`'s opening token
    pub fn block_start(&self, idx: usize) -> usize {
        self.blocks[..idx].iter().map(Block::size).sum()
    }

    /// Resolve a position to `(block index, character offset)`.
    ///
    /// Opening and closing tokens resolve to the start and end of their block.
    pub fn resolve(&self, pos: usize) -> Option<(usize, usize)> {
        let mut start = 0;
        for (idx, block) in self.blocks.iter().enumerate() {
            let len = block.len();
            if pos < start + len + 2 {
                return Some((idx, pos.saturating_sub(start + 1).min(len)));
            }
            start += len + 2;
        }
        // The very end of the document belongs to the last block
        if pos == start {
            let last = self.blocks.len().checked_sub(1)?;
            return Some((last, self.blocks[last].len()));
        }
        None
    }

    /// Characters covered by `[from, to)`, with no separator between blocks
    pub fn text_between(&self, from: usize, to: usize) -> String {
        let mut out = String::new();
        let mut start = 0;
        for block in &self.blocks {
            let content_start = start + 1;
            let content_end = content_start + block.len();
            let lo = from.max(content_start);
            let hi = to.min(content_end);
            if lo < hi {
                out.extend(
                    block
                        .text()
                        .chars()
                        .skip(lo - content_start)
                        .take(hi - lo),
                );
            }
            start = content_end + 1;
            if start >= to {
                break;
            }
        }
        out
    }

    pub fn check_range(&self, from: usize, to: usize) -> CoreResult<()> {
        let size = self.size();
        if to < from {
            return Err(CoreError::InvalidRange { from, to });
        }
        if to > size || self.blocks.is_empty() {
            return Err(CoreError::OutOfBounds { from, to, size });
        }
        Ok(())
    }

    /// Replace `[from, to)` with markdown `text`.
    ///
    /// Single-line text is inserted inline, keeping its surrounding whitespace.
    /// Multi-line text is parsed into blocks that split the host block. Inside
    /// code and HTML blocks the text is inserted verbatim.
    pub fn replace_markdown(&mut self, from: usize, to: usize, text: &str) -> CoreResult<()> {
        self.check_range(from, to)?;
        let (first, head_at) = self.resolve(from).ok_or(CoreError::OutOfBounds {
            from,
            to,
            size: self.size(),
        })?;
        let (last, tail_at) = self.resolve(to).ok_or(CoreError::OutOfBounds {
            from,
            to,
            size: self.size(),
        })?;

        let host = self.blocks[first].kind.clone();
        let (head, _) = split_spans(&self.blocks[first].spans, head_at);
        let (_, tail) = split_spans(&self.blocks[last].spans, tail_at);

        let replacement = if host.is_raw() {
            vec![Block {
                kind: host,
                spans: join_spans(head, vec![Span::plain(text)], tail),
            }]
        } else {
            let whole_block = is_blank(&head) && is_blank(&tail);
            splice_fragment(host, head, Fragment::parse(text, whole_block), tail)
        };

        self.blocks.splice(first..=last, replacement);
        Ok(())
    }
}

/// Parsed replacement text
enum Fragment {
    Inline(Vec<Span>),
    Blocks(Vec<Block>),
}

impl Fragment {
    /// A single line only becomes a block of its own kind when it replaces a
    /// whole block. Inside a block, block markers are kept as literal text.
    fn parse(text: &str, whole_block: bool) -> Self {
        if !text.contains('\n') {
            let trimmed = text.trim();
            let blocks = parse_markdown(trimmed);
            if let [block] = blocks.as_slice() {
                if block.kind == BlockKind::Paragraph {
                    // Markdown trims paragraphs; keep the caller's whitespace
                    let leading = &text[..text.len() - text.trim_start().len()];
                    let trailing = &text[text.trim_end().len()..];
                    let mut spans = vec![Span::plain(leading)];
                    spans.extend(block.spans.iter().cloned());
                    spans.push(Span::plain(trailing));
                    return Fragment::Inline(spans);
                }
            }
            if blocks.is_empty() || !whole_block {
                return Fragment::Inline(vec![Span::plain(text)]);
            }
            return Fragment::Blocks(blocks);
        }
        Fragment::Blocks(parse_markdown(text))
    }
}

fn splice_fragment(host: BlockKind, head: Vec<Span>, fragment: Fragment, tail: Vec<Span>) -> Vec<Block> {
    let mut blocks = match fragment {
        Fragment::Inline(spans) => vec![Block {
            kind: host,
            spans: join_spans(head, spans, tail),
        }],
        Fragment::Blocks(mut parsed) => match parsed.len() {
            0 => vec![Block {
                kind: host,
                spans: join_spans(head, Vec::new(), tail),
            }],
            1 => {
                let only = parsed.remove(0);
                let replaces_whole_block = is_blank(&head) && is_blank(&tail);
                let kind = if replaces_whole_block { only.kind } else { host };
                vec![Block {
                    kind,
                    spans: join_spans(head, only.spans, tail),
                }]
            }
            n => {
                let last = parsed.pop().map(|b| (b.kind, b.spans));
                let first = parsed.remove(0);
                let mut out = Vec::with_capacity(n);
                out.push(Block {
                    kind: host,
                    spans: join_spans(head, first.spans, Vec::new()),
                });
                out.extend(parsed);
                if let Some((kind, spans)) = last {
                    out.push(Block {
                        kind,
                        spans: join_spans(Vec::new(), spans, tail),
                    });
                }
                out
            }
        },
    };

    // A thematic break cannot hold text
    for block in &mut blocks {
        if block.kind == BlockKind::Rule && !block.is_empty() {
            block.kind = BlockKind::Paragraph;
        }
    }
    blocks
}

fn is_blank(spans: &[Span]) -> bool {
    spans.iter().all(|s| s.text.is_empty())
}

fn join_spans(head: Vec<Span>, middle: Vec<Span>, tail: Vec<Span>) -> Vec<Span> {
    let mut spans = head;
    spans.extend(middle);
    spans.extend(tail);
    normalize_spans(&mut spans);
    spans
}

/// Split spans at a character offset
pub(crate) fn split_spans(spans: &[Span], at: usize) -> (Vec<Span>, Vec<Span>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut seen = 0;
    for span in spans {
        let len = span.char_len();
        if seen + len <= at {
            left.push(span.clone());
        } else if seen >= at {
            right.push(span.clone());
        } else {
            let cut = span
                .text
                .char_indices()
                .nth(at - seen)
                .map(|(byte, _)| byte)
                .unwrap_or(span.text.len());
            left.push(Span::new(&span.text[..cut], span.marks.clone()));
            right.push(Span::new(&span.text[cut..], span.marks.clone()));
        }
        seen += len;
    }
    (left, right)
}

/// Drop empty spans and merge neighbours with identical marks
pub(crate) fn normalize_spans(spans: &mut Vec<Span>) {
    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans.drain(..) {
        if span.text.is_empty() {
            continue;
        }
        match merged.last_mut() {
            Some(prev) if prev.marks == span.marks => prev.text.push_str(&span.text),
            _ => merged.push(span),
        }
    }
    *spans = merged;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold() -> Marks {
        Marks {
            bold: true,
            ..Marks::default()
        }
    }

    #[test]
    fn test_positions_and_size() {
        let doc = StructuredDoc::parse("# Hi\n\nok\n");
        assert_eq!(doc.blocks().len(), 2);
        assert_eq!(doc.size(), 8);
        assert_eq!(doc.block_start(1), 4);
        assert_eq!(doc.resolve(0), Some((0, 0)));
        assert_eq!(doc.resolve(1), Some((0, 0)));
        assert_eq!(doc.resolve(3), Some((0, 2)));
        assert_eq!(doc.resolve(5), Some((1, 0)));
        assert_eq!(doc.resolve(8), Some((1, 2)));
        assert_eq!(doc.resolve(9), None);
    }

    #[test]
    fn test_text_between_skips_block_tokens() {
        let doc = StructuredDoc::parse("# Hi\n\nok\n");
        assert_eq!(doc.text_between(1, 3), "Hi");
        assert_eq!(doc.text_between(0, 8), "Hiok");
        assert_eq!(doc.text_between(2, 6), "io");
        assert_eq!(doc.text_between(3, 5), "");
    }

    #[test]
    fn test_text_between_ignores_marks() {
        let doc = StructuredDoc::parse("Hello **bold** world\n");
        assert_eq!(doc.text_between(7, 11), "bold");
    }

    #[test]
    fn test_replace_inline_keeps_whitespace() {
        let mut doc = StructuredDoc::parse("Hello world\n");
        doc.replace_markdown(1, 6, "Hi").unwrap();
        assert_eq!(doc.to_markdown(), "Hi world\n");

        let mut doc = StructuredDoc::parse("Hello world\n");
        doc.replace_markdown(6, 12, " there ").unwrap();
        assert_eq!(doc.blocks()[0].text(), "Hello there ");
    }

    #[test]
    fn test_replace_inline_parses_marks() {
        let mut doc = StructuredDoc::parse("Hello world\n");
        doc.replace_markdown(7, 12, "**earth**").unwrap();
        let spans = &doc.blocks()[0].spans;
        assert_eq!(spans[0], Span::plain("Hello "));
        assert_eq!(spans[1], Span::new("earth", bold()));
    }

    #[test]
    fn test_replace_empty_text_deletes() {
        let mut doc = StructuredDoc::parse("Hello world\n");
        doc.replace_markdown(6, 12, "").unwrap();
        assert_eq!(doc.to_markdown(), "Hello\n");
    }

    #[test]
    fn test_replace_across_blocks_joins_into_first() {
        let mut doc = StructuredDoc::parse("# Title\n\nBody text\n");
        // "tle" .. "Body" spans the heading/paragraph boundary
        assert_eq!(doc.text_between(3, 12), "tleBody");
        doc.replace_markdown(3, 12, "-").unwrap();
        assert_eq!(doc.blocks().len(), 1);
        assert_eq!(doc.blocks()[0].kind, BlockKind::Heading(1));
        assert_eq!(doc.blocks()[0].text(), "Ti- text");
    }

    #[test]
    fn test_replace_multiline_splits_host() {
        let mut doc = StructuredDoc::parse("one two three\n");
        doc.replace_markdown(5, 8, "A\n\n# B\n\nC").unwrap();
        let kinds: Vec<_> = doc.blocks().iter().map(|b| b.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![BlockKind::Paragraph, BlockKind::Heading(1), BlockKind::Paragraph]
        );
        assert_eq!(doc.blocks()[0].text(), "one A");
        assert_eq!(doc.blocks()[2].text(), "C three");
    }

    #[test]
    fn test_replace_whole_block_takes_fragment_kind() {
        let mut doc = StructuredDoc::parse("plain\n");
        doc.replace_markdown(1, 6, "# Heading").unwrap();
        assert_eq!(doc.blocks()[0].kind, BlockKind::Heading(1));
        assert_eq!(doc.to_markdown(), "# Heading\n");
    }

    #[test]
    fn test_replace_inside_block_keeps_block_markers_as_text() {
        for (text, expected) in [
            ("# tag", "Hello # tag\n"),
            ("---", "Hello ---\n"),
            ("- item", "Hello - item\n"),
            ("> x", "Hello > x\n"),
            ("1.", "Hello 1.\n"),
        ] {
            let mut doc = StructuredDoc::parse("Hello world\n");
            doc.replace_markdown(7, 12, text).unwrap();
            assert_eq!(doc.blocks().len(), 1, "{:?}", text);
            assert_eq!(doc.blocks()[0].kind, BlockKind::Paragraph);
            assert_eq!(doc.blocks()[0].text(), format!("Hello {}", text));
            assert_eq!(doc.to_markdown(), expected);
        }
    }

    #[test]
    fn test_block_marker_at_line_start_is_escaped() {
        let mut doc = StructuredDoc::parse("world peace\n");
        doc.replace_markdown(1, 6, "# tag").unwrap();
        assert_eq!(doc.blocks()[0].kind, BlockKind::Paragraph);
        assert_eq!(doc.to_markdown(), "\\# tag peace\n");
        assert_eq!(StructuredDoc::parse(&doc.to_markdown()).blocks()[0].text(), "# tag peace");
    }

    #[test]
    fn test_rule_replaces_whole_block() {
        let mut doc = StructuredDoc::parse("A\n\nB\n\nC\n");
        doc.replace_markdown(4, 5, "---").unwrap();
        assert_eq!(doc.blocks()[1].kind, BlockKind::Rule);
        assert_eq!(doc.to_markdown(), "A\n\n---\n\nC\n");
    }

    #[test]
    fn test_replace_in_code_block_is_verbatim() {
        let mut doc = StructuredDoc::parse("```\nlet x = 1;\n```\n");
        doc.replace_markdown(9, 10, "**2**").unwrap();
        assert_eq!(doc.blocks()[0].text(), "let x = **2**;");
    }

    #[test]
    fn test_replace_out_of_bounds() {
        let mut doc = StructuredDoc::parse("abc\n");
        assert_eq!(
            doc.replace_markdown(1, 9, "x"),
            Err(CoreError::OutOfBounds {
                from: 1,
                to: 9,
                size: 5
            })
        );
        assert_eq!(doc.blocks()[0].text(), "abc");
    }

    #[test]
    fn test_split_and_normalize_spans() {
        let spans = vec![Span::plain("ab"), Span::new("cd", bold())];
        let (left, right) = split_spans(&spans, 3);
        assert_eq!(left, vec![Span::plain("ab"), Span::new("c", bold())]);
        assert_eq!(right, vec![Span::new("d", bold())]);

        let mut joined = vec![
            Span::plain("a"),
            Span::plain(""),
            Span::plain("b"),
            Span::new("c", bold()),
        ];
        normalize_spans(&mut joined);
        assert_eq!(joined, vec![Span::plain("ab"), Span::new("c", bold())]);
    }

    #[test]
    fn test_multibyte_positions_are_characters() {
        let mut doc = StructuredDoc::parse("héllo wörld\n");
        assert_eq!(doc.text_between(7, 12), "wörld");
        doc.replace_markdown(7, 12, "world").unwrap();
        assert_eq!(doc.to_markdown(), "héllo world\n");
    }
}
