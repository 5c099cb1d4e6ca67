//! Markdown to block tree using pulldown-cmark

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use super::{normalize_spans, Block, BlockKind, Marks, Span};

/// Parse markdown into a flat block list.
///
/// Only CommonMark core syntax is recognised. Constructs outside the supported
/// subset (tables, images, nested quotes) degrade to their text content.
pub fn parse_markdown(markdown: &str) -> Vec<Block> {
    let parser = Parser::new_ext(markdown, Options::empty());
    let mut builder = TreeBuilder::default();
    for event in parser {
        builder.handle(event);
    }
    builder.finish_block();
    builder.blocks
}

#[derive(Default)]
struct TreeBuilder {
    blocks: Vec<Block>,
    current: Option<Block>,
    /// Open lists, innermost last. Ordered lists carry their next item number.
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    bold: usize,
    italic: usize,
    links: Vec<String>,
}

impl TreeBuilder {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                let marks = if self.in_raw_block() {
                    Marks::plain()
                } else {
                    self.marks()
                };
                self.push_text(&text, marks);
            }
            Event::Code(code) => {
                let marks = Marks {
                    code: true,
                    ..self.marks()
                };
                self.push_text(&code, marks);
            }
            Event::Html(html) => {
                if self.current.is_none() {
                    self.current = Some(Block::new(BlockKind::Html));
                }
                self.push_text(&html, Marks::plain());
            }
            Event::InlineHtml(html) => {
                let marks = self.marks();
                self.push_text(&html, marks);
            }
            Event::SoftBreak | Event::HardBreak => self.push_text("\n", Marks::plain()),
            Event::Rule => {
                self.finish_block();
                self.blocks.push(Block::new(BlockKind::Rule));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                // Loose list items wrap their text in paragraphs; keep it in the item
                if let Some(block) = &mut self.current {
                    if matches!(block.kind, BlockKind::ListItem { .. }) {
                        if !block.is_empty() {
                            block.spans.push(Span::plain("\n"));
                        }
                        return;
                    }
                }
                self.finish_block();
                self.current = Some(Block::new(self.paragraph_kind()));
            }
            Tag::Heading { level, .. } => {
                self.finish_block();
                self.current = Some(Block::new(BlockKind::Heading(level as u8)));
            }
            Tag::List(start) => {
                self.finish_block();
                self.lists.push(start);
            }
            Tag::Item => {
                self.finish_block();
                let depth = self.lists.len().saturating_sub(1);
                let number = match self.lists.last_mut() {
                    Some(Some(next)) => {
                        let number = *next;
                        *next += 1;
                        Some(number)
                    }
                    _ => None,
                };
                self.current = Some(Block::new(BlockKind::ListItem { number, depth }));
            }
            Tag::BlockQuote(_) => {
                self.finish_block();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(kind) => {
                self.finish_block();
                let info = match kind {
                    CodeBlockKind::Fenced(info) => info.trim().to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.current = Some(Block::new(BlockKind::CodeBlock { info }));
            }
            Tag::HtmlBlock => {
                self.finish_block();
                self.current = Some(Block::new(BlockKind::Html));
            }
            Tag::Emphasis => self.italic += 1,
            Tag::Strong => self.bold += 1,
            Tag::Link { dest_url, .. } => self.links.push(dest_url.to_string()),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                let in_item = self
                    .current
                    .as_ref()
                    .is_some_and(|b| matches!(b.kind, BlockKind::ListItem { .. }));
                if !in_item {
                    self.finish_block();
                }
            }
            TagEnd::Heading(_) | TagEnd::Item => self.finish_block(),
            TagEnd::List(_) => {
                self.finish_block();
                self.lists.pop();
            }
            TagEnd::BlockQuote(_) => {
                self.finish_block();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::CodeBlock | TagEnd::HtmlBlock => {
                if let Some(block) = &mut self.current {
                    trim_trailing_newline(block);
                }
                self.finish_block();
            }
            TagEnd::Emphasis => self.italic = self.italic.saturating_sub(1),
            TagEnd::Strong => self.bold = self.bold.saturating_sub(1),
            TagEnd::Link => {
                self.links.pop();
            }
            _ => {}
        }
    }

    fn paragraph_kind(&self) -> BlockKind {
        if self.quote_depth > 0 {
            BlockKind::Quote
        } else {
            BlockKind::Paragraph
        }
    }

    fn in_raw_block(&self) -> bool {
        self.current.as_ref().is_some_and(|b| b.kind.is_raw())
    }

    fn marks(&self) -> Marks {
        Marks {
            bold: self.bold > 0,
            italic: self.italic > 0,
            code: false,
            link: self.links.last().cloned(),
        }
    }

    fn push_text(&mut self, text: &str, marks: Marks) {
        let kind = self.paragraph_kind();
        let block = self.current.get_or_insert_with(|| Block::new(kind));
        match block.spans.last_mut() {
            Some(last) if last.marks == marks => last.text.push_str(text),
            _ => block.spans.push(Span::new(text, marks)),
        }
    }

    fn finish_block(&mut self) {
        if let Some(mut block) = self.current.take() {
            normalize_spans(&mut block.spans);
            self.blocks.push(block);
        }
    }
}

/// Code blocks lose the newline before their closing fence; HTML blocks lose all trailing newlines
fn trim_trailing_newline(block: &mut Block) {
    let strip_all = block.kind == BlockKind::Html;
    if let Some(last) = block.spans.last_mut() {
        if strip_all {
            let len = last.text.trim_end_matches('\n').len();
            last.text.truncate(len);
        } else if last.text.ends_with('\n') {
            last.text.pop();
        }
    }
}
