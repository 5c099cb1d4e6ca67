//! Block tree to canonical markdown
//!
//! Serialization is a pure function of the tree. The canonical form:
//! - blocks separated by a blank line, list items of one list by a single newline
//! - ATX headings, `-` bullets, ordered items renumbered from 1 within each run
//! - four spaces of indentation per list nesting level
//! - `**bold**`, `*italic*`, backtick code spans, `[text](url)` links
//! - fenced code blocks, `---` thematic breaks
//! - one trailing newline

use super::{Block, BlockKind, Span};

const INDENT: &str = "    ";

pub fn to_markdown(blocks: &[Block]) -> String {
    let mut out = String::new();
    let mut counters: Vec<u64> = Vec::new();
    let mut prev: Option<&Block> = None;

    for block in blocks.iter().filter(|b| !is_vacant(b)) {
        if let Some(prev) = prev {
            out.push_str(separator(prev, block));
        }
        match &block.kind {
            BlockKind::ListItem { number, depth } => {
                counters.truncate(depth + 1);
                counters.resize(depth + 1, 0);
                let marker = match number {
                    Some(_) => {
                        counters[*depth] += 1;
                        format!("{}. ", counters[*depth])
                    }
                    None => {
                        counters[*depth] = 0;
                        "- ".to_string()
                    }
                };
                write_list_item(&mut out, block, &marker, *depth);
            }
            _ => {
                counters.clear();
                write_block(&mut out, block);
            }
        }
        prev = Some(block);
    }

    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// Paragraphs and quotes emptied by an edit leave no trace in the output
fn is_vacant(block: &Block) -> bool {
    matches!(block.kind, BlockKind::Paragraph | BlockKind::Quote)
        && block.text().trim().is_empty()
}

fn separator(prev: &Block, next: &Block) -> &'static str {
    match (&prev.kind, &next.kind) {
        (
            BlockKind::ListItem {
                number: a,
                depth: da,
            },
            BlockKind::ListItem {
                number: b,
                depth: db,
            },
        ) => {
            // Switching between bullets and numbers at one depth starts a new list
            if da == db && a.is_some() != b.is_some() {
                "\n\n"
            } else {
                "\n"
            }
        }
        (BlockKind::Quote, BlockKind::Quote) => "\n>\n",
        _ => "\n\n",
    }
}

fn write_block(out: &mut String, block: &Block) {
    match &block.kind {
        BlockKind::Paragraph => {
            let text = render_inline(&block.spans);
            push_lines(out, &text, "");
        }
        BlockKind::Heading(level) => {
            let level = (*level).clamp(1, 6) as usize;
            out.push_str(&"#".repeat(level));
            let text = render_inline(&block.spans).replace('\n', " ");
            let text = text.trim();
            if !text.is_empty() {
                out.push(' ');
                out.push_str(text);
            }
        }
        BlockKind::Quote => {
            let text = render_inline(&block.spans);
            for (i, line) in text.split('\n').enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                let line = escape_line_start(line.trim());
                if line.is_empty() {
                    out.push('>');
                } else {
                    out.push_str("> ");
                    out.push_str(&line);
                }
            }
        }
        BlockKind::CodeBlock { info } => {
            let code = block.text();
            let fence = code_fence(&code);
            out.push_str(&fence);
            out.push_str(info);
            out.push('\n');
            if !code.is_empty() {
                out.push_str(&code);
                out.push('\n');
            }
            out.push_str(&fence);
        }
        BlockKind::Rule => out.push_str("---"),
        BlockKind::Html => out.push_str(block.text().trim_end_matches('\n')),
        // Numbering needs the surrounding run; to_markdown handles ordered items
        BlockKind::ListItem { depth, .. } => write_list_item(out, block, "- ", *depth),
    }
}

fn write_list_item(out: &mut String, block: &Block, marker: &str, depth: usize) {
    let indent = INDENT.repeat(depth);
    let continuation = format!("{}{}", indent, " ".repeat(marker.len()));
    out.push_str(&indent);
    let text = render_inline(&block.spans);
    if text.trim().is_empty() {
        out.push_str(marker.trim_end());
        return;
    }
    out.push_str(marker);
    push_lines(out, &text, &continuation);
}

/// Write paragraph-like text line by line, trimming each line and escaping
/// characters that would turn it into another block at line start
fn push_lines(out: &mut String, text: &str, rest_prefix: &str) {
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            out.push_str(rest_prefix);
        }
        out.push_str(&escape_line_start(line.trim()));
    }
}

fn code_fence(code: &str) -> String {
    let longest = code
        .lines()
        .map(|line| line.trim_start().chars().take_while(|&c| c == '`').count())
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}

fn render_inline(spans: &[Span]) -> String {
    let mut out = String::new();
    for span in spans {
        if span.marks.code {
            render_code(&mut out, &span.text, span.marks.link.as_deref());
            continue;
        }
        if span.marks.is_plain() {
            out.push_str(&escape_inline(&span.text));
            continue;
        }

        // Delimiters must hug the text: keep surrounding whitespace outside
        let core = span.text.trim();
        let leading = &span.text[..span.text.len() - span.text.trim_start().len()];
        let trailing = &span.text[span.text.trim_end().len()..];
        out.push_str(leading);
        if !core.is_empty() {
            let mut text = escape_inline(core);
            if span.marks.italic {
                text = format!("*{}*", text);
            }
            if span.marks.bold {
                text = format!("**{}**", text);
            }
            if let Some(url) = &span.marks.link {
                text = format!("[{}]({})", text, url);
            }
            out.push_str(&text);
        }
        out.push_str(trailing);
    }
    out
}

fn render_code(out: &mut String, code: &str, link: Option<&str>) {
    let code = code.replace('\n', " ");
    let rendered = if code.contains('`') {
        format!("`` {} ``", code)
    } else {
        format!("`{}`", code)
    };
    match link {
        Some(url) => out.push_str(&format!("[{}]({})", rendered, url)),
        None => out.push_str(&rendered),
    }
}

/// Backslash-escape characters with inline meaning
fn escape_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '*' | '_' | '`' | '[' | ']' | '<') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Escape a leading block marker (`#`, `>`, `-`, `+`, `=`, `~`, `1.`) so the
/// line stays paragraph text
fn escape_line_start(line: &str) -> String {
    let mut chars = line.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let second = chars.next();

    let needs_escape = match first {
        '#' | '>' | '=' | '~' => true,
        '-' | '+' => second.is_none() || second == Some(' ') || line.chars().all(|c| c == first || c == ' '),
        _ => false,
    };
    if needs_escape {
        return format!("\\{}", line);
    }

    // "12. text" or "3) text"
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 && digits <= 9 {
        let rest = &line[digits..];
        let mut rest_chars = rest.chars();
        if let Some(delim @ ('.' | ')')) = rest_chars.next() {
            let after = rest_chars.next();
            if after.is_none() || after == Some(' ') {
                return format!("{}\\{}{}", &line[..digits], delim, &rest[1..]);
            }
        }
    }
    line.to_string()
}

#[cfg(test)]
mod tests {
    use super::super::parse_markdown;
    use super::*;

    fn roundtrip(markdown: &str) -> String {
        to_markdown(&parse_markdown(markdown))
    }

    #[test]
    fn test_canonical_forms() {
        assert_eq!(roundtrip("Title\n=====\n"), "# Title\n");
        assert_eq!(roundtrip("* a\n* b\n"), "- a\n- b\n");
        assert_eq!(roundtrip("_x_ and __y__\n"), "*x* and **y**\n");
        assert_eq!(roundtrip("***\n"), "---\n");
        assert_eq!(roundtrip("    code\n"), "```\ncode\n```\n");
    }

    #[test]
    fn test_ordered_lists_renumber_from_one() {
        assert_eq!(roundtrip("5. a\n6. b\n"), "1. a\n2. b\n");
    }

    #[test]
    fn test_nested_lists_indent_four_spaces() {
        assert_eq!(
            roundtrip("- a\n  - b\n- c\n"),
            "- a\n    - b\n- c\n"
        );
    }

    #[test]
    fn test_list_kind_switch_is_separated() {
        assert_eq!(roundtrip("- a\n\n1. b\n"), "- a\n\n1. b\n");
    }

    #[test]
    fn test_quote_paragraphs() {
        assert_eq!(roundtrip("> a\n>\n> b\n"), "> a\n>\n> b\n");
    }

    #[test]
    fn test_plain_text_is_escaped() {
        let blocks = vec![Block::with_text(BlockKind::Paragraph, "2*3 = [six]")];
        assert_eq!(to_markdown(&blocks), "2\\*3 = \\[six\\]\n");
        assert_eq!(to_markdown(&parse_markdown(&to_markdown(&blocks))), to_markdown(&blocks));
    }

    #[test]
    fn test_line_start_markers_are_escaped() {
        let blocks = vec![Block::with_text(BlockKind::Paragraph, "# not a heading\n- not a list\n1. nor this")];
        let md = to_markdown(&blocks);
        assert_eq!(md, "\\# not a heading\n\\- not a list\n1\\. nor this\n");
        let reparsed = parse_markdown(&md);
        assert_eq!(reparsed.len(), 1);
        assert_eq!(reparsed[0].kind, BlockKind::Paragraph);
    }

    #[test]
    fn test_marks_keep_whitespace_outside_delimiters() {
        let mut bold = Span::plain(" world ");
        bold.marks.bold = true;
        let blocks = vec![Block {
            kind: BlockKind::Paragraph,
            spans: vec![Span::plain("hello"), bold, Span::plain("again")],
        }];
        assert_eq!(to_markdown(&blocks), "hello **world** again\n");
    }

    #[test]
    fn test_code_span_with_backtick() {
        assert_eq!(roundtrip("`` a`b ``\n"), "`` a`b ``\n");
    }

    #[test]
    fn test_code_fence_grows_past_inner_fence() {
        let blocks = vec![Block::with_text(
            BlockKind::CodeBlock {
                info: "md".to_string(),
            },
            "```\ninner\n```",
        )];
        let md = to_markdown(&blocks);
        assert!(md.starts_with("````md\n"));
        assert_eq!(parse_markdown(&md), blocks);
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(to_markdown(&[]), "");
    }

    #[test]
    fn test_emptied_paragraphs_are_skipped() {
        let blocks = vec![
            Block::with_text(BlockKind::Paragraph, "A"),
            Block::new(BlockKind::Paragraph),
            Block::with_text(BlockKind::Quote, "  "),
            Block::with_text(BlockKind::Paragraph, "C"),
        ];
        assert_eq!(to_markdown(&blocks), "A\n\nC\n");
        assert_eq!(to_markdown(&[Block::new(BlockKind::Paragraph)]), "");
    }

    #[test]
    fn test_serialization_converges() {
        let inputs = [
            "# A\nText with *mixed* **marks** and `code`.\n\n* one\n* two\n    1. nested\n\n> quote\n\n| a | b |\n|---|---|\n",
            "Setext\n---\n\nline one  \nline two\n\n<div>\nhtml\n</div>\n",
            "1) a\n2) b\n\n***bold italic***\n",
        ];
        for input in inputs {
            let once = roundtrip(input);
            assert_eq!(roundtrip(&once), once, "not stable for {:?}", input);
        }
    }
}
