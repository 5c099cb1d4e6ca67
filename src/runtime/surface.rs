//! Host surfaces that render surface commands

use std::ops::Range;

use crate::adapter::StructuredCommand;

/// The editing widgets a host provides. The runtime drives them from commands.
pub trait Surface {
    /// Show `content` in the source view, selecting `select` if given
    fn sync_text(&mut self, content: &str, select: Option<Range<usize>>);
    /// Rebuild the structured view from markdown
    fn sync_structured(&mut self, markdown: &str);
    /// Replay edit commands on the structured view
    fn replay_structured(&mut self, commands: &[StructuredCommand]);
    fn copy_to_clipboard(&mut self, text: &str);
    fn show_message(&mut self, message: &str);
}

/// Surface without a UI: records what it was told to show
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlessSurface {
    pub text: String,
    pub text_selection: Option<Range<usize>>,
    pub markdown: String,
    pub replayed: Vec<StructuredCommand>,
    pub clipboard: Option<String>,
    pub messages: Vec<String>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_message(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }
}

impl Surface for HeadlessSurface {
    fn sync_text(&mut self, content: &str, select: Option<Range<usize>>) {
        self.text = content.to_string();
        self.text_selection = select;
    }

    fn sync_structured(&mut self, markdown: &str) {
        self.markdown = markdown.to_string();
        self.replayed.clear();
    }

    fn replay_structured(&mut self, commands: &[StructuredCommand]) {
        self.replayed.extend_from_slice(commands);
    }

    fn copy_to_clipboard(&mut self, text: &str) {
        self.clipboard = Some(text.to_string());
    }

    fn show_message(&mut self, message: &str) {
        tracing::info!("{}", message);
        self.messages.push(message.to_string());
    }
}
