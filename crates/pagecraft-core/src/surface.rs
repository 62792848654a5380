//! Interface to the host rich-text surface.
//!
//! The page body is edited by a host surface (a browser `contenteditable`, a
//! native rich-text widget). The core never parses its markup: it sends
//! formatting commands, reads the markup back as an opaque string, and pushes
//! restored markup after undo/redo.

use chrono::NaiveDate;

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

/// Formatting command applied to the current selection of the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Align(TextAlign),
    UnorderedList,
    OrderedList,
    Indent,
    Outdent,
    Superscript,
    Subscript,
    RemoveFormat,
    HorizontalRule,
    ForeColor(String),
    HighlightColor(String),
    FontName(String),
    FontSize(String),
    /// Replace the selection with markup.
    InsertHtml(String),
}

impl FormatCommand {
    /// Command name and argument in the `execCommand` vocabulary.
    pub fn exec_command(&self) -> (&'static str, Option<&str>) {
        match self {
            FormatCommand::Bold => ("bold", None),
            FormatCommand::Italic => ("italic", None),
            FormatCommand::Underline => ("underline", None),
            FormatCommand::Strikethrough => ("strikeThrough", None),
            FormatCommand::Align(TextAlign::Left) => ("justifyLeft", None),
            FormatCommand::Align(TextAlign::Center) => ("justifyCenter", None),
            FormatCommand::Align(TextAlign::Right) => ("justifyRight", None),
            FormatCommand::Align(TextAlign::Justify) => ("justifyFull", None),
            FormatCommand::UnorderedList => ("insertUnorderedList", None),
            FormatCommand::OrderedList => ("insertOrderedList", None),
            FormatCommand::Indent => ("indent", None),
            FormatCommand::Outdent => ("outdent", None),
            FormatCommand::Superscript => ("superscript", None),
            FormatCommand::Subscript => ("subscript", None),
            FormatCommand::RemoveFormat => ("removeFormat", None),
            FormatCommand::HorizontalRule => ("insertHorizontalRule", None),
            FormatCommand::ForeColor(color) => ("foreColor", Some(color.as_str())),
            FormatCommand::HighlightColor(color) => ("hiliteColor", Some(color.as_str())),
            FormatCommand::FontName(name) => ("fontName", Some(name.as_str())),
            FormatCommand::FontSize(size) => ("fontSize", Some(size.as_str())),
            FormatCommand::InsertHtml(html) => ("insertHTML", Some(html.as_str())),
        }
    }

    /// Wrap `text` in a span carrying a single CSS declaration.
    pub fn custom_style(property: &str, value: &str, text: &str) -> Self {
        FormatCommand::InsertHtml(inline_span(&format!("{}: {}", property, value), text))
    }

    /// A long-form date such as "October 17, 2026".
    pub fn date(date: NaiveDate) -> Self {
        FormatCommand::InsertHtml(format!("<span>{}</span>", date.format("%B %-d, %Y")))
    }

    /// A ruled signature line.
    pub fn signature() -> Self {
        FormatCommand::InsertHtml(SIGNATURE_MARKUP.to_string())
    }
}

const SIGNATURE_MARKUP: &str = "<div style=\"margin-top: 50px; border-top: 1px solid #000; width: 180px; padding-top: 5px; font-size: 0.9em; font-family: 'Inter', sans-serif;\">Signature</div>";

/// A host rich-text surface.
pub trait TextSurface {
    /// Apply a formatting command to the current selection.
    fn execute(&mut self, command: &FormatCommand);

    /// Current markup.
    fn content(&self) -> String;

    /// Replace the markup (after undo/redo or a document load).
    fn set_content(&mut self, markup: &str);

    /// Plain text of the current selection, if any.
    fn selected_text(&self) -> Option<String>;
}

/// Markup for `text` wrapped in a span with an inline `style` attribute.
pub fn inline_span(style: &str, text: &str) -> String {
    format!(
        "<span style=\"{}\">{}</span>",
        escape(style, true),
        escape(text, false)
    )
}

fn escape(input: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Tracks the markup last pushed to the surface so unchanged content is not
/// pushed again (which would reset the caret).
#[derive(Debug, Clone, Default)]
pub struct ContentSync {
    last_synced: Option<String>,
}

impl ContentSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `markup` to the surface unless it is what the surface already
    /// holds. Returns true if the surface was updated.
    pub fn sync(&mut self, surface: &mut dyn TextSurface, markup: &str) -> bool {
        if self.last_synced.as_deref() == Some(markup) {
            return false;
        }
        if surface.content() != markup {
            surface.set_content(markup);
        }
        self.last_synced = Some(markup.to_string());
        true
    }

    /// Record markup that came from the surface itself.
    pub fn observe(&mut self, markup: &str) {
        self.last_synced = Some(markup.to_string());
    }

    /// Forget the last synced markup so the next sync always pushes.
    pub fn invalidate(&mut self) {
        self.last_synced = None;
    }
}
