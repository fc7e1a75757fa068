use std::fmt;
use std::ops::Range;

use regex::Regex;

use super::buffer::{EditBuffer, InvariantViolation};
use super::lines::line_span_at;

pub const BOLD_PLACEHOLDER: &str = "bold text";
pub const ITALIC_PLACEHOLDER: &str = "italic text";
pub const LINK_PLACEHOLDER: &str = "link text";
pub const LINK_URL_PLACEHOLDER: &str = "url";
pub const CODE_PLACEHOLDER: &str = "code";
pub const CODE_BLOCK_PLACEHOLDER: &str = "code block";

const LIST_PREFIX: &str = "- ";

/// ATX heading level, always within 1..=6
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub const fn new(level: u8) -> Option<Self> {
        match level {
            1..=6 => Some(Self(level)),
            _ => None,
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// `#` repeated `level` times followed by a single space
    pub fn prefix(self) -> String {
        let mut prefix = "#".repeat(self.0 as usize);
        prefix.push(' ');
        prefix
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = u8;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level).ok_or(level)
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single formatting toolbar action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transformation {
    Bold,
    Italic,
    Heading(HeadingLevel),
    ListToggle,
    Link,
    Code,
}

impl Transformation {
    /// Resolve a toolbar action tag.
    ///
    /// `heading` needs a `level` in 1..=6. Anything unrecognized yields `None`
    /// so newer toolbars can send tags older engines simply ignore.
    pub fn from_action(tag: &str, level: Option<u8>) -> Option<Self> {
        match tag {
            "bold" => Some(Self::Bold),
            "italic" => Some(Self::Italic),
            "heading" => level.and_then(HeadingLevel::new).map(Self::Heading),
            "list" => Some(Self::ListToggle),
            "link" => Some(Self::Link),
            "code" => Some(Self::Code),
            _ => None,
        }
    }
}

/// Text after a transformation and where the caret should be placed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    pub text: String,
    pub caret: usize,
}

impl Transformed {
    /// Turn the result back into a buffer with a collapsed selection.
    ///
    /// Every transformation leaves `caret` on a char boundary within `text`,
    /// so this cannot fail for results produced by [`EditBuffer::apply`].
    pub fn into_buffer(self) -> Result<EditBuffer, InvariantViolation> {
        EditBuffer::with_caret(self.text, self.caret)
    }
}

impl EditBuffer {
    /// Apply a toolbar transformation at the current selection.
    pub fn apply(&self, transformation: Transformation) -> Transformed {
        match transformation {
            Transformation::Bold => self.wrap("**", "**", BOLD_PLACEHOLDER),
            Transformation::Italic => self.wrap("_", "_", ITALIC_PLACEHOLDER),
            Transformation::Heading(level) => self.set_heading(level),
            Transformation::ListToggle => self.toggle_list(),
            Transformation::Link => self.link(),
            Transformation::Code => {
                if self.selected().contains('\n') {
                    self.wrap("```\n", "\n```", CODE_BLOCK_PLACEHOLDER)
                } else {
                    self.wrap("`", "`", CODE_PLACEHOLDER)
                }
            }
        }
    }

    /// The result of doing nothing: same text, caret at the selection end
    pub fn unchanged(&self) -> Transformed {
        Transformed {
            text: self.text().to_string(),
            caret: self.selection().end,
        }
    }

    /// Surround the selection (or `placeholder` if empty) with markers.
    /// The caret lands right after the closing marker.
    fn wrap(&self, open: &str, close: &str, placeholder: &str) -> Transformed {
        let inner = self.selected_or(placeholder);
        let before = self.before();

        let mut text = String::with_capacity(
            self.text().len() + open.len() + close.len() + placeholder.len(),
        );
        text.push_str(before);
        text.push_str(open);
        text.push_str(inner);
        text.push_str(close);
        let caret = text.len();
        text.push_str(self.after());

        Transformed { text, caret }
    }

    /// `[selection](url)` with the caret at the start of the url placeholder
    fn link(&self) -> Transformed {
        let inner = self.selected_or(LINK_PLACEHOLDER);

        let mut text = String::with_capacity(self.text().len() + 16);
        text.push_str(self.before());
        text.push('[');
        text.push_str(inner);
        text.push_str("](");
        let caret = text.len();
        text.push_str(LINK_URL_PLACEHOLDER);
        text.push(')');
        text.push_str(self.after());

        Transformed { text, caret }
    }

    fn set_heading(&self, level: HeadingLevel) -> Transformed {
        let selection = self.selection();
        let line = line_span_at(self.text(), selection.start);
        let line_text = &self.text()[line.start..line.end];

        let existing = heading_prefix_len(line_text);
        let prefix = level.prefix();

        let text = splice(self.text(), line.start..line.start + existing, &prefix);

        let content_start = line.start + existing;
        let caret = if selection.end >= content_start {
            selection.end - existing + prefix.len()
        } else {
            line.start + prefix.len()
        };

        Transformed { text, caret }
    }

    fn toggle_list(&self) -> Transformed {
        let start = self.selection().start;
        let line = line_span_at(self.text(), start);
        let line_text = &self.text()[line.start..line.end];

        if line_text.starts_with(LIST_PREFIX) {
            let text = splice(
                self.text(),
                line.start..line.start + LIST_PREFIX.len(),
                "",
            );
            let caret = start.saturating_sub(LIST_PREFIX.len()).max(line.start);
            Transformed { text, caret }
        } else {
            let text = splice(self.text(), line.start..line.start, LIST_PREFIX);
            Transformed {
                text,
                caret: start + LIST_PREFIX.len(),
            }
        }
    }

    fn selected_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        let selected = self.selected();
        if selected.is_empty() {
            placeholder
        } else {
            selected
        }
    }
}

/// Byte length of a leading `#{1,6} ` marker, or 0 when the line has none
fn heading_prefix_len(line: &str) -> usize {
    use std::sync::OnceLock;

    static HEADING_PREFIX: OnceLock<Regex> = OnceLock::new();
    let heading_prefix = HEADING_PREFIX
        .get_or_init(|| Regex::new(r"^#{1,6} ").expect("Invalid heading prefix regex"));

    heading_prefix.find(line).map_or(0, |m| m.end())
}

/// Replace `range` of `text` with `replacement`
fn splice(text: &str, range: Range<usize>, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len() + replacement.len());
    out.push_str(&text[..range.start]);
    out.push_str(replacement);
    out.push_str(&text[range.end..]);
    out
}

/// Apply `transformation` to `text` at `selection`.
pub fn transform(
    text: &str,
    selection: Range<usize>,
    transformation: Transformation,
) -> Result<Transformed, InvariantViolation> {
    let buffer = EditBuffer::new(text, selection)?;
    Ok(buffer.apply(transformation))
}

/// Apply a toolbar action given by its string tag.
///
/// The selection is validated before the tag is looked at, so a bad range
/// is reported for every tag. An unrecognized tag is a no-op.
pub fn transform_action(
    text: &str,
    selection: Range<usize>,
    tag: &str,
    level: Option<u8>,
) -> Result<Transformed, InvariantViolation> {
    let buffer = EditBuffer::new(text, selection)?;
    match Transformation::from_action(tag, level) {
        Some(transformation) => Ok(buffer.apply(transformation)),
        None => {
            log::debug!("ignoring unrecognized toolbar action {tag:?}");
            Ok(buffer.unchanged())
        }
    }
}
