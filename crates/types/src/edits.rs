//! Text edit types for auto-fixes.

use crate::OffsetRange;

/// A text edit representing a change to apply to source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Byte offset range to replace
    pub offset_range: OffsetRange,
    /// The text to replace the range with (empty string means deletion)
    pub new_text: String,
}

impl TextEdit {
    /// Create a new text edit that replaces a range with new text.
    #[must_use]
    pub fn new(start: usize, end: usize, new_text: impl Into<String>) -> Self {
        Self {
            offset_range: OffsetRange::new(start, end),
            new_text: new_text.into(),
        }
    }
}

/// A fix that can be applied to resolve a violation.
///
/// Fixes have a human-readable label and one or more text edits
/// that should be applied together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFix {
    /// Human-readable description of what the fix does
    pub label: String,
    /// The text edits to apply
    pub edits: Vec<TextEdit>,
}

impl CodeFix {
    /// Create a new code fix with a label and edits.
    #[must_use]
    pub fn new(label: impl Into<String>, edits: Vec<TextEdit>) -> Self {
        Self {
            label: label.into(),
            edits,
        }
    }

    /// Create a single-replacement fix.
    #[must_use]
    pub fn replace(
        label: impl Into<String>,
        start: usize,
        end: usize,
        new_text: impl Into<String>,
    ) -> Self {
        Self::new(label, vec![TextEdit::new(start, end, new_text)])
    }
}

/// Apply a set of edits to `source`.
///
/// Edits are applied back to front so earlier offsets stay valid. An edit
/// that overlaps one already applied, falls outside the text, or does not
/// land on a character boundary is skipped. Returns the new text and the
/// number of edits applied.
#[must_use]
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> (String, usize) {
    let mut ordered: Vec<&TextEdit> = edits.iter().collect();
    ordered.sort_by(|a, b| b.offset_range.cmp(&a.offset_range));

    let mut result = source.to_string();
    let mut applied: Vec<OffsetRange> = Vec::new();

    for edit in ordered {
        let range = edit.offset_range;
        if range.end > source.len()
            || range.start > range.end
            || !source.is_char_boundary(range.start)
            || !source.is_char_boundary(range.end)
            || applied.iter().any(|done| done.overlaps(&range))
        {
            continue;
        }
        result.replace_range(range.start..range.end, &edit.new_text);
        applied.push(range);
    }

    (result, applied.len())
}
