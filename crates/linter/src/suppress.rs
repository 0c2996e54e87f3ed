//! Inline disable comments.
//!
//! ```scss
//! // sheetlint-disable-next-line no-id-selector, max-selector-depth
//! #legacy .a .b .c .d {}
//! .a { margin: 0px; } /* sheetlint-disable-line */
//! ```
//!
//! Without a list, every rule is suppressed on that line. Unknown rule
//! identifiers in the list are ignored.

use crate::diagnostics::Violation;
use crate::registry::{RuleId, RuleRegistry};
use sheetlint_syntax::Comment;
use sheetlint_types::LineIndex;
use std::collections::{HashMap, HashSet};

const DISABLE_NEXT_LINE: &str = "sheetlint-disable-next-line";
const DISABLE_LINE: &str = "sheetlint-disable-line";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Suppressed {
    All,
    Rules(HashSet<RuleId>),
}

/// Lines on which violations are suppressed, keyed by 1-based line.
#[derive(Debug, Default)]
pub(crate) struct Suppressions {
    lines: HashMap<u32, Suppressed>,
}

impl Suppressions {
    pub(crate) fn from_comments(
        comments: &[Comment],
        source: &str,
        index: &LineIndex,
        registry: &RuleRegistry,
    ) -> Self {
        let mut suppressions = Self::default();

        for comment in comments {
            let text = comment.text.trim();
            let (line, rest) = if let Some(rest) = text.strip_prefix(DISABLE_NEXT_LINE) {
                (index.position(source, comment.range.end).line + 1, rest)
            } else if let Some(rest) = text.strip_prefix(DISABLE_LINE) {
                (index.position(source, comment.range.start).line, rest)
            } else {
                continue;
            };

            // `sheetlint-disable-lines` is not a directive
            if !(rest.is_empty() || rest.starts_with(char::is_whitespace)) {
                continue;
            }

            let names: Vec<&str> = rest
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .collect();
            let suppressed = if names.is_empty() {
                Suppressed::All
            } else {
                Suppressed::Rules(
                    names
                        .iter()
                        .filter_map(|name| registry.lookup(name).map(|rule| rule.id))
                        .collect(),
                )
            };
            tracing::trace!(line, ?suppressed, "disable comment");
            suppressions.add(line, suppressed);
        }

        suppressions
    }

    fn add(&mut self, line: u32, suppressed: Suppressed) {
        let merged = match (self.lines.remove(&line), suppressed) {
            (Some(Suppressed::All), _) | (_, Suppressed::All) => Suppressed::All,
            (Some(Suppressed::Rules(mut existing)), Suppressed::Rules(more)) => {
                existing.extend(more);
                Suppressed::Rules(existing)
            }
            (None, rules) => rules,
        };
        self.lines.insert(line, merged);
    }

    /// Whether `violation`, reported on its starting line, is suppressed.
    pub(crate) fn suppresses(&self, violation: &Violation) -> bool {
        match self.lines.get(&violation.start.line) {
            Some(Suppressed::All) => true,
            Some(Suppressed::Rules(rules)) => rules
                .iter()
                .any(|rule| rule.as_str() == violation.rule),
            None => false,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
