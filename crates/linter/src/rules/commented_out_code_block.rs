use crate::diagnostics::LintDiagnostic;
use crate::registry::RuleId;
use crate::traits::{CheckContext, StyleCheck};
use sheetlint_syntax::{parse, Comment, CommentKind, Dialect, Item, OffsetRange};

/// Reports comments whose content is complete declarations or rules.
/// Consecutive `//` lines are read as one comment.
pub struct CommentedOutCodeBlockRuleImpl;

impl StyleCheck for CommentedOutCodeBlockRuleImpl {
    fn id(&self) -> RuleId {
        RuleId::CommentedOutCodeBlock
    }

    fn check(&self, cx: CheckContext<'_>) -> Vec<LintDiagnostic> {
        group_comments(&cx.stylesheet.comments, cx.source)
            .into_iter()
            .filter(|group| is_code(&group.text))
            .map(|group| {
                LintDiagnostic::new(
                    RuleId::CommentedOutCodeBlock,
                    group.range,
                    RuleId::CommentedOutCodeBlock.message(&[]),
                )
            })
            .collect()
    }
}

struct CommentGroup {
    range: OffsetRange,
    text: String,
    kind: CommentKind,
}

/// Merge line comments on consecutive lines into one group each.
fn group_comments(comments: &[Comment], source: &str) -> Vec<CommentGroup> {
    let mut groups: Vec<CommentGroup> = Vec::new();

    for comment in comments {
        if let Some(last) = groups.last_mut() {
            if comment.kind == CommentKind::Line
                && last.kind == CommentKind::Line
                && on_next_line(source, last.range.end, comment.range.start)
            {
                last.range = OffsetRange::new(last.range.start, comment.range.end);
                last.text.push('\n');
                last.text.push_str(&comment.text);
                continue;
            }
        }
        groups.push(CommentGroup {
            range: comment.range,
            text: comment.text.clone(),
            kind: comment.kind,
        });
    }

    groups
}

fn on_next_line(source: &str, end: usize, start: usize) -> bool {
    source.get(end..start).is_some_and(|gap| {
        gap.chars().all(char::is_whitespace) && gap.matches('\n').count() == 1
    })
}

fn is_code(text: &str) -> bool {
    let text = text.trim();
    if !(text.ends_with(';') || text.ends_with('}')) {
        return false;
    }
    let Ok(stylesheet) = parse(text, Dialect::Scss) else {
        return false;
    };
    !stylesheet.items.is_empty() && stylesheet.items.iter().all(is_code_item)
}

fn is_code_item(item: &Item) -> bool {
    match item {
        Item::Declaration(declaration) => is_property_like(&declaration.property),
        Item::Rule(rule) => rule.selectors.is_some(),
        // `@todo fix this;` reads as an at-rule too
        Item::AtRule(_) => false,
    }
}

/// Property names are written in lowercase; prose like `Note: ...;` is not.
fn is_property_like(property: &str) -> bool {
    let name = property
        .strip_prefix('$')
        .or_else(|| property.strip_prefix("--"))
        .unwrap_or(property);
    name.starts_with(|c: char| c.is_ascii_lowercase() || c == '-')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}
