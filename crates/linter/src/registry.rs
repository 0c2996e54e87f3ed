//! Rule identifiers and the table of rule metadata.

use sheetlint_types::Severity;
use std::fmt;

/// Rule identifier of the synthetic violation reported for unparseable files.
pub const PARSE_ERROR: &str = "parse-error";

/// Rule identifier of the synthetic violation reported for unreadable files.
pub const IO_ERROR: &str = "io-error";

/// Identifier of a style rule. The set is closed; identifiers are stable and
/// appear in config files, disable comments and output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleId {
    MaxSelectorDepth,
    NoIdSelector,
    NoTagQualifiedIdOrClass,
    ZeroNeedsNoUnit,
    PreferShorthand,
    RestrictNestingPurpose,
    CommentedOutCodeBlock,
    ClassNamePattern,
}

impl RuleId {
    pub const ALL: [Self; 8] = [
        Self::MaxSelectorDepth,
        Self::NoIdSelector,
        Self::NoTagQualifiedIdOrClass,
        Self::ZeroNeedsNoUnit,
        Self::PreferShorthand,
        Self::RestrictNestingPurpose,
        Self::CommentedOutCodeBlock,
        Self::ClassNamePattern,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MaxSelectorDepth => "max-selector-depth",
            Self::NoIdSelector => "no-id-selector",
            Self::NoTagQualifiedIdOrClass => "no-tag-qualified-id-or-class",
            Self::ZeroNeedsNoUnit => "zero-needs-no-unit",
            Self::PreferShorthand => "prefer-shorthand",
            Self::RestrictNestingPurpose => "restrict-nesting-purpose",
            Self::CommentedOutCodeBlock => "commented-out-code-block",
            Self::ClassNamePattern => "class-name-pattern",
        }
    }

    /// Shape of the message the rule reports, with `{placeholders}`.
    #[must_use]
    pub const fn template(self) -> &'static str {
        match self {
            Self::MaxSelectorDepth => {
                "Selector `{selector}` has a depth of {depth}, more than the allowed {max}"
            }
            Self::NoIdSelector => "Avoid the id selector `#{id}`; use a class instead",
            Self::NoTagQualifiedIdOrClass => {
                "`{selector}` qualifies `{qualified}` with the tag `{tag}`; drop the tag"
            }
            Self::ZeroNeedsNoUnit => "Zero needs no unit; write `0` instead of `{value}`",
            Self::PreferShorthand => "{longhands} can be written as `{shorthand}`",
            Self::RestrictNestingPurpose => {
                "Nested selector `{selector}` only adds specificity; nest states (`&:hover`) or contexts (`.theme &`)"
            }
            Self::CommentedOutCodeBlock => {
                "Commented-out code; delete it instead of keeping it in a comment"
            }
            Self::ClassNamePattern => "Class `.{class}` does not match the pattern `{pattern}`",
        }
    }

    /// Fill the rule's template. Each `{name}` with a matching argument is
    /// replaced once; substituted text is not expanded again.
    #[must_use]
    pub fn message(self, args: &[(&str, &str)]) -> String {
        fill(self.template(), args)
    }

    /// Look up a rule by its identifier. Synthetic identifiers such as
    /// [`PARSE_ERROR`] are not rules and return `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == name)
    }
}

fn fill(template: &str, args: &[(&str, &str)]) -> String {
    let mut message = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        message.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let argument = after.find('}').and_then(|close| {
            let name = &after[..close];
            args.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });
        match argument {
            Some((close, value)) => {
                message.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                message.push('{');
                rest = after;
            }
        }
    }
    message.push_str(rest);
    message
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The part of the tree a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Selector,
    Declaration,
    Value,
    Comment,
}

impl NodeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Selector => "selector",
            Self::Declaration => "declaration",
            Self::Value => "value",
            Self::Comment => "comment",
        }
    }
}

/// Metadata describing one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    pub id: RuleId,
    pub description: &'static str,
    /// Shape of the message the rule reports, with `{placeholders}`
    pub message: &'static str,
    pub default_severity: Severity,
    pub node_kind: NodeKind,
    pub enabled_by_default: bool,
    /// Whether the rule attaches auto-fixes to its violations
    pub fixable: bool,
}

/// Immutable table of every known rule, in [`RuleId::ALL`] order.
///
/// Built once at startup and passed to whatever needs it.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: Vec<StyleRule>,
}

impl RuleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: RuleId::ALL.into_iter().map(describe).collect(),
        }
    }

    /// Metadata for `id`.
    #[must_use]
    pub fn get(&self, id: RuleId) -> &StyleRule {
        // `rules` holds every id in declaration order
        &self.rules[id as usize]
    }

    /// Resolve a configured identifier.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&StyleRule> {
        RuleId::from_name(name).map(|id| self.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyleRule> {
        self.rules.iter()
    }

    /// Every rule identifier, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.rules.iter().map(|rule| rule.id.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn describe(id: RuleId) -> StyleRule {
    let (description, default_severity, node_kind) = match id {
        RuleId::MaxSelectorDepth => (
            "Limit how many levels a selector reaches, counting the rules it is nested in",
            Severity::Warning,
            NodeKind::Selector,
        ),
        RuleId::NoIdSelector => (
            "Disallow id selectors",
            Severity::Error,
            NodeKind::Selector,
        ),
        RuleId::NoTagQualifiedIdOrClass => (
            "Disallow ids and classes qualified by a tag name",
            Severity::Warning,
            NodeKind::Selector,
        ),
        RuleId::ZeroNeedsNoUnit => (
            "Disallow units on zero lengths",
            Severity::Warning,
            NodeKind::Value,
        ),
        RuleId::PreferShorthand => (
            "Prefer a shorthand property over all four of its longhands",
            Severity::Warning,
            NodeKind::Declaration,
        ),
        RuleId::RestrictNestingPurpose => (
            "Only nest selectors that add a state or an outer context to the parent",
            Severity::Warning,
            NodeKind::Selector,
        ),
        RuleId::CommentedOutCodeBlock => (
            "Disallow commented-out declarations and rules",
            Severity::Warning,
            NodeKind::Comment,
        ),
        RuleId::ClassNamePattern => (
            "Require class names to match a pattern",
            Severity::Warning,
            NodeKind::Selector,
        ),
    };

    StyleRule {
        id,
        description,
        message: id.template(),
        default_severity,
        node_kind,
        enabled_by_default: id != RuleId::ClassNamePattern,
        fixable: id == RuleId::ZeroNeedsNoUnit,
    }
}
