//! Owned stylesheet tree.

use crate::selector::Selector;
use sheetlint_types::{Dialect, OffsetRange};

/// A parsed stylesheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Stylesheet {
    pub dialect: Dialect,
    /// Top-level items in source order
    pub items: Vec<Item>,
    /// All comments, block and line, in source order
    pub comments: Vec<Comment>,
}

impl Stylesheet {
    /// Top-level style rules.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.items.iter().filter_map(Item::as_rule)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Rule(Rule),
    AtRule(AtRule),
    Declaration(Declaration),
}

impl Item {
    #[must_use]
    pub fn as_rule(&self) -> Option<&Rule> {
        match self {
            Self::Rule(rule) => Some(rule),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_declaration(&self) -> Option<&Declaration> {
        match self {
            Self::Declaration(declaration) => Some(declaration),
            _ => None,
        }
    }
}

/// A style rule: selector prelude plus block.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Raw prelude text as written
    pub prelude: String,
    pub prelude_range: OffsetRange,
    /// Parsed selector list, or `None` when the prelude is not a selector
    /// this crate can classify (keyframe offsets, nested property
    /// namespaces, exotic interpolation).
    pub selectors: Option<Vec<Selector>>,
    pub items: Vec<Item>,
    /// From the start of the prelude through the closing `}`
    pub range: OffsetRange,
}

impl Rule {
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.items.iter().filter_map(Item::as_declaration)
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.items.iter().filter_map(Item::as_rule)
    }
}

/// An at-rule such as `@media`, `@include` or `@use`.
#[derive(Debug, Clone, PartialEq)]
pub struct AtRule {
    /// Name without the `@`
    pub name: String,
    pub prelude: String,
    /// Child items, or `None` for statement at-rules ending in `;`
    pub block: Option<Vec<Item>>,
    pub range: OffsetRange,
}

impl AtRule {
    /// Returns `true` if the name matches ignoring ASCII case.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// A `property: value` declaration, including SCSS variable assignments.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: String,
    pub property_range: OffsetRange,
    /// Raw value text without trailing flags
    pub value: String,
    pub value_range: OffsetRange,
    /// Top-level value components; function arguments are not split
    pub components: Vec<ValueComponent>,
    pub important: bool,
    /// SCSS `!default`
    pub default: bool,
    /// From the property through the end of the value, excluding `;`
    pub range: OffsetRange,
}

impl Declaration {
    /// `$name: value`
    #[must_use]
    pub fn is_variable(&self) -> bool {
        self.property.starts_with('$')
    }

    /// `--name: value`
    #[must_use]
    pub fn is_custom_property(&self) -> bool {
        self.property.starts_with("--")
    }

    /// Returns `true` if the value refers to a variable, `var()` or an
    /// interpolation anywhere, including inside function arguments.
    #[must_use]
    pub fn has_variable_reference(&self) -> bool {
        self.components.iter().any(|component| match &component.kind {
            ValueKind::Variable | ValueKind::Interpolation => true,
            ValueKind::Function(name) => {
                name.eq_ignore_ascii_case("var")
                    || component.text.contains('$')
                    || component.text.contains("#{")
            }
            _ => false,
        })
    }

    /// Returns `true` if the value is exactly the unitless number `0`.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_bare_zero(&self) -> bool {
        matches!(
            self.components.as_slice(),
            [ValueComponent { kind: ValueKind::Number(n), .. }] if *n == 0.0
        )
    }
}

/// One top-level piece of a declaration value.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueComponent {
    pub kind: ValueKind,
    pub text: String,
    pub range: OffsetRange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    Number(f32),
    Dimension { value: f32, unit: String },
    Percentage(f32),
    /// `$name`
    Variable,
    Ident,
    /// Function call with its arguments; holds the function name
    Function(String),
    /// Quoted string or unquoted `url(...)`
    String,
    /// `#rgb` style hex colors
    Color,
    /// `#{...}`
    Interpolation,
    /// `,` or `/`
    Separator,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentKind {
    /// `/* ... */`
    Block,
    /// SCSS `// ...`
    Line,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
    /// Text without the comment markers
    pub text: String,
    /// Range including the markers
    pub range: OffsetRange,
}

/// A longhand property and the shorthand that can replace it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Longhand {
    /// The shorthand property, e.g. `margin` or `border-top-width`'s `border-width`
    pub shorthand: &'static str,
    /// Slot in shorthand order: top, right, bottom, left (or top-left,
    /// top-right, bottom-right, bottom-left for radii)
    pub slot: usize,
}

const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];
const CORNERS: [&str; 4] = ["top-left", "top-right", "bottom-right", "bottom-left"];

/// Map a four-sided longhand property to its shorthand family.
///
/// Recognized families are `margin-*`, `padding-*`, `border-*-width`,
/// `border-*-style`, `border-*-color` and `border-*-radius`.
#[must_use]
pub fn longhand_of(property: &str) -> Option<Longhand> {
    let property = property.to_ascii_lowercase();

    for shorthand in ["margin", "padding"] {
        if let Some(side) = property
            .strip_prefix(shorthand)
            .and_then(|rest| rest.strip_prefix('-'))
        {
            let slot = SIDES.iter().position(|s| *s == side)?;
            return Some(Longhand { shorthand, slot });
        }
    }

    let rest = property.strip_prefix("border-")?;
    if let Some(corner) = rest.strip_suffix("-radius") {
        let slot = CORNERS.iter().position(|c| *c == corner)?;
        return Some(Longhand {
            shorthand: "border-radius",
            slot,
        });
    }
    for (suffix, shorthand) in [
        ("-width", "border-width"),
        ("-style", "border-style"),
        ("-color", "border-color"),
    ] {
        if let Some(side) = rest.strip_suffix(suffix) {
            let slot = SIDES.iter().position(|s| *s == side)?;
            return Some(Longhand { shorthand, slot });
        }
    }
    None
}
