//! Selector lists, compounds and simple selectors.

use crate::lexeme::{range_of, trim, LexKind, Lexeme};
use sheetlint_types::OffsetRange;

/// Relationship between two compound selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// whitespace
    Descendant,
    /// `>`
    Child,
    /// `+`
    Adjacent,
    /// `~`
    Sibling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimpleKind {
    Tag,
    Universal,
    Class,
    Id,
    PseudoClass,
    PseudoElement,
    Attribute,
    /// SCSS `&`, possibly with a suffix such as `&-active`
    Parent,
    /// SCSS `%name`
    Placeholder,
    /// SCSS `#{...}` standing alone
    Interpolation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleSelector {
    pub kind: SimpleKind,
    /// Name without its sigil (`.`, `#`, `:`, `%`); `&` keeps its text
    pub name: String,
    pub range: OffsetRange,
}

impl SimpleSelector {
    #[must_use]
    pub fn is_pseudo(&self) -> bool {
        matches!(self.kind, SimpleKind::PseudoClass | SimpleKind::PseudoElement)
    }

    /// A bare `&` with no suffix.
    #[must_use]
    pub fn is_bare_parent(&self) -> bool {
        self.kind == SimpleKind::Parent && self.name == "&"
    }
}

/// Simple selectors with no combinator between them, e.g. `a.active:hover`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compound {
    pub components: Vec<SimpleSelector>,
    pub range: OffsetRange,
}

impl Compound {
    fn new(components: Vec<SimpleSelector>) -> Self {
        let range = match (components.first(), components.last()) {
            (Some(first), Some(last)) => OffsetRange::new(first.range.start, last.range.end),
            _ => OffsetRange::default(),
        };
        Self { components, range }
    }

    #[must_use]
    pub fn has_parent_reference(&self) -> bool {
        self.components.iter().any(|c| c.kind == SimpleKind::Parent)
    }
}

/// One complex selector from a comma-separated list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Selector text with whitespace runs collapsed
    pub text: String,
    pub range: OffsetRange,
    pub compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`
    pub combinators: Vec<Combinator>,
    /// SCSS relative selector such as `> li` inside a parent rule
    pub leading: Option<Combinator>,
    /// Number of enclosing style rules
    pub nesting_depth: usize,
}

impl Selector {
    /// Combinators written in this selector, including a leading one.
    #[must_use]
    pub fn combinator_count(&self) -> usize {
        self.combinators.len() + usize::from(self.leading.is_some())
    }

    pub fn components(&self) -> impl Iterator<Item = &SimpleSelector> {
        self.compounds.iter().flat_map(|c| c.components.iter())
    }

    #[must_use]
    pub fn has_parent_reference(&self) -> bool {
        self.compounds.iter().any(Compound::has_parent_reference)
    }

    /// `&:hover`, `&::before`, `:focus-within`: only adds a state or
    /// pseudo-element to the parent.
    #[must_use]
    pub fn is_state_only(&self) -> bool {
        if self.leading.is_some() {
            return false;
        }
        let [compound] = self.compounds.as_slice() else {
            return false;
        };
        match compound.components.split_first() {
            Some((first, rest)) if first.is_bare_parent() => {
                !rest.is_empty() && rest.iter().all(SimpleSelector::is_pseudo)
            }
            Some(_) => compound.components.iter().all(SimpleSelector::is_pseudo),
            None => false,
        }
    }

    /// `.ie8 &`: the parent is referenced after another compound, so the
    /// rule styles the parent under an outer context.
    #[must_use]
    pub fn is_parent_context(&self) -> bool {
        self.compounds
            .iter()
            .skip(1)
            .any(|compound| compound.components.iter().any(SimpleSelector::is_bare_parent))
    }
}

/// Parse a selector list prelude. Returns `None` if any selector in the list
/// cannot be classified.
pub(crate) fn parse_selector_list(lexemes: &[Lexeme], nesting_depth: usize) -> Option<Vec<Selector>> {
    lexemes
        .split(|l| l.kind == LexKind::Comma)
        .map(|part| parse_selector(trim(part), nesting_depth))
        .collect()
}

fn parse_selector(lexemes: &[Lexeme], nesting_depth: usize) -> Option<Selector> {
    let range = range_of(lexemes)?;
    let mut compounds = Vec::new();
    let mut combinators = Vec::new();
    let mut leading = None;
    let mut current: Vec<SimpleSelector> = Vec::new();
    let mut pending: Option<Combinator> = None;
    let mut separated = false;
    let mut i = 0;

    while i < lexemes.len() {
        let lexeme = &lexemes[i];
        let explicit = match lexeme.kind {
            LexKind::Whitespace => {
                separated = true;
                i += 1;
                continue;
            }
            LexKind::Delim('>') => Some(Combinator::Child),
            LexKind::Delim('+') => Some(Combinator::Adjacent),
            LexKind::Delim('~') => Some(Combinator::Sibling),
            _ => None,
        };
        if let Some(combinator) = explicit {
            if pending.is_some() {
                return None;
            }
            pending = Some(combinator);
            i += 1;
            continue;
        }

        if current.is_empty() {
            if compounds.is_empty() {
                leading = pending.take();
            }
        } else if separated || pending.is_some() {
            compounds.push(Compound::new(std::mem::take(&mut current)));
            combinators.push(pending.take().unwrap_or(Combinator::Descendant));
        }
        separated = false;

        let (simple, consumed) = parse_simple(&lexemes[i..])?;
        if matches!(simple.kind, SimpleKind::Tag | SimpleKind::Universal) && !current.is_empty() {
            return None;
        }
        current.push(simple);
        i += consumed;
    }

    if pending.is_some() || current.is_empty() {
        return None;
    }
    compounds.push(Compound::new(current));

    let text = lexemes
        .iter()
        .map(|l| if l.is_whitespace() { " " } else { l.text.as_str() })
        .collect();

    Some(Selector {
        text,
        range,
        compounds,
        combinators,
        leading,
        nesting_depth,
    })
}

/// Parse one simple selector at the start of `lexemes`, returning it and the
/// number of lexemes consumed.
fn parse_simple(lexemes: &[Lexeme]) -> Option<(SimpleSelector, usize)> {
    let first = lexemes.first()?;
    let following = |n: usize| {
        lexemes
            .get(n)
            .filter(|next| lexemes[n - 1].touches(next))
            .map(|next| &next.kind)
    };

    let (kind, mut name, mut consumed) = match &first.kind {
        LexKind::Ident(name) => (SimpleKind::Tag, name.clone(), 1),
        LexKind::Delim('*') => (SimpleKind::Universal, "*".to_string(), 1),
        LexKind::Delim('&') => (SimpleKind::Parent, "&".to_string(), 1),
        LexKind::IdHash(name) | LexKind::Hash(name) => (SimpleKind::Id, name.clone(), 1),
        LexKind::Interpolation => (SimpleKind::Interpolation, first.text.clone(), 1),
        LexKind::Square => {
            let inner = first.text.get(1..first.text.len().saturating_sub(1))?;
            (SimpleKind::Attribute, inner.trim().to_string(), 1)
        }
        LexKind::Delim('.') => match following(1)? {
            LexKind::Ident(name) => (SimpleKind::Class, name.clone(), 2),
            LexKind::Interpolation => (SimpleKind::Class, lexemes[1].text.clone(), 2),
            _ => return None,
        },
        LexKind::Delim('%') => match following(1)? {
            LexKind::Ident(name) => (SimpleKind::Placeholder, name.clone(), 2),
            _ => return None,
        },
        LexKind::Colon => match following(1)? {
            LexKind::Colon => match following(2)? {
                LexKind::Ident(name) | LexKind::Function(name) => {
                    (SimpleKind::PseudoElement, name.clone(), 3)
                }
                _ => return None,
            },
            LexKind::Ident(name) | LexKind::Function(name) => {
                (SimpleKind::PseudoClass, name.clone(), 2)
            }
            _ => return None,
        },
        _ => return None,
    };

    // Suffixes glued on with no space: `&-active`, `.col-#{$i}`, `h#{$n}`.
    let extends = matches!(
        kind,
        SimpleKind::Tag
            | SimpleKind::Class
            | SimpleKind::Id
            | SimpleKind::Parent
            | SimpleKind::Placeholder
            | SimpleKind::Interpolation
    );
    while extends {
        match following(consumed) {
            Some(
                LexKind::Ident(_)
                | LexKind::Interpolation
                | LexKind::Number(_)
                | LexKind::Dimension { .. },
            ) => {
                name.push_str(&lexemes[consumed].text);
                consumed += 1;
            }
            _ => break,
        }
    }

    let range = OffsetRange::new(first.range.start, lexemes[consumed - 1].range.end);
    Some((SimpleSelector { kind, name, range }, consumed))
}
