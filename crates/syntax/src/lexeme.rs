//! Owned tokens collected for one rule prelude or declaration.

use cssparser::Token;
use sheetlint_types::OffsetRange;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LexKind {
    Whitespace,
    Ident(String),
    AtKeyword(String),
    /// `#name` where the name is not a valid identifier start
    Hash(String),
    IdHash(String),
    Str,
    Url,
    Delim(char),
    Number(f32),
    Percentage(f32),
    Dimension {
        value: f32,
        unit: String,
    },
    Colon,
    Comma,
    /// A function call including its arguments
    Function(String),
    Parens,
    Square,
    /// SCSS `#{...}`
    Interpolation,
    Other,
}

impl LexKind {
    pub(crate) fn from_token(token: &Token<'_>) -> Self {
        match token {
            Token::WhiteSpace(_) => Self::Whitespace,
            Token::Ident(name) => Self::Ident(name.to_string()),
            Token::AtKeyword(name) => Self::AtKeyword(name.to_string()),
            Token::Hash(name) => Self::Hash(name.to_string()),
            Token::IDHash(name) => Self::IdHash(name.to_string()),
            Token::QuotedString(_) => Self::Str,
            Token::UnquotedUrl(_) => Self::Url,
            Token::Delim(c) => Self::Delim(*c),
            Token::Number { value, .. } => Self::Number(*value),
            Token::Percentage { unit_value, .. } => Self::Percentage(*unit_value),
            Token::Dimension { value, unit, .. } => Self::Dimension {
                value: *value,
                unit: unit.to_string(),
            },
            Token::Colon => Self::Colon,
            Token::Comma => Self::Comma,
            Token::Function(name) => Self::Function(name.to_string()),
            Token::ParenthesisBlock => Self::Parens,
            Token::SquareBracketBlock => Self::Square,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Lexeme {
    pub kind: LexKind,
    /// Source text, including the arguments of blocks and functions
    pub text: String,
    pub range: OffsetRange,
}

impl Lexeme {
    pub(crate) fn is_whitespace(&self) -> bool {
        self.kind == LexKind::Whitespace
    }

    /// Returns `true` if `next` starts exactly where this lexeme ends.
    pub(crate) fn touches(&self, next: &Self) -> bool {
        self.range.end == next.range.start
    }
}

/// Strip leading and trailing whitespace lexemes.
pub(crate) fn trim(lexemes: &[Lexeme]) -> &[Lexeme] {
    let start = lexemes
        .iter()
        .position(|l| !l.is_whitespace())
        .unwrap_or(lexemes.len());
    let end = lexemes
        .iter()
        .rposition(|l| !l.is_whitespace())
        .map_or(start, |i| i + 1);
    &lexemes[start..end]
}

/// Concatenate the source text of a run of lexemes.
pub(crate) fn text_of(lexemes: &[Lexeme]) -> String {
    lexemes.iter().map(|l| l.text.as_str()).collect()
}

/// Range spanning a non-empty run of lexemes.
pub(crate) fn range_of(lexemes: &[Lexeme]) -> Option<OffsetRange> {
    let first = lexemes.first()?;
    let last = lexemes.last()?;
    Some(OffsetRange::new(first.range.start, last.range.end))
}
