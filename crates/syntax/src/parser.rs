//! Block-structure parser on top of the cssparser tokenizer.
//!
//! The parser works in two layers. Blocks are walked with
//! [`Parser::parse_nested_block`], and everything between two block
//! boundaries (a rule prelude, a declaration, an at-rule statement) is
//! collected into owned [`Lexeme`]s and then classified.

use crate::error::{ParseError, SyntaxError};
use crate::lexeme::{range_of, text_of, trim, LexKind, Lexeme};
use crate::scan;
use crate::selector::parse_selector_list;
use crate::tree::{
    AtRule, Comment, CommentKind, Declaration, Item, Rule, Stylesheet, ValueComponent, ValueKind,
};
use cssparser::{ParseErrorKind, Parser, ParserInput, SourcePosition, Token};
use sheetlint_types::{Dialect, LineIndex, OffsetRange};

type CssError<'i> = cssparser::ParseError<'i, SyntaxError>;

fn fail<'i>(offset: usize, message: impl Into<String>) -> CssError<'i> {
    cssparser::ParseError {
        kind: ParseErrorKind::Custom(SyntaxError::new(offset, message)),
        location: cssparser::SourceLocation { line: 0, column: 1 },
    }
}

/// Parse CSS or SCSS source into a [`Stylesheet`].
///
/// Parsing stops at the first syntax error.
#[tracing::instrument(skip(source), fields(len = source.len()))]
pub fn parse(source: &str, dialect: Dialect) -> Result<Stylesheet, ParseError> {
    let index = LineIndex::new(source);
    let locate = |error: SyntaxError| {
        let position = index.position(source, error.offset);
        ParseError {
            message: error.message,
            offset: error.offset,
            line: position.line,
            column: position.column,
        }
    };

    let prepared = scan::prepare(source, dialect).map_err(&locate)?;

    let mut input = ParserInput::new(&prepared.text);
    let mut parser = Parser::new(&mut input);
    let mut cx = Context::default();
    let items = parse_items(&mut parser, &mut cx, 0, BlockKind::Normal).map_err(|error| {
        let error = match error.kind {
            ParseErrorKind::Custom(error) => error,
            ParseErrorKind::Basic(kind) => {
                let offset = index
                    .line_start(error.location.line + 1)
                    .map_or(source.len(), |start| {
                        start + error.location.column.saturating_sub(1) as usize
                    });
                SyntaxError::new(offset, format!("{kind:?}"))
            }
        };
        locate(error)
    })?;

    let mut comments = prepared.line_comments;
    comments.extend(cx.comments);
    comments.sort_by_key(|comment| comment.range.start);

    tracing::trace!(items = items.len(), comments = comments.len(), "parsed stylesheet");

    Ok(Stylesheet {
        dialect,
        items,
        comments,
    })
}

#[derive(Default)]
struct Context {
    comments: Vec<Comment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Normal,
    /// Direct children of `@keyframes`; their preludes are offsets, not selectors
    Keyframes,
}

enum Terminator {
    Semicolon,
    End,
    Block(SourcePosition),
}

fn parse_items<'i>(
    p: &mut Parser<'i, '_>,
    cx: &mut Context,
    depth: usize,
    kind: BlockKind,
) -> Result<Vec<Item>, CssError<'i>> {
    let mut items = Vec::new();
    loop {
        let state = p.state();
        let before = p.position();
        let start = before.byte_index();
        let token = match p.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        match token {
            Token::WhiteSpace(_) | Token::Semicolon | Token::CDO | Token::CDC => {}
            Token::Comment(_) => record_comment(p, cx, before)?,
            Token::CloseCurlyBracket | Token::CloseParenthesis | Token::CloseSquareBracket => {
                return Err(fail(start, "unexpected closing bracket"));
            }
            _ => {
                p.reset(&state);
                if let Some(item) = parse_item(p, cx, depth, kind)? {
                    items.push(item);
                }
            }
        }
    }
    Ok(items)
}

fn parse_item<'i>(
    p: &mut Parser<'i, '_>,
    cx: &mut Context,
    depth: usize,
    kind: BlockKind,
) -> Result<Option<Item>, CssError<'i>> {
    let mut lexemes: Vec<Lexeme> = Vec::new();

    let terminator = loop {
        let before = p.position();
        let start = before.byte_index();
        let token = match p.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break Terminator::End,
        };
        match token {
            Token::Semicolon => break Terminator::Semicolon,
            Token::CurlyBracketBlock => {
                match lexemes.last_mut() {
                    Some(hash) if hash.kind == LexKind::Delim('#') && hash.range.end == start => {
                        skip_block(p, cx)?;
                        hash.kind = LexKind::Interpolation;
                        hash.text.push_str(p.slice_from(before));
                        hash.range.end = p.position().byte_index();
                    }
                    _ => break Terminator::Block(before),
                }
            }
            Token::Comment(_) => record_comment(p, cx, before)?,
            Token::BadString(_) => return Err(fail(start, "unterminated string")),
            Token::BadUrl(_) => return Err(fail(start, "malformed `url()`")),
            Token::CloseCurlyBracket | Token::CloseParenthesis | Token::CloseSquareBracket => {
                return Err(fail(start, "unexpected closing bracket"));
            }
            token => {
                let kind = LexKind::from_token(&token);
                if matches!(
                    token,
                    Token::Function(_) | Token::ParenthesisBlock | Token::SquareBracketBlock
                ) {
                    skip_block(p, cx)?;
                }
                lexemes.push(Lexeme {
                    kind,
                    text: p.slice_from(before).to_string(),
                    range: OffsetRange::new(start, p.position().byte_index()),
                });
            }
        }
    };

    let head = trim(&lexemes);

    match terminator {
        Terminator::Block(open) => {
            let open_offset = open.byte_index();
            let item_start = head.first().map_or(open_offset, |l| l.range.start);

            if let Some(LexKind::AtKeyword(name)) = head.first().map(|l| &l.kind) {
                let name = name.clone();
                let child_kind = if name.to_ascii_lowercase().ends_with("keyframes") {
                    BlockKind::Keyframes
                } else {
                    BlockKind::Normal
                };
                let prelude = trim(&head[1..]);
                let mut block =
                    p.parse_nested_block(|nested| parse_items(nested, cx, depth, child_kind))?;
                let end = p.position().byte_index();
                if name.eq_ignore_ascii_case("at-root") {
                    block = at_root_block(prelude, depth, block, end);
                }
                return Ok(Some(Item::AtRule(AtRule {
                    name,
                    prelude: text_of(prelude),
                    block: Some(block),
                    range: OffsetRange::new(item_start, end),
                })));
            }

            let Some(prelude_range) = range_of(head) else {
                return Err(fail(open_offset, "expected a selector before `{`"));
            };
            let selectors = match kind {
                BlockKind::Keyframes => None,
                BlockKind::Normal => parse_selector_list(head, depth),
            };
            let items = p
                .parse_nested_block(|nested| parse_items(nested, cx, depth + 1, BlockKind::Normal))?;
            Ok(Some(Item::Rule(Rule {
                prelude: text_of(head),
                prelude_range,
                selectors,
                items,
                range: OffsetRange::new(item_start, p.position().byte_index()),
            })))
        }
        Terminator::Semicolon | Terminator::End => {
            let Some(range) = range_of(head) else {
                return Ok(None);
            };
            if let LexKind::AtKeyword(name) = &head[0].kind {
                return Ok(Some(Item::AtRule(AtRule {
                    name: name.clone(),
                    prelude: text_of(trim(&head[1..])),
                    block: None,
                    range,
                })));
            }
            parse_declaration(head).map(|d| Some(Item::Declaration(d)))
        }
    }
}

/// `@at-root .sel { ... }` is shorthand for `@at-root { .sel { ... } }`;
/// the selector prelude becomes a rule wrapping the block. A query such as
/// `(without: media)` leaves the block as is.
fn at_root_block(prelude: &[Lexeme], depth: usize, items: Vec<Item>, end: usize) -> Vec<Item> {
    let Some(prelude_range) = range_of(prelude) else {
        return items;
    };
    if prelude[0].kind == LexKind::Parens {
        return items;
    }
    vec![Item::Rule(Rule {
        prelude: text_of(prelude),
        prelude_range,
        selectors: parse_selector_list(prelude, depth),
        items,
        range: OffsetRange::new(prelude_range.start, end),
    })]
}

fn parse_declaration<'i>(lexemes: &[Lexeme]) -> Result<Declaration, CssError<'i>> {
    let start = lexemes.first().map_or(0, |l| l.range.start);
    let Some(colon) = lexemes.iter().position(|l| l.kind == LexKind::Colon) else {
        return Err(fail(start, "expected `:` after property name"));
    };

    let name = trim(&lexemes[..colon]);
    let Some(property_range) = range_of(name) else {
        return Err(fail(start, "expected a property name before `:`"));
    };
    if !name.iter().all(|l| is_property_part(&l.kind)) {
        return Err(fail(
            start,
            format!("invalid property name `{}`", text_of(name).trim()),
        ));
    }
    let property = text_of(name);

    let mut value = trim(&lexemes[colon + 1..]);
    let mut important = false;
    let mut default = false;
    while let Some((flag, rest)) = split_flag(value) {
        match flag.to_ascii_lowercase().as_str() {
            "important" => important = true,
            "default" => default = true,
            _ => {}
        }
        value = rest;
    }

    let colon_end = lexemes[colon].range.end;
    let value_range = range_of(value).unwrap_or(OffsetRange::at(colon_end));
    if value.is_empty() && !property.starts_with("--") {
        return Err(fail(
            colon_end,
            format!("declaration `{property}` has no value"),
        ));
    }

    let end = range_of(lexemes).map_or(colon_end, |r| r.end);
    Ok(Declaration {
        property,
        property_range,
        value: text_of(value),
        value_range,
        components: value_components(value),
        important,
        default,
        range: OffsetRange::new(property_range.start, end),
    })
}

/// Split a trailing `!flag` off a value.
fn split_flag(value: &[Lexeme]) -> Option<(&str, &[Lexeme])> {
    let (last, rest) = value.split_last()?;
    let LexKind::Ident(flag) = &last.kind else {
        return None;
    };
    let rest = trim(rest);
    let (bang, rest) = rest.split_last()?;
    if bang.kind != LexKind::Delim('!') {
        return None;
    }
    Some((flag.as_str(), trim(rest)))
}

fn is_property_part(kind: &LexKind) -> bool {
    matches!(
        kind,
        LexKind::Ident(_)
            | LexKind::Interpolation
            | LexKind::Delim('$' | '*' | '_' | '-')
            | LexKind::Number(_)
            | LexKind::Dimension { .. }
    )
}

fn value_components(value: &[Lexeme]) -> Vec<ValueComponent> {
    let mut components: Vec<ValueComponent> = Vec::new();
    let mut i = 0;
    while i < value.len() {
        let lexeme = &value[i];
        i += 1;
        let kind = match &lexeme.kind {
            LexKind::Whitespace => continue,
            LexKind::Delim('$') => match value.get(i) {
                Some(next) if lexeme.touches(next) && matches!(next.kind, LexKind::Ident(_)) => {
                    i += 1;
                    components.push(ValueComponent {
                        kind: ValueKind::Variable,
                        text: format!("${}", next.text),
                        range: OffsetRange::new(lexeme.range.start, next.range.end),
                    });
                    continue;
                }
                _ => ValueKind::Other,
            },
            LexKind::Number(n) => ValueKind::Number(*n),
            LexKind::Percentage(n) => ValueKind::Percentage(*n),
            LexKind::Dimension { value, unit } => ValueKind::Dimension {
                value: *value,
                unit: unit.clone(),
            },
            LexKind::Ident(_) => ValueKind::Ident,
            LexKind::Function(name) => ValueKind::Function(name.clone()),
            LexKind::Str | LexKind::Url => ValueKind::String,
            LexKind::Hash(_) | LexKind::IdHash(_) => ValueKind::Color,
            LexKind::Interpolation => ValueKind::Interpolation,
            LexKind::Comma | LexKind::Delim('/') => ValueKind::Separator,
            _ => ValueKind::Other,
        };
        components.push(ValueComponent {
            kind,
            text: lexeme.text.clone(),
            range: lexeme.range,
        });
    }
    components
}

fn record_comment<'i>(
    p: &Parser<'i, '_>,
    cx: &mut Context,
    before: SourcePosition,
) -> Result<(), CssError<'i>> {
    let raw = p.slice_from(before);
    let start = before.byte_index();
    if raw.len() < 4 || !raw.ends_with("*/") {
        return Err(fail(start, "unterminated comment"));
    }
    cx.comments.push(Comment {
        kind: CommentKind::Block,
        text: raw[2..raw.len() - 2].to_string(),
        range: OffsetRange::new(start, start + raw.len()),
    });
    Ok(())
}

/// Consume the block just opened, checking it for malformed tokens.
fn skip_block<'i>(p: &mut Parser<'i, '_>, cx: &mut Context) -> Result<(), CssError<'i>> {
    p.parse_nested_block(|nested| {
        loop {
            let before = nested.position();
            let token = match nested.next_including_whitespace_and_comments() {
                Ok(token) => token.clone(),
                Err(_) => return Ok(()),
            };
            let start = before.byte_index();
            match token {
                Token::Comment(_) => record_comment(nested, cx, before)?,
                Token::BadString(_) => return Err(fail(start, "unterminated string")),
                Token::BadUrl(_) => return Err(fail(start, "malformed `url()`")),
                Token::Function(_)
                | Token::ParenthesisBlock
                | Token::SquareBracketBlock
                | Token::CurlyBracketBlock => skip_block(nested, cx)?,
                Token::CloseCurlyBracket
                | Token::CloseParenthesis
                | Token::CloseSquareBracket => {
                    return Err(fail(start, "unexpected closing bracket"));
                }
                _ => {}
            }
        }
    })
}
