//! Raw-text pre-pass run before tokenizing.
//!
//! The pass blanks out SCSS `//` comments so the CSS tokenizer never sees
//! them, and checks that brackets balance. Strings, block comments and
//! unquoted `url(...)` arguments are skipped so brackets and slashes inside
//! them are ignored. A leading byte order mark is blanked too. Masking keeps
//! byte offsets unchanged.

use crate::error::SyntaxError;
use crate::tree::{Comment, CommentKind};
use sheetlint_types::{Dialect, OffsetRange};

pub(crate) struct Prepared {
    /// Source with a leading BOM and line comments replaced by spaces
    pub text: String,
    pub line_comments: Vec<Comment>,
}

pub(crate) fn prepare(source: &str, dialect: Dialect) -> Result<Prepared, SyntaxError> {
    let bytes = source.as_bytes();
    let mut open: Vec<(u8, usize)> = Vec::new();
    let mut line_comments = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' | b'\'' => i = skip_string(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'*') => match find(bytes, i + 2, b"*/") {
                Some(end) => i = end + 2,
                None => return Err(SyntaxError::new(i, "unterminated comment")),
            },
            b'/' if dialect.has_line_comments() && bytes.get(i + 1) == Some(&b'/') => {
                let line_end = find(bytes, i, b"\n").unwrap_or(bytes.len());
                let end = if bytes[line_end - 1] == b'\r' {
                    line_end - 1
                } else {
                    line_end
                };
                line_comments.push(Comment {
                    kind: CommentKind::Line,
                    text: source[i + 2..end].to_string(),
                    range: OffsetRange::new(i, end),
                });
                i = line_end;
            }
            b'(' if opens_unquoted_url(bytes, i) => {
                i = find(bytes, i + 1, b")").map_or(bytes.len(), |end| end + 1);
            }
            b'(' | b'[' | b'{' => {
                open.push((bytes[i], i));
                i += 1;
            }
            close @ (b')' | b']' | b'}') => {
                match open.pop() {
                    Some((opener, _)) if closer_for(opener) == close => {}
                    Some((opener, _)) => {
                        return Err(SyntaxError::new(
                            i,
                            format!(
                                "expected `{}` but found `{}`",
                                closer_for(opener) as char,
                                close as char
                            ),
                        ));
                    }
                    None => {
                        return Err(SyntaxError::new(
                            i,
                            format!("unexpected `{}`", close as char),
                        ));
                    }
                }
                i += 1;
            }
            _ => i += 1,
        }
    }

    if let Some(&(opener, at)) = open.last() {
        return Err(SyntaxError::new(
            at,
            format!("unclosed `{}`", opener as char),
        ));
    }

    Ok(Prepared {
        text: mask(source, &line_comments),
        line_comments,
    })
}

const BOM: char = '\u{feff}';

fn mask(source: &str, comments: &[Comment]) -> String {
    let mut text = String::with_capacity(source.len());
    let mut last = 0;
    if source.starts_with(BOM) {
        last = BOM.len_utf8();
        text.push_str(&" ".repeat(last));
    }
    for comment in comments {
        text.push_str(&source[last..comment.range.start]);
        text.push_str(&" ".repeat(comment.range.len()));
        last = comment.range.end;
    }
    text.push_str(&source[last..]);
    text
}

/// Index just past the closing quote. Strings stop at a newline, which the
/// tokenizer later reports as an unterminated string.
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut j = start + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'\n' => return j,
            c if c == quote => return j + 1,
            _ => j += 1,
        }
    }
    bytes.len()
}

fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from >= bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|p| from + p)
}

/// `paren` is the index of a `(`; true when it opens `url(` with an
/// unquoted argument.
fn opens_unquoted_url(bytes: &[u8], paren: usize) -> bool {
    if paren < 3 || !bytes[paren - 3..paren].eq_ignore_ascii_case(b"url") {
        return false;
    }
    if paren > 3 && is_name_byte(bytes[paren - 4]) {
        return false;
    }
    let next = bytes[paren + 1..]
        .iter()
        .find(|b| !b.is_ascii_whitespace());
    !matches!(next, Some(b'"' | b'\''))
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b >= 0x80
}

const fn closer_for(opener: u8) -> u8 {
    match opener {
        b'(' => b')',
        b'[' => b']',
        _ => b'}',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_line_comments() {
        let source = "a { // note\n  color: red; }";
        let prepared = prepare(source, Dialect::Scss).unwrap();
        assert_eq!(prepared.text.len(), source.len());
        assert_eq!(prepared.text, "a {        \n  color: red; }");
        assert_eq!(prepared.line_comments.len(), 1);
        assert_eq!(prepared.line_comments[0].text, " note");
        assert_eq!(prepared.line_comments[0].range, OffsetRange::new(4, 11));
    }

    #[test]
    fn test_masks_leading_bom() {
        let source = "\u{feff}a { color: red; } // x";
        let prepared = prepare(source, Dialect::Scss).unwrap();
        assert_eq!(prepared.text, "   a { color: red; }     ");
        assert_eq!(prepared.line_comments[0].range, OffsetRange::new(21, 25));
    }

    #[test]
    fn test_css_keeps_double_slash() {
        let source = "a { background: url(//cdn.example.com/x.png); }";
        let prepared = prepare(source, Dialect::Css).unwrap();
        assert_eq!(prepared.text, source);
        assert!(prepared.line_comments.is_empty());
    }

    #[test]
    fn test_double_slash_inside_url_and_string() {
        let source = "a { b: url(//x.com/y); c: \"//z\"; }";
        let prepared = prepare(source, Dialect::Scss).unwrap();
        assert_eq!(prepared.text, source);
        assert!(prepared.line_comments.is_empty());
    }

    #[test]
    fn test_double_slash_after_quoted_url() {
        let source = "a { b: url(\"x\"); } // trailing";
        let prepared = prepare(source, Dialect::Scss).unwrap();
        assert_eq!(prepared.line_comments.len(), 1);
        assert_eq!(prepared.line_comments[0].text, " trailing");
    }

    #[test]
    fn test_crlf_line_comment() {
        let source = "// one\r\na {}";
        let prepared = prepare(source, Dialect::Scss).unwrap();
        assert_eq!(prepared.line_comments[0].text, " one");
        assert_eq!(prepared.line_comments[0].range, OffsetRange::new(0, 6));
    }

    #[test]
    fn test_unbalanced_brackets() {
        let err = prepare("a { color: red;", Dialect::Css).err().unwrap();
        assert_eq!(err.offset, 2);
        assert_eq!(err.message, "unclosed `{`");

        let err = prepare("a { } }", Dialect::Css).err().unwrap();
        assert_eq!(err.offset, 6);
        assert_eq!(err.message, "unexpected `}`");

        let err = prepare("a:not(.b }", Dialect::Css).err().unwrap();
        assert_eq!(err.message, "expected `)` but found `}`");
    }

    #[test]
    fn test_brackets_in_strings_and_comments_ignored() {
        let source = "a { content: \"{\"; } /* } */";
        assert!(prepare(source, Dialect::Css).is_ok());
    }

    #[test]
    fn test_unterminated_block_comment() {
        let err = prepare("a {} /* open", Dialect::Scss).err().unwrap();
        assert_eq!(err.offset, 5);
        assert_eq!(err.message, "unterminated comment");
    }
}
