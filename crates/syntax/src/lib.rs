//! # Stylesheet Syntax
//!
//! This crate turns CSS and SCSS source text into a small owned tree that the
//! lint rules walk. Tokenizing is delegated to [`cssparser`]; this crate adds
//! the SCSS lexical layer on top (line comments, `#{...}` interpolation,
//! `&` parent references, `%placeholder` selectors, `$variables`).
//!
//! ## Tree Shape
//!
//! A [`Stylesheet`] holds a list of [`Item`]s. Items are style rules (a
//! selector prelude plus a block), at-rules (with or without a block) and
//! declarations. Rules nest arbitrarily, as SCSS allows. Every node records
//! the byte range it covers in the original source.
//!
//! ```rust,ignore
//! let sheet = sheetlint_syntax::parse(".card { .title { color: red; } }", Dialect::Scss)?;
//! walk(&mut my_visitor, &sheet);
//! ```
//!
//! Comments are not part of the item tree. They are collected in source
//! order on [`Stylesheet::comments`].

mod error;
mod lexeme;
mod parser;
mod scan;
mod selector;
mod tree;
mod visit;

pub use error::ParseError;
pub use parser::parse;
pub use selector::{Combinator, Compound, Selector, SimpleKind, SimpleSelector};
pub use sheetlint_types::{Dialect, OffsetRange};
pub use tree::{
    longhand_of, AtRule, Comment, CommentKind, Declaration, Item, Longhand, Rule, Stylesheet,
    ValueComponent, ValueKind,
};
pub use visit::{walk, Scope, Visitor, Walk};
