//! Foundation types for sheetlint.
//!
//! This crate provides shared types used across the sheetlint crates.
//! It has zero external dependencies, making it suitable as a foundation layer.
//!
//! # Type Categories
//!
//! - **File types**: [`Dialect`]
//! - **Position types**: [`OffsetRange`], [`Position`], [`LineIndex`]
//! - **Severity types**: [`Severity`], [`RuleSeverity`]
//! - **Edit types**: [`TextEdit`], [`CodeFix`], [`apply_edits`]

mod edits;
mod file;
mod position;
mod severity;

pub use edits::{apply_edits, CodeFix, TextEdit};
pub use file::Dialect;
pub use position::{LineIndex, OffsetRange, Position};
pub use severity::{RuleSeverity, Severity};
