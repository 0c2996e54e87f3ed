use crate::registry::{RuleId, IO_ERROR, PARSE_ERROR};
use sheetlint_syntax::ParseError;
use sheetlint_types::{CodeFix, LineIndex, OffsetRange, Position, Severity};
use std::path::{Path, PathBuf};

/// What a rule reports: byte offsets into the source, no severity yet.
///
/// The engine turns these into [`Violation`]s once it knows the configured
/// severity and the line layout of the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintDiagnostic {
    pub rule: RuleId,
    pub range: OffsetRange,
    pub message: String,
    /// Optional auto-fix for this diagnostic
    pub fix: Option<CodeFix>,
}

impl LintDiagnostic {
    #[must_use]
    pub fn new(rule: RuleId, range: OffsetRange, message: impl Into<String>) -> Self {
        Self {
            rule,
            range,
            message: message.into(),
            fix: None,
        }
    }

    #[must_use]
    pub fn with_fix(mut self, fix: CodeFix) -> Self {
        self.fix = Some(fix);
        self
    }
}

/// A reported finding, positioned for humans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Rule identifier, or one of the synthetic identifiers
    /// [`PARSE_ERROR`] and [`IO_ERROR`]
    pub rule: &'static str,
    pub path: PathBuf,
    pub start: Position,
    pub end: Position,
    pub message: String,
    pub severity: Severity,
    pub fix: Option<CodeFix>,
}

impl Violation {
    pub(crate) fn from_diagnostic(
        path: &Path,
        source: &str,
        index: &LineIndex,
        severity: Severity,
        diagnostic: LintDiagnostic,
    ) -> Self {
        Self {
            rule: diagnostic.rule.as_str(),
            path: path.to_path_buf(),
            start: index.position(source, diagnostic.range.start),
            end: index.position(source, diagnostic.range.end),
            message: diagnostic.message,
            severity,
            fix: diagnostic.fix,
        }
    }

    pub(crate) fn parse_error(path: &Path, error: &ParseError) -> Self {
        let position = Position::new(error.line, error.column);
        Self {
            rule: PARSE_ERROR,
            path: path.to_path_buf(),
            start: position,
            end: position,
            message: error.message.clone(),
            severity: Severity::Error,
            fix: None,
        }
    }

    pub(crate) fn io_error(path: &Path, error: &std::io::Error) -> Self {
        Self {
            rule: IO_ERROR,
            path: path.to_path_buf(),
            start: Position::default(),
            end: Position::default(),
            message: format!("failed to read file: {error}"),
            severity: Severity::Error,
            fix: None,
        }
    }
}

/// Whether the rules ran on a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Checked,
    /// The file could not be read or parsed; its only violation says why
    Unchecked,
}

/// Result of linting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub status: FileStatus,
    pub violations: Vec<Violation>,
}

impl FileOutcome {
    pub(crate) fn checked(path: &Path, violations: Vec<Violation>) -> Self {
        Self {
            path: path.to_path_buf(),
            status: FileStatus::Checked,
            violations,
        }
    }

    pub(crate) fn unchecked(path: &Path, violation: Violation) -> Self {
        Self {
            path: path.to_path_buf(),
            status: FileStatus::Unchecked,
            violations: vec![violation],
        }
    }

    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.status == FileStatus::Checked
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity.is_error())
    }
}
