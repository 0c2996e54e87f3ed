use crate::diagnostics::{FileOutcome, Violation};
use crate::registry::RuleRegistry;
use crate::rule_set::RuleSet;
use crate::sort::sort_violations;
use crate::suppress::Suppressions;
use crate::traits::CheckContext;
use rayon::prelude::*;
use sheetlint_syntax::Dialect;
use sheetlint_types::{LineIndex, Severity};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation for [`Engine::lint_files`].
///
/// Cloning shares the flag. Files already being linted finish; no new file
/// starts once the flag is set.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Result of linting a set of files.
#[derive(Debug, Clone, Default)]
pub struct LintRun {
    /// One outcome per completed file, sorted by path
    pub outcomes: Vec<FileOutcome>,
    /// Whether the run stopped early; `outcomes` then covers only the files
    /// that finished
    pub cancelled: bool,
}

impl LintRun {
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.outcomes.iter().flat_map(|outcome| outcome.violations.iter())
    }

    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.violations().filter(|v| v.severity == severity).count()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.outcomes.iter().any(FileOutcome::has_errors)
    }

    pub fn unchecked(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.is_checked())
    }
}

/// Runs a [`RuleSet`] over stylesheets.
pub struct Engine<'r> {
    registry: &'r RuleRegistry,
    rules: RuleSet,
}

impl<'r> Engine<'r> {
    #[must_use]
    pub fn new(registry: &'r RuleRegistry, rules: RuleSet) -> Self {
        Self { registry, rules }
    }

    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Lint one stylesheet held in memory. `path` picks the dialect (SCSS
    /// unless it ends in `.css`) and labels the violations.
    #[tracing::instrument(skip(self, source), fields(path = %path.display(), len = source.len()))]
    pub fn lint_source(&self, path: &Path, source: &str) -> FileOutcome {
        let dialect = Dialect::from_path(path).unwrap_or_default();
        let stylesheet = match sheetlint_syntax::parse(source, dialect) {
            Ok(stylesheet) => stylesheet,
            Err(error) => {
                tracing::debug!(%error, "parse failed; file left unchecked");
                return FileOutcome::unchecked(path, Violation::parse_error(path, &error));
            }
        };

        let index = LineIndex::new(source);
        let suppressions =
            Suppressions::from_comments(&stylesheet.comments, source, &index, self.registry);
        let cx = CheckContext {
            stylesheet: &stylesheet,
            source,
        };

        let mut violations = Vec::new();
        for rule in self.rules.iter() {
            let diagnostics =
                match panic::catch_unwind(AssertUnwindSafe(|| rule.check.check(cx))) {
                    Ok(diagnostics) => diagnostics,
                    Err(payload) => {
                        tracing::error!(
                            rule = %rule.id,
                            path = %path.display(),
                            panic = panic_message(payload.as_ref()),
                            "rule panicked; its results for this file are dropped"
                        );
                        continue;
                    }
                };

            violations.extend(
                diagnostics
                    .into_iter()
                    .map(|d| Violation::from_diagnostic(path, source, &index, rule.severity, d))
                    .filter(|v| !suppressions.suppresses(v)),
            );
        }

        sort_violations(&mut violations);
        tracing::debug!(violations = violations.len(), "file linted");
        FileOutcome::checked(path, violations)
    }

    /// Read and lint one file. A read failure becomes an `io-error`
    /// violation.
    pub fn lint_file(&self, path: &Path) -> FileOutcome {
        match std::fs::read_to_string(path) {
            Ok(source) => self.lint_source(path, &source),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "failed to read file");
                FileOutcome::unchecked(path, Violation::io_error(path, &error))
            }
        }
    }

    /// Lint files in parallel.
    ///
    /// A file's outcome is kept only once all of its rules have finished.
    /// Cancellation is checked before each file starts.
    #[tracing::instrument(skip_all, fields(files = files.len()))]
    pub fn lint_files(&self, files: &[PathBuf], cancel: &CancelFlag) -> LintRun {
        let mut outcomes: Vec<FileOutcome> = files
            .par_iter()
            .filter_map(|path| {
                if cancel.is_cancelled() {
                    return None;
                }
                Some(self.lint_file(path))
            })
            .collect();
        outcomes.sort_by(|a, b| a.path.cmp(&b.path));

        let cancelled = outcomes.len() < files.len() && cancel.is_cancelled();
        if cancelled {
            tracing::info!(
                completed = outcomes.len(),
                total = files.len(),
                "run cancelled"
            );
        }
        LintRun {
            outcomes,
            cancelled,
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
