//! Rule engine and style rules for sheetlint.
//!
//! Rules are registered in a [`RuleRegistry`], resolved against the user's
//! configuration into a [`RuleSet`], and run by an [`Engine`] over one file
//! ([`Engine::lint_source`]) or many in parallel ([`Engine::lint_files`]).

mod diagnostics;
mod engine;
mod registry;
mod rule_set;
mod rules;
mod sort;
mod suppress;
mod traits;

pub use diagnostics::{FileOutcome, FileStatus, LintDiagnostic, Violation};
pub use engine::{CancelFlag, Engine, LintRun};
pub use registry::{NodeKind, RuleId, RuleRegistry, StyleRule, IO_ERROR, PARSE_ERROR};
pub use rule_set::{ActiveRule, RuleSet};
pub use rules::{ClassNamePatternOptions, MaxSelectorDepthOptions, RestrictNestingPurposeOptions};
pub use sort::sort_violations;
pub use traits::{CheckContext, StyleCheck};
