use crate::diagnostics::LintDiagnostic;
use crate::registry::RuleId;
use sheetlint_syntax::Stylesheet;

/// Input handed to every rule check.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub stylesheet: &'a Stylesheet,
    /// The full source text the stylesheet was parsed from
    pub source: &'a str,
}

/// A configured rule, ready to run.
///
/// Checks are pure: they read the tree and return diagnostics, and the order
/// in which checks run never changes the result.
pub trait StyleCheck: Send + Sync {
    /// The rule this check implements
    fn id(&self) -> RuleId;

    /// Check one parsed stylesheet
    fn check(&self, cx: CheckContext<'_>) -> Vec<LintDiagnostic>;
}
