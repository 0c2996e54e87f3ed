use crate::diagnostics::LintDiagnostic;
use crate::registry::RuleId;
use crate::traits::{CheckContext, StyleCheck};
use sheetlint_syntax::{walk, Rule, Scope, SimpleKind, Visitor, Walk};

/// Reports every id component in a selector. Ids cannot be reused and
/// outrank any number of classes.
pub struct NoIdSelectorRuleImpl;

impl StyleCheck for NoIdSelectorRuleImpl {
    fn id(&self) -> RuleId {
        RuleId::NoIdSelector
    }

    fn check(&self, cx: CheckContext<'_>) -> Vec<LintDiagnostic> {
        let mut visitor = IdVisitor::default();
        walk(&mut visitor, cx.stylesheet);
        visitor.diagnostics
    }
}

#[derive(Default)]
struct IdVisitor {
    diagnostics: Vec<LintDiagnostic>,
}

impl<'a> Visitor<'a> for IdVisitor {
    fn enter_rule(&mut self, rule: &'a Rule, _scope: &Scope<'a>) -> Walk {
        let ids = rule
            .selectors
            .iter()
            .flatten()
            .flat_map(|selector| selector.components())
            .filter(|component| component.kind == SimpleKind::Id);

        for id in ids {
            self.diagnostics.push(LintDiagnostic::new(
                RuleId::NoIdSelector,
                id.range,
                RuleId::NoIdSelector.message(&[("id", id.name.as_str())]),
            ));
        }
        Walk::Continue
    }
}
