use crate::diagnostics::LintDiagnostic;
use crate::registry::RuleId;
use crate::traits::{CheckContext, StyleCheck};
use sheetlint_syntax::{walk, OffsetRange, Rule, Scope, SimpleKind, Visitor, Walk};

/// Reports a tag directly qualifying an id or class in the same compound,
/// such as `ul.nav` or `div#main`.
pub struct NoTagQualifiedIdOrClassRuleImpl;

impl StyleCheck for NoTagQualifiedIdOrClassRuleImpl {
    fn id(&self) -> RuleId {
        RuleId::NoTagQualifiedIdOrClass
    }

    fn check(&self, cx: CheckContext<'_>) -> Vec<LintDiagnostic> {
        let mut visitor = QualifiedVisitor::default();
        walk(&mut visitor, cx.stylesheet);
        visitor.diagnostics
    }
}

#[derive(Default)]
struct QualifiedVisitor {
    diagnostics: Vec<LintDiagnostic>,
}

impl<'a> Visitor<'a> for QualifiedVisitor {
    fn enter_rule(&mut self, rule: &'a Rule, _scope: &Scope<'a>) -> Walk {
        let compounds = rule
            .selectors
            .iter()
            .flatten()
            .flat_map(|selector| selector.compounds.iter());

        for compound in compounds {
            for pair in compound.components.windows(2) {
                let [tag, qualified] = pair else { continue };
                let sigil = match qualified.kind {
                    SimpleKind::Class => '.',
                    SimpleKind::Id => '#',
                    _ => continue,
                };
                if tag.kind != SimpleKind::Tag {
                    continue;
                }
                self.diagnostics.push(LintDiagnostic::new(
                    RuleId::NoTagQualifiedIdOrClass,
                    OffsetRange::new(tag.range.start, qualified.range.end),
                    RuleId::NoTagQualifiedIdOrClass.message(&[
                        ("selector", format!("{}{sigil}{}", tag.name, qualified.name).as_str()),
                        ("qualified", format!("{sigil}{}", qualified.name).as_str()),
                        ("tag", tag.name.as_str()),
                    ]),
                ));
            }
        }
        Walk::Continue
    }
}
