use crate::diagnostics::LintDiagnostic;
use crate::registry::RuleId;
use crate::traits::{CheckContext, StyleCheck};
use sheetlint_syntax::{walk, Declaration, Scope, ValueKind, Visitor};
use sheetlint_types::CodeFix;

const LENGTH_UNITS: &[&str] = &[
    "cap", "ch", "cm", "cqb", "cqh", "cqi", "cqmax", "cqmin", "cqw", "dvb", "dvh", "dvi",
    "dvmax", "dvmin", "dvw", "em", "ex", "ic", "in", "lh", "lvb", "lvh", "lvi", "lvmax", "lvmin",
    "lvw", "mm", "pc", "pt", "px", "q", "rcap", "rch", "rem", "rex", "ric", "rlh", "svb", "svh",
    "svi", "svmax", "svmin", "svw", "vb", "vh", "vi", "vmax", "vmin", "vw",
];

/// Reports zero lengths written with a unit (`0px`, `0.0rem`) and offers
/// to drop the unit. Percentages, times and angles keep their unit.
pub struct ZeroNeedsNoUnitRuleImpl;

impl StyleCheck for ZeroNeedsNoUnitRuleImpl {
    fn id(&self) -> RuleId {
        RuleId::ZeroNeedsNoUnit
    }

    fn check(&self, cx: CheckContext<'_>) -> Vec<LintDiagnostic> {
        let mut visitor = ZeroVisitor::default();
        walk(&mut visitor, cx.stylesheet);
        visitor.diagnostics
    }
}

#[derive(Default)]
struct ZeroVisitor {
    diagnostics: Vec<LintDiagnostic>,
}

impl<'a> Visitor<'a> for ZeroVisitor {
    #[allow(clippy::float_cmp)]
    fn visit_declaration(&mut self, declaration: &'a Declaration, _scope: &Scope<'a>) {
        // Custom properties are substituted verbatim, possibly into calc()
        if declaration.is_custom_property() || declaration.is_bare_zero() {
            return;
        }

        for component in &declaration.components {
            let ValueKind::Dimension { value, unit } = &component.kind else {
                continue;
            };
            if *value != 0.0 || !is_length_unit(unit) {
                continue;
            }
            let range = component.range;
            self.diagnostics.push(
                LintDiagnostic::new(
                    RuleId::ZeroNeedsNoUnit,
                    range,
                    RuleId::ZeroNeedsNoUnit.message(&[("value", component.text.as_str())]),
                )
                .with_fix(CodeFix::replace(
                    format!("Replace `{}` with `0`", component.text),
                    range.start,
                    range.end,
                    "0",
                )),
            );
        }
    }
}

fn is_length_unit(unit: &str) -> bool {
    LENGTH_UNITS
        .iter()
        .any(|length| length.eq_ignore_ascii_case(unit))
}
