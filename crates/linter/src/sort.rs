use crate::diagnostics::Violation;

/// Order violations by path, line, column, rule identifier, then message.
///
/// The order depends only on the violations themselves, so output is
/// stable regardless of rule order or thread scheduling.
pub fn sort_violations(violations: &mut [Violation]) {
    violations.sort_by(|a, b| {
        a.path
            .cmp(&b.path)
            .then(a.start.cmp(&b.start))
            .then_with(|| a.rule.cmp(b.rule))
            .then_with(|| a.message.cmp(&b.message))
    });
}
