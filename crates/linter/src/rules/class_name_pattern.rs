use crate::diagnostics::LintDiagnostic;
use crate::registry::RuleId;
use crate::traits::{CheckContext, StyleCheck};
use regex::Regex;
use serde::Deserialize;
use sheetlint_syntax::{walk, Rule, Scope, SimpleKind, Visitor, Walk};

/// Options for the `class-name-pattern` rule
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassNamePatternOptions {
    /// Regular expression every class name must match. Required.
    pub pattern: Option<String>,
}

/// Reports class selectors whose name does not match a configured pattern.
/// Off unless configured; names built with `#{}` interpolation are skipped.
pub struct ClassNamePatternRuleImpl {
    pattern: Regex,
}

impl ClassNamePatternRuleImpl {
    pub fn new(options: ClassNamePatternOptions) -> Result<Self, String> {
        let Some(pattern) = options.pattern else {
            return Err("missing required option `pattern`".to_string());
        };
        let pattern =
            Regex::new(&pattern).map_err(|e| format!("invalid `pattern` `{pattern}`: {e}"))?;
        Ok(Self { pattern })
    }
}

impl StyleCheck for ClassNamePatternRuleImpl {
    fn id(&self) -> RuleId {
        RuleId::ClassNamePattern
    }

    fn check(&self, cx: CheckContext<'_>) -> Vec<LintDiagnostic> {
        let mut visitor = ClassVisitor {
            pattern: &self.pattern,
            diagnostics: Vec::new(),
        };
        walk(&mut visitor, cx.stylesheet);
        visitor.diagnostics
    }
}

struct ClassVisitor<'r> {
    pattern: &'r Regex,
    diagnostics: Vec<LintDiagnostic>,
}

impl<'a> Visitor<'a> for ClassVisitor<'_> {
    fn enter_rule(&mut self, rule: &'a Rule, _scope: &Scope<'a>) -> Walk {
        let classes = rule
            .selectors
            .iter()
            .flatten()
            .flat_map(|selector| selector.components())
            .filter(|c| c.kind == SimpleKind::Class && !c.name.contains("#{"));

        for class in classes {
            if self.pattern.is_match(&class.name) {
                continue;
            }
            self.diagnostics.push(LintDiagnostic::new(
                RuleId::ClassNamePattern,
                class.range,
                RuleId::ClassNamePattern.message(&[
                    ("class", class.name.as_str()),
                    ("pattern", self.pattern.as_str()),
                ]),
            ));
        }
        Walk::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{flagged, run};

    const KEBAB: &str = "^[a-z][a-z0-9]*(-[a-z0-9]+)*$";

    fn check(source: &str) -> Vec<LintDiagnostic> {
        let options = ClassNamePatternOptions {
            pattern: Some(KEBAB.to_string()),
        };
        run(&ClassNamePatternRuleImpl::new(options).unwrap(), source)
    }

    #[test]
    fn test_reports_mismatching_classes() {
        let source = ".nav-bar .navItem, .Header {}";
        let diagnostics = check(source);
        assert_eq!(flagged(source, &diagnostics), vec![".navItem", ".Header"]);
        assert_eq!(
            diagnostics[0].message,
            format!("Class `.navItem` does not match the pattern `{KEBAB}`")
        );
    }

    #[test]
    fn test_interpolated_names_are_skipped() {
        assert!(check(".icon-#{$name} {}").is_empty());
    }

    #[test]
    fn test_pattern_is_required() {
        let error = ClassNamePatternRuleImpl::new(ClassNamePatternOptions::default())
            .err()
            .unwrap();
        assert_eq!(error, "missing required option `pattern`");
    }

    #[test]
    fn test_invalid_pattern() {
        let options = ClassNamePatternOptions {
            pattern: Some("[a-".to_string()),
        };
        let error = ClassNamePatternRuleImpl::new(options).err().unwrap();
        assert!(error.starts_with("invalid `pattern` `[a-`"), "{error}");
    }
}
