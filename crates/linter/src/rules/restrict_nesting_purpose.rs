use crate::diagnostics::LintDiagnostic;
use crate::registry::RuleId;
use crate::traits::{CheckContext, StyleCheck};
use regex::Regex;
use serde::Deserialize;
use sheetlint_syntax::{walk, Rule, Scope, Visitor, Walk};

/// Options for the `restrict-nesting-purpose` rule
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RestrictNestingPurposeOptions {
    /// Regular expressions; nested selectors whose text matches any of them
    /// are allowed.
    pub ignore: Vec<String>,
}

/// Nesting is for states (`&:hover`, `&::before`) and outer contexts
/// (`.theme-dark &`). Any other nested selector only raises specificity and
/// hides the selector the browser actually matches.
pub struct RestrictNestingPurposeRuleImpl {
    ignore: Vec<Regex>,
}

impl RestrictNestingPurposeRuleImpl {
    /// Compile the `ignore` patterns.
    pub fn new(options: RestrictNestingPurposeOptions) -> Result<Self, String> {
        let ignore = options
            .ignore
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| format!("invalid `ignore` pattern `{pattern}`: {e}"))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { ignore })
    }
}

impl StyleCheck for RestrictNestingPurposeRuleImpl {
    fn id(&self) -> RuleId {
        RuleId::RestrictNestingPurpose
    }

    fn check(&self, cx: CheckContext<'_>) -> Vec<LintDiagnostic> {
        let mut visitor = NestingVisitor {
            ignore: &self.ignore,
            diagnostics: Vec::new(),
        };
        walk(&mut visitor, cx.stylesheet);
        visitor.diagnostics
    }
}

struct NestingVisitor<'r> {
    ignore: &'r [Regex],
    diagnostics: Vec<LintDiagnostic>,
}

impl<'a> Visitor<'a> for NestingVisitor<'_> {
    fn enter_rule(&mut self, rule: &'a Rule, scope: &Scope<'a>) -> Walk {
        if scope.parent_rule().is_none() {
            return Walk::Continue;
        }

        for selector in rule.selectors.iter().flatten() {
            if selector.is_state_only()
                || selector.is_parent_context()
                || self.ignore.iter().any(|re| re.is_match(&selector.text))
            {
                continue;
            }
            self.diagnostics.push(LintDiagnostic::new(
                RuleId::RestrictNestingPurpose,
                selector.range,
                RuleId::RestrictNestingPurpose.message(&[("selector", selector.text.as_str())]),
            ));
        }
        Walk::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{flagged, run};

    fn check(source: &str) -> Vec<LintDiagnostic> {
        check_ignoring(source, &[])
    }

    fn check_ignoring(source: &str, ignore: &[&str]) -> Vec<LintDiagnostic> {
        let options = RestrictNestingPurposeOptions {
            ignore: ignore.iter().map(ToString::to_string).collect(),
        };
        run(&RestrictNestingPurposeRuleImpl::new(options).unwrap(), source)
    }

    #[test]
    fn test_states_and_contexts_are_allowed() {
        let source = ".btn {\n  &:hover, &:focus-visible {}\n  &::before {}\n  :focus-within {}\n  .theme-dark & {}\n  .ie8 & .icon {}\n}";
        assert!(check(source).is_empty());
    }

    #[test]
    fn test_descendants_are_flagged() {
        let source = ".card { .title {} & > .body {} &-wide {} }";
        let diagnostics = check(source);
        assert_eq!(
            flagged(source, &diagnostics),
            vec![".title", "& > .body", "&-wide"]
        );
        assert_eq!(
            diagnostics[0].message,
            "Nested selector `.title` only adds specificity; nest states (`&:hover`) or contexts (`.theme &`)"
        );
    }

    #[test]
    fn test_top_level_rules_are_not_checked() {
        assert!(check(".a .b {} ul li {}").is_empty());
    }

    #[test]
    fn test_at_rules_are_transparent() {
        let source = ".a { @media print { .b {} } }";
        assert_eq!(flagged(source, &check(source)), vec![".b"]);
    }

    #[test]
    fn test_at_root_is_not_nesting() {
        assert!(check(".a { @at-root { .b {} } }").is_empty());
    }

    #[test]
    fn test_ignore_patterns() {
        let source = ".menu { .js-toggle {} .item {} }";
        let diagnostics = check_ignoring(source, &["^\\.js-"]);
        assert_eq!(flagged(source, &diagnostics), vec![".item"]);
    }

    #[test]
    fn test_invalid_ignore_pattern() {
        let options = RestrictNestingPurposeOptions {
            ignore: vec!["(".to_string()],
        };
        let error = RestrictNestingPurposeRuleImpl::new(options).err().unwrap();
        assert!(error.starts_with("invalid `ignore` pattern `(`"), "{error}");
    }
}
