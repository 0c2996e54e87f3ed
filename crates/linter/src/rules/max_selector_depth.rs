use crate::diagnostics::LintDiagnostic;
use crate::registry::RuleId;
use crate::traits::{CheckContext, StyleCheck};
use serde::Deserialize;
use sheetlint_syntax::{walk, Rule, Scope, Selector, Visitor, Walk};

/// Options for the `max-selector-depth` rule
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaxSelectorDepthOptions {
    /// Maximum allowed depth. Defaults to 3.
    pub max: usize,
}

impl Default for MaxSelectorDepthOptions {
    fn default() -> Self {
        Self { max: 3 }
    }
}

/// Limits how deep a selector reaches into the document.
///
/// A selector's depth is the number of combinators it contains plus the
/// depth of the rule it is nested in. A nested selector without `&` is joined
/// to its parent by an implicit descendant combinator, which counts too.
pub struct MaxSelectorDepthRuleImpl {
    options: MaxSelectorDepthOptions,
}

impl MaxSelectorDepthRuleImpl {
    #[must_use]
    pub fn new(options: MaxSelectorDepthOptions) -> Self {
        Self { options }
    }
}

impl StyleCheck for MaxSelectorDepthRuleImpl {
    fn id(&self) -> RuleId {
        RuleId::MaxSelectorDepth
    }

    fn check(&self, cx: CheckContext<'_>) -> Vec<LintDiagnostic> {
        let mut visitor = DepthVisitor {
            max: self.options.max,
            depths: Vec::new(),
            diagnostics: Vec::new(),
        };
        walk(&mut visitor, cx.stylesheet);
        visitor.diagnostics
    }
}

struct DepthVisitor {
    max: usize,
    /// Effective depth of each enclosing rule, innermost last
    depths: Vec<Option<usize>>,
    diagnostics: Vec<LintDiagnostic>,
}

impl<'a> Visitor<'a> for DepthVisitor {
    fn enter_rule(&mut self, rule: &'a Rule, scope: &Scope<'a>) -> Walk {
        let inherited = if scope.parent_rule().is_some() {
            self.depths.last().copied().flatten()
        } else {
            None
        };

        let Some(selectors) = &rule.selectors else {
            // Keyframe selectors and property namespaces pass their
            // parent's depth through
            self.depths.push(inherited);
            return Walk::Continue;
        };

        let mut deepest = 0;
        let mut exceeded = false;
        for selector in selectors {
            let depth = effective_depth(selector, inherited);
            deepest = deepest.max(depth);
            if depth > self.max {
                exceeded = true;
                self.diagnostics.push(LintDiagnostic::new(
                    RuleId::MaxSelectorDepth,
                    selector.range,
                    RuleId::MaxSelectorDepth.message(&[
                        ("selector", selector.text.as_str()),
                        ("depth", depth.to_string().as_str()),
                        ("max", self.max.to_string().as_str()),
                    ]),
                ));
            }
        }
        self.depths.push(Some(deepest));

        // Everything nested below is at least as deep; report the rule once
        if exceeded {
            Walk::SkipChildren
        } else {
            Walk::Continue
        }
    }

    fn exit_rule(&mut self, _rule: &'a Rule, _scope: &Scope<'a>) {
        self.depths.pop();
    }
}

fn effective_depth(selector: &Selector, inherited: Option<usize>) -> usize {
    let own = selector.combinator_count();
    match inherited {
        None => own,
        Some(parent) if selector.has_parent_reference() || selector.leading.is_some() => {
            parent + own
        }
        Some(parent) => parent + own + 1,
    }
}
