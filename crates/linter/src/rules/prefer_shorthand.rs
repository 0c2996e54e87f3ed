use crate::diagnostics::LintDiagnostic;
use crate::registry::RuleId;
use crate::traits::{CheckContext, StyleCheck};
use sheetlint_syntax::{
    longhand_of, walk, Declaration, Item, OffsetRange, Scope, ValueKind, Visitor,
};

const GLOBAL_KEYWORDS: &[&str] = &["inherit", "initial", "unset", "revert", "revert-layer"];

/// Reports blocks that set all four longhands of a shorthand family with
/// plain values, and suggests the equivalent shorthand.
pub struct PreferShorthandRuleImpl;

impl StyleCheck for PreferShorthandRuleImpl {
    fn id(&self) -> RuleId {
        RuleId::PreferShorthand
    }

    fn check(&self, cx: CheckContext<'_>) -> Vec<LintDiagnostic> {
        let mut visitor = ShorthandVisitor::default();
        walk(&mut visitor, cx.stylesheet);
        visitor.diagnostics
    }
}

#[derive(Default)]
struct ShorthandVisitor {
    diagnostics: Vec<LintDiagnostic>,
}

type Quartet<'a> = [Option<&'a Declaration>; 4];

impl<'a> Visitor<'a> for ShorthandVisitor {
    fn visit_block(&mut self, items: &'a [Item], _scope: &Scope<'a>) {
        // Shorthand families in order of first appearance; a repeated
        // longhand replaces the earlier one, as it does in the cascade
        let mut families: Vec<(&'static str, Quartet<'a>)> = Vec::new();
        for declaration in items.iter().filter_map(Item::as_declaration) {
            let Some(longhand) = longhand_of(&declaration.property) else {
                continue;
            };
            let index = families
                .iter()
                .position(|(shorthand, _)| *shorthand == longhand.shorthand)
                .unwrap_or_else(|| {
                    families.push((longhand.shorthand, [None; 4]));
                    families.len() - 1
                });
            families[index].1[longhand.slot] = Some(declaration);
        }

        for (shorthand, quartet) in families {
            let [Some(top), Some(right), Some(bottom), Some(left)] = quartet else {
                continue;
            };
            let declarations = [top, right, bottom, left];
            if let Some(suggestion) = suggest(shorthand, declarations) {
                self.diagnostics.push(report(&declarations, &suggestion));
            }
        }
    }
}

/// The shorthand declaration equivalent to `declarations`, or `None` if
/// the values cannot be merged safely.
fn suggest(shorthand: &str, declarations: [&Declaration; 4]) -> Option<String> {
    let important = declarations[0].important;
    if declarations.iter().any(|d| d.important != important) {
        return None;
    }

    let mut values = [""; 4];
    for (value, declaration) in values.iter_mut().zip(declarations) {
        *value = literal_value(declaration)?;
    }

    let is_global = |value: &&str| {
        GLOBAL_KEYWORDS
            .iter()
            .any(|keyword| keyword.eq_ignore_ascii_case(value))
    };
    if values.iter().any(is_global)
        && !values.iter().all(|value| value.eq_ignore_ascii_case(values[0]))
    {
        return None;
    }

    let flag = if important { " !important" } else { "" };
    Some(format!("{shorthand}: {}{flag}", compress(values).join(" ")))
}

/// A value made of exactly one component with no variables.
fn literal_value(declaration: &Declaration) -> Option<&str> {
    if declaration.has_variable_reference() {
        return None;
    }
    match declaration.components.as_slice() {
        [component]
            if !matches!(
                component.kind,
                ValueKind::Variable | ValueKind::Interpolation | ValueKind::Separator
            ) =>
        {
            Some(component.text.as_str())
        }
        _ => None,
    }
}

/// Drop trailing values the shorthand repeats implicitly.
fn compress([top, right, bottom, left]: [&str; 4]) -> Vec<&str> {
    if right != left {
        vec![top, right, bottom, left]
    } else if top != bottom {
        vec![top, right, bottom]
    } else if top != right {
        vec![top, right]
    } else {
        vec![top]
    }
}

fn report(declarations: &[&Declaration; 4], suggestion: &str) -> LintDiagnostic {
    let start = declarations.iter().map(|d| d.range.start).min().unwrap_or(0);
    let end = declarations.iter().map(|d| d.range.end).max().unwrap_or(start);
    let names: Vec<String> = declarations
        .iter()
        .map(|d| format!("`{}`", d.property))
        .collect();

    LintDiagnostic::new(
        RuleId::PreferShorthand,
        OffsetRange::new(start, end),
        RuleId::PreferShorthand.message(&[
            ("longhands", format!("{} and {}", names[..3].join(", "), names[3]).as_str()),
            ("shorthand", suggestion),
        ]),
    )
}
