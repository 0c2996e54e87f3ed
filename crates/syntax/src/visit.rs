//! Depth-first traversal of a [`Stylesheet`].
//!
//! Implement [`Visitor`] and override only the hooks you need; every hook
//! has an empty default. [`walk`] keeps a [`Scope`] describing the enclosing
//! rules and at-rules of the node being visited.

use crate::tree::{AtRule, Declaration, Item, Rule, Stylesheet};

/// Whether to descend into a node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Continue,
    SkipChildren,
}

#[derive(Debug, Clone, Copy)]
enum Ancestor<'a> {
    Rule(&'a Rule),
    AtRule(&'a AtRule),
}

/// Enclosing nodes of the item being visited, outermost first.
#[derive(Debug, Clone, Default)]
pub struct Scope<'a> {
    ancestors: Vec<Ancestor<'a>>,
}

impl<'a> Scope<'a> {
    /// The nearest enclosing style rule. At-rules between the two are
    /// transparent, except `@at-root`, which detaches its contents from any
    /// enclosing rule.
    #[must_use]
    pub fn parent_rule(&self) -> Option<&'a Rule> {
        for ancestor in self.ancestors.iter().rev() {
            match ancestor {
                Ancestor::Rule(rule) => return Some(rule),
                Ancestor::AtRule(at_rule) if at_rule.is("at-root") => return None,
                Ancestor::AtRule(_) => {}
            }
        }
        None
    }

    /// Number of enclosing style rules.
    #[must_use]
    pub fn rule_depth(&self) -> usize {
        self.ancestors
            .iter()
            .filter(|a| matches!(a, Ancestor::Rule(_)))
            .count()
    }
}

#[allow(unused_variables)]
pub trait Visitor<'a> {
    /// Called before a style rule's children are visited.
    fn enter_rule(&mut self, rule: &'a Rule, scope: &Scope<'a>) -> Walk {
        Walk::Continue
    }

    /// Called after a style rule and its children, even when they were skipped.
    fn exit_rule(&mut self, rule: &'a Rule, scope: &Scope<'a>) {}

    fn enter_at_rule(&mut self, at_rule: &'a AtRule, scope: &Scope<'a>) -> Walk {
        Walk::Continue
    }

    fn visit_declaration(&mut self, declaration: &'a Declaration, scope: &Scope<'a>) {}

    /// Called once per block (the stylesheet itself, each rule body and each
    /// at-rule body) before its items are visited.
    fn visit_block(&mut self, items: &'a [Item], scope: &Scope<'a>) {}
}

/// Walk `stylesheet` depth-first in source order.
pub fn walk<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, stylesheet: &'a Stylesheet) {
    let mut scope = Scope::default();
    walk_items(visitor, &stylesheet.items, &mut scope);
}

fn walk_items<'a, V: Visitor<'a> + ?Sized>(
    visitor: &mut V,
    items: &'a [Item],
    scope: &mut Scope<'a>,
) {
    visitor.visit_block(items, scope);

    for item in items {
        match item {
            Item::Declaration(declaration) => visitor.visit_declaration(declaration, scope),
            Item::Rule(rule) => {
                if visitor.enter_rule(rule, scope) == Walk::Continue {
                    scope.ancestors.push(Ancestor::Rule(rule));
                    walk_items(visitor, &rule.items, scope);
                    scope.ancestors.pop();
                }
                visitor.exit_rule(rule, scope);
            }
            Item::AtRule(at_rule) => {
                if visitor.enter_at_rule(at_rule, scope) == Walk::Continue {
                    if let Some(block) = &at_rule.block {
                        scope.ancestors.push(Ancestor::AtRule(at_rule));
                        walk_items(visitor, block, scope);
                        scope.ancestors.pop();
                    }
                }
            }
        }
    }
}
