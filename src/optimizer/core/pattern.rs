use crate::expr::ExprNode;

/// Tree-shape pattern matched against an expression node and its leading operands.
pub struct Pattern {
    /// Predicate on the node itself.
    pub predicate: fn(&ExprNode) -> bool,
    pub children: PatternChildrenPredicate,
}

pub enum PatternChildrenPredicate {
    /// The first `n` operands must be expressions matching these patterns, in order. Operands
    /// past `n` are not inspected.
    Leading(Vec<Pattern>),
    /// Operands are not inspected.
    None,
}

impl Pattern {
    pub fn matches(&self, expr: &ExprNode) -> bool {
        if !(self.predicate)(expr) {
            return false;
        }
        match &self.children {
            PatternChildrenPredicate::None => true,
            PatternChildrenPredicate::Leading(patterns) => {
                patterns.len() <= expr.arity()
                    && patterns
                        .iter()
                        .zip(expr.children())
                        .all(|(pattern, child)| match child.as_expr() {
                            Some(child) => pattern.matches(child),
                            None => false,
                        })
            }
        }
    }
}
