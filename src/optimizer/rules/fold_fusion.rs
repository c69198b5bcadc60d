use log::debug;

use super::RuleImpl;
use crate::expr::{ExprNode, ExprRef, Operator};
use crate::optimizer::core::Rule;
use crate::schema::SchemaCache;

/// Collapse a nested chain of the same variadic accumulator operator into one node:
/// `outer(inner(base, a, b), c, d)` becomes `outer(base, a, b, c, d)`.
///
/// One application folds exactly one level; deeper chains need the rule to run again on the
/// result.
#[derive(Clone)]
pub struct FoldFusion {
    operators: Vec<Operator>,
}

impl FoldFusion {
    /// Fold over `append` and `cbind`.
    pub fn create() -> RuleImpl {
        Self::over(vec![Operator::Append, Operator::Cbind])
    }

    /// Fold over the given operators. Each of them must be associative in its operand list.
    pub fn over(operators: Vec<Operator>) -> RuleImpl {
        Self { operators }.into()
    }
}

impl Rule for FoldFusion {
    fn supported_operators(&self) -> &[Operator] {
        &self.operators
    }

    fn is_applicable(&self, expr: &ExprNode, _schema: &dyn SchemaCache) -> bool {
        assert!(
            expr.arity() > 0,
            "{} expression {} has no operands",
            expr.op(),
            expr.id()
        );
        self.supports(expr.op())
            && matches!(expr.children()[0].as_expr(), Some(inner) if inner.op() == expr.op())
    }

    fn apply(&self, expr: ExprRef, _schema: &dyn SchemaCache) -> ExprRef {
        let inner = match expr.children()[0].as_expr() {
            Some(inner) => inner,
            None => return expr,
        };
        let children = inner
            .children()
            .iter()
            .chain(&expr.children()[1..])
            .cloned()
            .collect::<Vec<_>>();
        debug!(
            "fold {} {} into {}: arity {} -> {}",
            expr.op(),
            inner.id(),
            expr.id(),
            expr.arity(),
            children.len()
        );
        expr.clone_with_children(children)
    }
}
