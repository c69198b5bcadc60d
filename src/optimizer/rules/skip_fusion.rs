use lazy_static::lazy_static;
use log::{debug, trace};

use super::RuleImpl;
use crate::expr::{ExprNode, ExprRef, Operand, Operator};
use crate::optimizer::core::{Pattern, PatternChildrenPredicate, Rule};
use crate::schema::SchemaCache;

lazy_static! {
    static ref SELECT_AFTER_APPEND: Pattern = {
        Pattern {
            predicate: |e| e.op() == &Operator::ColumnSelect && e.arity() == 2,
            children: PatternChildrenPredicate::Leading(vec![Pattern {
                predicate: |e| e.op() == &Operator::Append,
                children: PatternChildrenPredicate::Leading(vec![Pattern {
                    predicate: |_| true,
                    children: PatternChildrenPredicate::None,
                }]),
            }]),
        }
    };
}

/// Select a column straight from the base frame of an `append` when the column existed before
/// the append: `(cols_py (append base col "name") k)` becomes `(cols_py base k)` whenever
/// `k < ncols(base)`.
#[derive(Clone)]
pub struct SkipFusion {
    operators: Vec<Operator>,
}

impl SkipFusion {
    pub fn create() -> RuleImpl {
        Self {
            operators: vec![Operator::ColumnSelect],
        }
        .into()
    }

    /// Base operand of the skipped append and the selector.
    fn split(expr: &ExprNode) -> Option<(&ExprRef, &Operand)> {
        let append = expr.expr_arg(0).ok()?;
        let base = append.expr_arg(0).ok()?;
        let selector = expr.arg(1).ok()?;
        Some((base, selector))
    }
}

impl Rule for SkipFusion {
    fn supported_operators(&self) -> &[Operator] {
        &self.operators
    }

    fn is_applicable(&self, expr: &ExprNode, schema: &dyn SchemaCache) -> bool {
        assert!(
            expr.arity() > 0,
            "{} expression {} has no operands",
            expr.op(),
            expr.id()
        );
        if !SELECT_AFTER_APPEND.matches(expr) {
            return false;
        }
        match Self::split(expr) {
            Some((base, _)) => schema.column_count_if_known(base).is_some(),
            None => false,
        }
    }

    fn apply(&self, expr: ExprRef, schema: &dyn SchemaCache) -> ExprRef {
        let (base, selector) = match Self::split(&expr) {
            Some(parts) => parts,
            None => return expr,
        };
        let ncols = match schema.column_count_if_known(base) {
            Some(ncols) => ncols,
            None => return expr,
        };
        let index = selector.as_literal().and_then(|l| l.as_int());
        match index {
            Some(k) if k >= 0 && (k as usize) < ncols => {
                debug!(
                    "skip append over {} for column {} of {} in {}",
                    base.id(),
                    k,
                    ncols,
                    expr.id()
                );
                expr.clone_with_children(vec![Operand::Expr(base.clone()), selector.clone()])
            }
            _ => {
                trace!(
                    "keep append under {}: selector {} needs appended columns",
                    expr.id(),
                    selector
                );
                expr.clone()
            }
        }
    }
}
