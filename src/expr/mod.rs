mod errors;
mod literal;
mod operator;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub use errors::*;
use itertools::Itertools;
pub use literal::*;
pub use operator::*;

/// The type of reference to an expression node.
pub type ExprRef = Arc<ExprNode>;

static NEXT_EXPR_ID: AtomicU64 = AtomicU64::new(0);

/// Schema identity of an expression node. Schema metadata is keyed on it.
///
/// Every new node gets a fresh id. A node rebuilt over equivalent operands keeps the id of the
/// node it replaces (see [`ExprNode::with_children`]), because it computes the same frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(u64);

impl ExprId {
    fn next() -> Self {
        ExprId(NEXT_EXPR_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub enum Operand {
    Expr(ExprRef),
    Literal(Literal),
}

impl Operand {
    pub fn as_expr(&self) -> Option<&ExprRef> {
        match self {
            Operand::Expr(e) => Some(e),
            Operand::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Operand::Expr(_) => None,
            Operand::Literal(l) => Some(l),
        }
    }

    /// Identity for expressions, value equality for literals.
    pub fn is_same(&self, other: &Operand) -> bool {
        match (self, other) {
            (Operand::Expr(a), Operand::Expr(b)) => ExprNode::is_same(a, b),
            (Operand::Literal(a), Operand::Literal(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Expr(e) => write!(f, "{}", e),
            Operand::Literal(l) => write!(f, "{}", l),
        }
    }
}

impl From<ExprRef> for Operand {
    fn from(e: ExprRef) -> Self {
        Operand::Expr(e)
    }
}

impl From<&ExprRef> for Operand {
    fn from(e: &ExprRef) -> Self {
        Operand::Expr(e.clone())
    }
}

impl From<Literal> for Operand {
    fn from(l: Literal) -> Self {
        Operand::Literal(l)
    }
}

macro_rules! impl_operand_from_literal {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Operand {
                fn from(v: $ty) -> Self {
                    Operand::Literal(v.into())
                }
            }
        )*
    };
}

impl_operand_from_literal! { i64, f64, &str, String, Vec<i64> }

/// One lazily recorded operation: an operator tag applied to ordered operands.
///
/// Nodes are never mutated after construction, and two nodes are the same node only when they
/// are the same `Arc`.
#[derive(Debug)]
pub struct ExprNode {
    id: ExprId,
    op: Operator,
    children: Vec<Operand>,
}

impl ExprNode {
    pub fn new(op: Operator, children: Vec<Operand>) -> ExprRef {
        Arc::new(Self {
            id: ExprId::next(),
            op: op.normalized(),
            children,
        })
    }

    /// Leaf node referencing a materialized frame.
    pub fn frame(key: impl Into<String>) -> ExprRef {
        Self::new(Operator::Frame, vec![Operand::Literal(Literal::Key(key.into()))])
    }

    pub fn id(&self) -> ExprId {
        self.id
    }

    pub fn op(&self) -> &Operator {
        &self.op
    }

    pub fn children(&self) -> &[Operand] {
        &self.children
    }

    pub fn arity(&self) -> usize {
        self.children.len()
    }

    pub fn arg(&self, index: usize) -> Result<&Operand, ExprError> {
        self.children.get(index).ok_or(ExprError::OutOfRange {
            index,
            arity: self.arity(),
        })
    }

    pub fn expr_arg(&self, index: usize) -> Result<&ExprRef, ExprError> {
        self.arg(index)?
            .as_expr()
            .ok_or(ExprError::NotAnExpression { index })
    }

    /// Operands that are themselves expressions, in order.
    pub fn child_exprs(&self) -> impl Iterator<Item = &ExprRef> {
        self.children.iter().filter_map(Operand::as_expr)
    }

    /// A fresh node with the same operator and the given operands.
    pub fn clone_with_children(&self, children: Vec<Operand>) -> ExprRef {
        Self::new(self.op.clone(), children)
    }

    /// A new node computing the same frame as `self` over `children`, which must be equivalent
    /// to the current operands. It keeps `self`'s [`ExprId`], so schema metadata recorded for
    /// `self` still applies.
    pub fn with_children(&self, children: Vec<Operand>) -> ExprRef {
        Arc::new(Self {
            id: self.id,
            op: self.op.clone(),
            children,
        })
    }

    pub fn is_same(a: &ExprRef, b: &ExprRef) -> bool {
        Arc::ptr_eq(a, b)
    }
}

/// Renders the Rapids s-expression, e.g. `(append frameA "c1" "n1")`.
impl fmt::Display for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op {
            Operator::Frame => write!(f, "{}", self.children.iter().join(" ")),
            _ if self.children.is_empty() => write!(f, "({})", self.op),
            _ => write!(f, "({} {})", self.op, self.children.iter().join(" ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn build_append() -> ExprRef {
        ExprNode::new(
            Operator::Append,
            vec![ExprNode::frame("frameA").into(), "c1".into(), "n1".into()],
        )
    }

    #[test]
    fn test_arg_out_of_range() {
        let expr = build_append();
        assert_eq!(expr.arity(), 3);
        assert!(expr.arg(2).is_ok());
        assert_eq!(
            expr.arg(3).unwrap_err(),
            ExprError::OutOfRange { index: 3, arity: 3 }
        );
    }

    #[test]
    fn test_expr_arg() {
        let expr = build_append();
        assert_eq!(expr.expr_arg(0).unwrap().op(), &Operator::Frame);
        assert_eq!(
            expr.expr_arg(1).unwrap_err(),
            ExprError::NotAnExpression { index: 1 }
        );
    }

    #[test]
    fn test_display_rapids() {
        let expr = ExprNode::new(
            Operator::ColumnSelect,
            vec![build_append().into(), 42i64.into()],
        );
        assert_eq!(expr.to_string(), "(cols_py (append frameA \"c1\" \"n1\") 42)");

        let expr = ExprNode::new(
            Operator::ColumnSelect,
            vec![ExprNode::frame("fr").into(), vec![0i64, 2].into()],
        );
        assert_eq!(expr.to_string(), "(cols_py fr [0 2])");
    }

    #[test]
    fn test_clone_with_children_is_new_node() {
        let expr = build_append();
        let cloned = expr.clone_with_children(expr.children().to_vec());
        assert!(!ExprNode::is_same(&expr, &cloned));
        assert_ne!(expr.id(), cloned.id());
        assert_eq!(expr.to_string(), cloned.to_string());
        assert!(expr.children()[0].is_same(&cloned.children()[0]));
    }

    #[test]
    fn test_with_children_keeps_schema_identity() {
        let expr = build_append();
        let rebuilt = expr.with_children(expr.children().to_vec());
        assert!(!ExprNode::is_same(&expr, &rebuilt));
        assert_eq!(expr.id(), rebuilt.id());
        assert_eq!(expr.to_string(), rebuilt.to_string());
    }

    #[test]
    fn test_known_operator_name_is_normalized() {
        let expr = ExprNode::new(
            Operator::Other("append".to_string()),
            vec![ExprNode::frame("frameA").into(), "c1".into()],
        );
        assert_eq!(expr.op(), &Operator::Append);
    }
}
