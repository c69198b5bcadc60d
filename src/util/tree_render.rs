use std::fmt;

use derive_new::new;

use crate::expr::{ExprNode, Operand, Operator};

/// Indented explain view of an expression tree, one operand per line.
///
/// ```text
/// cols_py
///   append
///     frameA
///     "extra"
///     "name"
///   42
/// ```
#[derive(new)]
pub struct TreeRender<'a> {
    expr: &'a ExprNode,
}

impl TreeRender<'_> {
    fn render_expr(expr: &ExprNode, level: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = " ".repeat(level * 2);
        if expr.op() == &Operator::Frame {
            return writeln!(f, "{}{}", indent, expr);
        }
        writeln!(f, "{}{}", indent, expr.op())?;
        for child in expr.children() {
            match child {
                Operand::Expr(e) => Self::render_expr(e, level + 1, f)?,
                Operand::Literal(l) => writeln!(f, "{}  {}", indent, l)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for TreeRender<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::render_expr(self.expr, 0, f)
    }
}
