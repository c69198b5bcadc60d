mod tree_render;

pub use tree_render::*;

use crate::expr::ExprNode;

pub fn pretty_expr_tree_string(expr: &ExprNode) -> String {
    TreeRender::new(expr).to_string()
}

/// Print the explain tree of `expr` to stdout.
pub fn pretty_expr_tree(expr: &ExprNode) {
    println!("{}", TreeRender::new(expr));
}
