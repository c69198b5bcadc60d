//! Peephole fusion over lazy Rapids expression trees.
//!
//! Frame operations are recorded as [`expr::ExprNode`]s instead of being executed. Before a
//! tree is sent to the engine, the optimizer collapses redundant chains of nodes so fewer
//! intermediate frames get materialized.

pub mod expr;
pub mod optimizer;
pub mod schema;
pub mod util;

pub use self::optimizer::{fuse, optimize, Fuser, FuseStrategy, RuleRegistry};
