mod fold_fusion;
mod skip_fusion;

use std::fmt::Debug;

use enum_dispatch::enum_dispatch;
pub use fold_fusion::*;
pub use skip_fusion::*;
use strum_macros::AsRefStr;

use crate::expr::{ExprNode, ExprRef, Operator};
use crate::optimizer::core::Rule;
use crate::schema::SchemaCache;

#[enum_dispatch(Rule)]
#[derive(Clone, AsRefStr)]
pub enum RuleImpl {
    FoldFusion,
    SkipFusion,
}

impl Debug for RuleImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}
