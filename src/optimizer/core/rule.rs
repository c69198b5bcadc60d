use enum_dispatch::enum_dispatch;

use crate::expr::{ExprNode, ExprRef, Operator};
use crate::schema::SchemaCache;

/// A rule is a local rewrite that replaces one expression node with an equivalent, cheaper one.
///
/// `is_applicable` and `apply` only read the node and the schema oracle. Shape assumptions a
/// rule relies on are contracts: violating them panics instead of returning false.
#[enum_dispatch]
pub trait Rule {
    /// Operators this rule may fire on.
    fn supported_operators(&self) -> &[Operator];

    fn supports(&self, op: &Operator) -> bool {
        self.supported_operators().contains(op)
    }

    fn is_applicable(&self, expr: &ExprNode, schema: &dyn SchemaCache) -> bool;

    /// Rewrite a node `is_applicable` accepted. Returning `expr` itself means the rule decided
    /// not to change anything. Any other result must have fewer nodes than `expr`, which is
    /// what makes fusing to a fixed point terminate.
    fn apply(&self, expr: ExprRef, schema: &dyn SchemaCache) -> ExprRef;
}
