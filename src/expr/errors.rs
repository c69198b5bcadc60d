#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ExprError {
    #[error("operand index {index} out of range for expression of arity {arity}")]
    OutOfRange { index: usize, arity: usize },
    #[error("operand {index} is a literal, not an expression")]
    NotAnExpression { index: usize },
}
