use std::fmt;
use std::str::FromStr;

use strum_macros::EnumString;

/// Operator tag of a lazy expression node.
///
/// Only a handful of tags are special-cased by the fusion rules; anything else produced by the
/// expression construction layer is carried around as `Other` and passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString)]
pub enum Operator {
    /// Leaf referencing an existing frame by key.
    #[strum(serialize = "frame")]
    Frame,
    /// `(append base col name [col name ...])`: add named columns to the right of `base`.
    #[strum(serialize = "append")]
    Append,
    /// `(cbind base frame [frame ...])`: column-wise concatenation.
    #[strum(serialize = "cbind")]
    Cbind,
    /// `(rbind base frame [frame ...])`: row-wise concatenation.
    #[strum(serialize = "rbind")]
    Rbind,
    /// `(cols_py frame selector)`: column selection.
    #[strum(serialize = "cols_py")]
    ColumnSelect,
    #[strum(serialize = "cols")]
    Cols,
    #[strum(serialize = "rows")]
    Rows,
    /// Any operator the rules do not special-case. Nodes built through [`ExprNode::new`]
    /// never carry a known name here; it is normalized to the matching variant.
    ///
    /// [`ExprNode::new`]: crate::expr::ExprNode::new
    #[strum(default)]
    Other(String),
}

impl Operator {
    /// Parse an operator name. Names the optimizer does not know become `Other`.
    pub fn parse(name: &str) -> Self {
        Operator::from_str(name).unwrap_or_else(|_| Operator::Other(name.to_string()))
    }

    /// Map `Other` holding a known name to its variant.
    pub fn normalized(self) -> Self {
        match self {
            Operator::Other(name) => Operator::parse(&name),
            op => op,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Operator::Frame => "frame",
            Operator::Append => "append",
            Operator::Cbind => "cbind",
            Operator::Rbind => "rbind",
            Operator::ColumnSelect => "cols_py",
            Operator::Cols => "cols",
            Operator::Rows => "rows",
            Operator::Other(name) => name,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
