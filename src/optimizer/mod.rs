mod core;
mod heuristic;
mod rules;

pub use self::core::*;
pub use heuristic::*;
pub use rules::*;
