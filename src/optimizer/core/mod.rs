mod pattern;
mod rule;

pub use pattern::*;
pub use rule::*;
