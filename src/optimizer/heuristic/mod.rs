mod fuser;
mod registry;
mod strategy;

pub use fuser::*;
pub use registry::*;
pub use strategy::*;
