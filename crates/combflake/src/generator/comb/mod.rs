mod basic;
mod interface;

pub use basic::*;
pub use interface::*;
