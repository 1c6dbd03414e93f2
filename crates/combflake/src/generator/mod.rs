mod comb;
mod snowflake;

pub use comb::*;
pub use snowflake::*;
