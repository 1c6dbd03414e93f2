mod error;
mod generator;
mod id;
mod mutex;
mod random;
mod style;
mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::random::*;
pub use crate::style::*;
pub use crate::time::*;
