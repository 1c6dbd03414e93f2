mod convert;
mod interface;
mod no_repeat;
mod system_clock;

pub use convert::*;
pub use interface::*;
pub use no_repeat::*;
pub use system_clock::*;
