mod any;
mod config;
mod interface;
mod seata;
#[cfg(test)]
mod tests;
mod twitter;

pub use any::*;
pub use config::*;
pub use interface::*;
pub use seata::*;
pub use twitter::*;
