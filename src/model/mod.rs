pub mod catalog;
pub mod common;
pub mod evolution;
pub mod filter;
pub mod pokemon;

pub use catalog::*;
pub use common::*;
pub use evolution::*;
pub use filter::*;
pub use pokemon::*;
