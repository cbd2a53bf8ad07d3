pub mod evolution;

pub use evolution::*;
