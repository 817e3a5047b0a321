pub mod catalog;
pub mod search;

pub use catalog::*;
pub use search::*;
