pub mod dates;
pub mod roster;

pub use dates::*;
pub use roster::*;
