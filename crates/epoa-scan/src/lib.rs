pub mod fixture;
pub mod pdf;
pub mod rule;
pub mod scanner;

pub use pdf::*;
pub use rule::*;
pub use scanner::*;
