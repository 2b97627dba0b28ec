pub mod browser;
#[cfg(unix)]
pub mod stub;
pub mod types;

pub use browser::*;
pub use types::*;
