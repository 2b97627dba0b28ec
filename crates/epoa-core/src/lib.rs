pub mod classify;
pub mod error;
pub mod location;
pub mod model;
pub mod outcomes;
pub mod report;

pub use classify::*;
pub use error::*;
pub use location::*;
pub use model::*;
pub use outcomes::*;
pub use report::*;
