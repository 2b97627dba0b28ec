pub mod config;
pub mod doctor;
pub mod fetcher;
pub mod pipeline;

pub use config::*;
pub use doctor::*;
pub use fetcher::*;
pub use pipeline::*;
