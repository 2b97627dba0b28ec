use std::path::Path;

use epoa_core::FetchError;

/// Turns a posting URL into a PDF on disk. One attempt per call; the caller
/// owns cleanup of `output` when this returns an error.
pub trait Renderer: Send + Sync {
    fn render(&self, url: &str, output: &Path) -> Result<(), FetchError>;

    fn describe(&self) -> String;
}
