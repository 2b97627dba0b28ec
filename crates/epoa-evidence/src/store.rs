use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use epoa_core::EvidenceLocation;
use sha2::{Digest, Sha256};

/// Filesystem side of evidence collection. Append-only: nothing here removes
/// a file other than the posting of the location it is handed.
pub trait EvidenceStore: Send + Sync {
    fn acquire_dir(&self, location: &EvidenceLocation) -> Result<()>;
    fn posting_present(&self, location: &EvidenceLocation) -> bool;
    fn discard_posting(&self, location: &EvidenceLocation) -> Result<()>;
    fn posting_digest(&self, location: &EvidenceLocation) -> Result<String>;
    /// Copy `source` into the role directory unless a file with that name is already there.
    fn stage_file(&self, location: &EvidenceLocation, source: &Path) -> Result<Option<PathBuf>>;
}

#[derive(Clone, Debug)]
pub struct FsEvidenceStore {
    pub root: PathBuf,
}

impl FsEvidenceStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn ensure_root(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root).with_context(|| format!("create evidence root {}", self.root.display()))
    }

    fn check_under_root(&self, path: &Path) -> Result<()> {
        if !path.starts_with(&self.root) {
            return Err(anyhow!("{} is outside evidence root {}", path.display(), self.root.display()));
        }
        Ok(())
    }
}

impl EvidenceStore for FsEvidenceStore {
    fn acquire_dir(&self, location: &EvidenceLocation) -> Result<()> {
        self.check_under_root(&location.directory_path)?;
        std::fs::create_dir_all(&location.directory_path)
            .with_context(|| format!("create evidence dir {}", location.directory_path.display()))?;
        Ok(())
    }

    fn posting_present(&self, location: &EvidenceLocation) -> bool {
        std::fs::metadata(&location.posting_pdf_path)
            .map(|m| m.is_file() && m.len() > 0)
            .unwrap_or(false)
    }

    fn discard_posting(&self, location: &EvidenceLocation) -> Result<()> {
        self.check_under_root(&location.posting_pdf_path)?;
        match std::fs::remove_file(&location.posting_pdf_path) {
            Ok(()) => {
                tracing::debug!(path = %location.posting_pdf_path.display(), "removed partial posting");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove {}", location.posting_pdf_path.display())),
        }
    }

    fn posting_digest(&self, location: &EvidenceLocation) -> Result<String> {
        let bytes = std::fs::read(&location.posting_pdf_path)
            .with_context(|| format!("read {}", location.posting_pdf_path.display()))?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(hex::encode(hasher.finalize()))
    }

    fn stage_file(&self, location: &EvidenceLocation, source: &Path) -> Result<Option<PathBuf>> {
        let name = source.file_name().ok_or_else(|| anyhow!("{} has no file name", source.display()))?;
        let dest = location.directory_path.join(name);
        if dest.exists() {
            return Ok(None);
        }
        std::fs::copy(source, &dest).with_context(|| format!("copy {} -> {}", source.display(), dest.display()))?;
        Ok(Some(dest))
    }
}
