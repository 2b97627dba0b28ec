use anyhow::{Context, Result};
use epoa_core::{classify, Classification};
use epoa_evidence::FsEvidenceStore;
use epoa_sheet::{RowSource, YamlRoster};

use crate::Config;

/// Check that an `apply` run could start: config valid, renderer runs,
/// evidence root writable, roster tab readable. Returns one line per check.
pub fn doctor(cfg: &Config) -> Result<Vec<String>> {
    let mut checks = Vec::new();

    cfg.validate()?;
    checks.push(format!("config ok ({})", cfg.name));

    let version = cfg
        .browser_renderer()
        .version()
        .with_context(|| format!("renderer {} is not runnable", cfg.renderer.binary))?;
    checks.push(format!("renderer ok ({version})"));

    let store = FsEvidenceStore::new(cfg.evidence_dir());
    store.ensure_root()?;
    checks.push(format!("evidence root ok ({})", store.root.display()));

    let rows = YamlRoster::new(cfg.spreadsheet_path(), &cfg.spreadsheet_tab).load_rows()?;
    let pending = rows.iter().filter(|r| classify(r) == Classification::Eligible).count();
    checks.push(format!("roster ok ({} rows, {pending} not yet applied)", rows.len()));

    Ok(checks)
}
