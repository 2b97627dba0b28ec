use std::path::PathBuf;

use epoa_core::{
    classify, Classification, EpoaError, EvidenceLocation, FetchError, FetchOutcome, ProcessedRole, RoleRow, RowState,
    RunReport,
};
use epoa_evidence::{EvidenceStore, FsEvidenceStore, LocationResolver};
use epoa_render::Renderer;
use epoa_scan::{scan, TriggerWordRule};
use epoa_sheet::RowSource;

use crate::{fetch, Config};

pub struct Pipeline {
    pub evidence_root: PathBuf,
    pub store: Box<dyn EvidenceStore>,
    pub renderer: Box<dyn Renderer>,
    pub rule: TriggerWordRule,
    /// Copied into each role directory when present.
    pub resume: Option<PathBuf>,
}

enum Step {
    Skip,
    Collect(EvidenceLocation),
}

impl Pipeline {
    pub fn from_config(cfg: &Config) -> Result<Self, EpoaError> {
        cfg.validate()?;
        let evidence_root = cfg.evidence_dir();
        Ok(Self {
            store: Box::new(FsEvidenceStore::new(evidence_root.clone())),
            renderer: Box::new(cfg.browser_renderer()),
            rule: cfg.trigger_rule(),
            resume: Some(cfg.resume_path()),
            evidence_root,
        })
    }

    pub fn run_source(&self, source: &dyn RowSource) -> Result<RunReport, EpoaError> {
        let rows = source.load_rows()?;
        self.run(&rows)
    }

    /// Process rows in sheet order. Only a location collision is fatal here;
    /// it is detected for every eligible row before anything touches disk.
    pub fn run(&self, rows: &[RoleRow]) -> Result<RunReport, EpoaError> {
        let mut resolver = LocationResolver::new(&self.evidence_root);
        let mut plan = Vec::with_capacity(rows.len());
        for row in rows {
            let step = match classify(row) {
                Classification::Skip => Step::Skip,
                Classification::Eligible => Step::Collect(resolver.resolve(row)?),
            };
            plan.push((row, step));
        }

        tracing::info!(renderer = %self.renderer.describe(), rows = rows.len(), "starting run");
        let mut report = RunReport::default();
        for (row, step) in plan {
            let mut state = RowState::Pending;
            match step {
                Step::Skip => {
                    advance(row, &mut state, RowState::Skipped);
                    report.record_skipped(row.clone());
                }
                Step::Collect(location) => {
                    advance(row, &mut state, RowState::Eligible);
                    tracing::info!(row = row.row_number, role = %row.label(), dir = %location.directory_path.display(), "collecting evidence");

                    let outcome = match self.prepare(row, &location) {
                        Ok(()) => fetch(row, &location, self.store.as_ref(), self.renderer.as_ref()),
                        Err(failed) => failed,
                    };
                    if !outcome.succeeded {
                        advance(row, &mut state, RowState::FetchFailed);
                        report.record_failed(outcome);
                        continue;
                    }
                    advance(row, &mut state, RowState::FetchOk);

                    let verdict = scan(row, &location.posting_pdf_path, &self.rule);
                    let processed = ProcessedRole { row: row.clone(), fetch: outcome, verdict };
                    advance(row, &mut state, processed.state());
                    report.record_processed(processed);
                }
            }
        }

        tracing::info!(
            processed = report.processed.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "run complete"
        );
        Ok(report)
    }

    /// Acquire the role directory and stage the resume. A directory that
    /// cannot be created fails the row like a fetch would.
    fn prepare(&self, row: &RoleRow, location: &EvidenceLocation) -> Result<(), FetchOutcome> {
        if let Err(e) = self.store.acquire_dir(location) {
            return Err(FetchOutcome::failed(row.clone(), &FetchError::Io(format!("{e:#}"))));
        }
        if let Some(resume) = &self.resume {
            match self.store.stage_file(location, resume) {
                Ok(Some(path)) => tracing::debug!(row = row.row_number, path = %path.display(), "staged resume"),
                Ok(None) => {}
                Err(e) => tracing::warn!(row = row.row_number, error = %format!("{e:#}"), "could not stage resume"),
            }
        }
        Ok(())
    }
}

fn advance(row: &RoleRow, state: &mut RowState, next: RowState) {
    debug_assert!(state.can_advance_to(next), "illegal transition {state:?} -> {next:?}");
    tracing::debug!(row = row.row_number, from = ?state, to = ?next, "row state");
    *state = next;
}

/// Run already-loaded rows with the browser renderer and on-disk store `cfg` describes.
pub fn run(rows: &[RoleRow], cfg: &Config) -> Result<RunReport, EpoaError> {
    Pipeline::from_config(cfg)?.run(rows)
}
