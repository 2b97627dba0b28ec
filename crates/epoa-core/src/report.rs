use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{FetchOutcome, RoleRow, RowState, ScanVerdict};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProcessedRole {
    pub row: RoleRow,
    pub fetch: FetchOutcome,
    pub verdict: ScanVerdict,
}

impl ProcessedRole {
    pub fn state(&self) -> RowState {
        if self.verdict.is_error() {
            RowState::ScanFailed
        } else {
            RowState::Scanned
        }
    }

    /// Flagged or unreadable postings need a human before submission.
    pub fn needs_attention(&self) -> bool {
        self.verdict.flagged || self.verdict.is_error()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RowRecord {
    pub row_number: usize,
    pub state: RowState,
}

/// Aggregate result of one run. Every sequence is in spreadsheet order.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunReport {
    pub processed: Vec<ProcessedRole>,
    pub skipped: Vec<RoleRow>,
    pub failed: Vec<FetchOutcome>,
    pub states: Vec<RowRecord>,
}

impl RunReport {
    pub fn record_skipped(&mut self, row: RoleRow) {
        self.states.push(RowRecord { row_number: row.row_number, state: RowState::Skipped });
        self.skipped.push(row);
    }

    pub fn record_failed(&mut self, outcome: FetchOutcome) {
        self.states.push(RowRecord { row_number: outcome.row.row_number, state: RowState::FetchFailed });
        self.failed.push(outcome);
    }

    pub fn record_processed(&mut self, processed: ProcessedRole) {
        self.states.push(RowRecord { row_number: processed.row.row_number, state: processed.state() });
        self.processed.push(processed);
    }

    pub fn flagged_count(&self) -> usize {
        self.processed.iter().filter(|p| p.verdict.flagged).count()
    }

    pub fn needs_attention_count(&self) -> usize {
        self.processed.iter().filter(|p| p.needs_attention()).count() + self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.needs_attention_count() == 0
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Processed: {}  Skipped: {}  Failed: {}  Needs attention: {}",
            self.processed.len(),
            self.skipped.len(),
            self.failed.len(),
            self.needs_attention_count()
        )?;
        for p in &self.processed {
            let status = match (&p.verdict.error_detail, p.verdict.flagged) {
                (Some(err), _) => format!("SCAN ERROR ({err})"),
                (None, true) => format!(
                    "FLAGGED [{}]",
                    p.verdict.matched_terms.iter().cloned().collect::<Vec<_>>().join(", ")
                ),
                (None, false) => "clean".to_string(),
            };
            writeln!(f, "  row {:>3}  {}  {}", p.row.row_number, p.row.label(), status)?;
            for m in &p.verdict.matches {
                writeln!(f, "             page {}: \"{}\" in [ {} ]", m.page, m.term, m.line)?;
            }
        }
        for o in &self.failed {
            writeln!(
                f,
                "  row {:>3}  {}  FETCH FAILED ({})",
                o.row.row_number,
                o.row.label(),
                o.error_detail.as_deref().unwrap_or("unknown error")
            )?;
        }
        for row in &self.skipped {
            writeln!(f, "  row {:>3}  {}  skipped (applied)", row.row_number, row.label())?;
        }
        Ok(())
    }
}
