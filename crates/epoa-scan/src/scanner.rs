use std::path::Path;

use epoa_core::{RoleRow, ScanVerdict};

use crate::{extract_pages, TriggerWordRule};

/// Check a fetched posting for trigger words. Read failures come back inside
/// the verdict, never as an `Err`.
pub fn scan(row: &RoleRow, posting_pdf_path: &Path, rule: &TriggerWordRule) -> ScanVerdict {
    match extract_pages(posting_pdf_path) {
        Ok(pages) => {
            let verdict = ScanVerdict::from_matches(row.clone(), rule.eval(&pages));
            if verdict.flagged {
                tracing::info!(row = row.row_number, terms = ?verdict.matched_terms, "trigger words found");
            }
            verdict
        }
        Err(err) => {
            tracing::warn!(row = row.row_number, path = %posting_pdf_path.display(), error = %err, "posting unreadable");
            ScanVerdict::unreadable(row.clone(), &err)
        }
    }
}
