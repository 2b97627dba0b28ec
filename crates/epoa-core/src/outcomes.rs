use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{FetchError, RoleRow, UnreadablePdfError};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetchOutcome {
    pub row: RoleRow,
    pub succeeded: bool,
    pub error_detail: Option<String>,
    /// A non-empty posting was already on disk; the renderer was not invoked.
    #[serde(default)]
    pub reused_existing: bool,
    #[serde(default)]
    pub pdf_sha256: Option<String>,
}

impl FetchOutcome {
    pub fn fetched(row: RoleRow, pdf_sha256: Option<String>) -> Self {
        Self { row, succeeded: true, error_detail: None, reused_existing: false, pdf_sha256 }
    }

    pub fn reused(row: RoleRow, pdf_sha256: Option<String>) -> Self {
        Self { row, succeeded: true, error_detail: None, reused_existing: true, pdf_sha256 }
    }

    pub fn failed(row: RoleRow, err: &FetchError) -> Self {
        Self {
            row,
            succeeded: false,
            error_detail: Some(err.to_string()),
            reused_existing: false,
            pdf_sha256: None,
        }
    }
}

/// One trigger-word hit with enough context for a reviewer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TermMatch {
    pub term: String,
    pub page: u32,
    pub line: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanVerdict {
    pub row: RoleRow,
    pub flagged: bool,
    pub matched_terms: BTreeSet<String>,
    #[serde(default)]
    pub matches: Vec<TermMatch>,
    pub error_detail: Option<String>,
}

impl ScanVerdict {
    pub fn from_matches(row: RoleRow, matches: Vec<TermMatch>) -> Self {
        let matched_terms: BTreeSet<String> = matches.iter().map(|m| m.term.clone()).collect();
        Self {
            row,
            flagged: !matched_terms.is_empty(),
            matched_terms,
            matches,
            error_detail: None,
        }
    }

    /// An unreadable posting is never a pass: it is reported, unflagged, with the reason.
    pub fn unreadable(row: RoleRow, err: &UnreadablePdfError) -> Self {
        Self {
            row,
            flagged: false,
            matched_terms: BTreeSet::new(),
            matches: vec![],
            error_detail: Some(err.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error_detail.is_some()
    }
}
