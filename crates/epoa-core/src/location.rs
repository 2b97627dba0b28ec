use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::RoleRow;

pub const POSTING_FILE: &str = "posting.pdf";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvidenceLocation {
    pub directory_path: PathBuf,
    pub posting_pdf_path: PathBuf,
}

impl EvidenceLocation {
    /// Pure: same root and same company/title always give the same paths.
    pub fn for_row(evidence_root: &Path, row: &RoleRow) -> Self {
        let directory_path = evidence_root.join(evidence_dir_name(row));
        let posting_pdf_path = directory_path.join(POSTING_FILE);
        Self { directory_path, posting_pdf_path }
    }
}

/// `<company>-<role title>`, both normalized with [`normalize_segment`].
pub fn evidence_dir_name(row: &RoleRow) -> String {
    let company = normalize_segment(&row.company);
    let title = normalize_segment(&row.role_title);
    match (company.is_empty(), title.is_empty()) {
        (false, false) => format!("{company}-{title}"),
        (false, true) => company,
        (true, false) => title,
        (true, true) => "untitled".to_string(),
    }
}

/// Lowercase, strip accents from Latin letters, keep letters and digits of
/// any script, and collapse every run of other characters (whitespace,
/// separators, punctuation) into a single `-`.
pub fn normalize_segment(raw: &str) -> String {
    let mut latin_base = false;
    let folded = raw
        .nfkd()
        .filter(move |&c| {
            if is_combining_mark(c) {
                !latin_base
            } else {
                latin_base = c.is_ascii();
                true
            }
        })
        .nfc();

    let mut out = String::with_capacity(raw.len());
    let mut pending_dash = false;
    for c in folded {
        // marks that survive composition belong to the word before them
        let attached_mark = is_combining_mark(c) && !pending_dash && !out.is_empty();
        if c.is_alphanumeric() || attached_mark {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}
