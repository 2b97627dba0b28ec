use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use epoa_core::{EpoaError, RoleRow};
use serde::Deserialize;
use serde_yaml::Value;

use crate::dates::parse_sheet_date;

pub const COL_COMPANY: &str = "Company";
pub const COL_ROLE_TITLE: &str = "Role Title";
pub const COL_ROLE_URL: &str = "Role Posting URL";
pub const COL_LOCATION: &str = "Location";
pub const COL_JURISDICTION: &str = "Jurisdiction";
pub const COL_DATE_APPLIED: &str = "Date Applied";
pub const COL_DATE_TO_LEGAL: &str = "Date Provided to Legal";
pub const COL_NOTES: &str = "Notes";

/// Anything that can hand the pipeline its rows, in sheet order.
pub trait RowSource {
    fn load_rows(&self) -> Result<Vec<RoleRow>, EpoaError>;
}

/// Workbook export: `tabs: { <tab>: [ { <column header>: <cell> } ] }`.
#[derive(Debug, Deserialize)]
pub struct Workbook {
    pub tabs: BTreeMap<String, Vec<BTreeMap<String, Value>>>,
}

#[derive(Clone, Debug)]
pub struct YamlRoster {
    pub path: PathBuf,
    pub tab: String,
}

impl YamlRoster {
    pub fn new(path: impl Into<PathBuf>, tab: impl Into<String>) -> Self {
        Self { path: path.into(), tab: tab.into() }
    }

    pub fn load_workbook(path: &Path) -> Result<Workbook, EpoaError> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| EpoaError::SpreadsheetRead(format!("read {}: {e}", path.display())))?;
        serde_yaml::from_str(&s).map_err(|e| EpoaError::SpreadsheetRead(format!("parse {}: {e}", path.display())))
    }
}

impl RowSource for YamlRoster {
    fn load_rows(&self) -> Result<Vec<RoleRow>, EpoaError> {
        let mut workbook = Self::load_workbook(&self.path)?;
        let records = workbook.tabs.remove(&self.tab).ok_or_else(|| {
            let known: Vec<&String> = workbook.tabs.keys().collect();
            EpoaError::SpreadsheetRead(format!("tab {:?} not found in {} (tabs: {known:?})", self.tab, self.path.display()))
        })?;
        let rows = rows_from_records(&records)?;
        tracing::info!(tab = %self.tab, rows = rows.len(), "loaded roster");
        Ok(rows)
    }
}

/// Convert raw records to rows. Wholly blank records are dropped; a record
/// with only some required cells filled is an error.
pub fn rows_from_records(records: &[BTreeMap<String, Value>]) -> Result<Vec<RoleRow>, EpoaError> {
    let mut rows = Vec::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        let row_number = idx + 1;
        let company = cell_text(record, COL_COMPANY);
        let title = cell_text(record, COL_ROLE_TITLE);
        let url = cell_text(record, COL_ROLE_URL);

        let (company, role_title, role_url) = match (company, title, url) {
            (None, None, None) => continue,
            (Some(c), Some(t), Some(u)) => (c, t, u),
            (c, t, u) => {
                let missing: Vec<&str> = [(COL_COMPANY, c), (COL_ROLE_TITLE, t), (COL_ROLE_URL, u)]
                    .into_iter()
                    .filter(|(_, v)| v.is_none())
                    .map(|(name, _)| name)
                    .collect();
                return Err(EpoaError::SpreadsheetRead(format!("row {row_number}: missing {}", missing.join(", "))));
            }
        };

        if let Err(e) = url::Url::parse(&role_url) {
            return Err(EpoaError::SpreadsheetRead(format!("row {row_number}: bad {COL_ROLE_URL} {role_url:?}: {e}")));
        }

        rows.push(RoleRow {
            row_number,
            company,
            role_title,
            role_url,
            location: cell_text(record, COL_LOCATION),
            jurisdiction: cell_text(record, COL_JURISDICTION),
            date_applied: cell_date(record, COL_DATE_APPLIED, row_number)?,
            date_provided_to_legal: cell_date(record, COL_DATE_TO_LEGAL, row_number)?,
            notes: cell_text(record, COL_NOTES),
        });
    }
    Ok(rows)
}

fn cell_text(record: &BTreeMap<String, Value>, column: &str) -> Option<String> {
    let text = match record.get(column)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn cell_date(
    record: &BTreeMap<String, Value>,
    column: &str,
    row_number: usize,
) -> Result<Option<chrono::NaiveDate>, EpoaError> {
    match cell_text(record, column) {
        None => Ok(None),
        Some(raw) => parse_sheet_date(&raw)
            .map_err(|e| EpoaError::SpreadsheetRead(format!("row {row_number}: {column}: {e}"))),
    }
}
