use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One roster record, as read from the spreadsheet tab.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleRow {
    /// 1-based position of the row in its tab.
    pub row_number: usize,
    pub company: String,
    pub role_title: String,
    pub role_url: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub jurisdiction: Option<String>,
    #[serde(default)]
    pub date_applied: Option<NaiveDate>,
    #[serde(default)]
    pub date_provided_to_legal: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RoleRow {
    pub fn new(
        row_number: usize,
        company: impl Into<String>,
        role_title: impl Into<String>,
        role_url: impl Into<String>,
    ) -> Self {
        Self {
            row_number,
            company: company.into(),
            role_title: role_title.into(),
            role_url: role_url.into(),
            location: None,
            jurisdiction: None,
            date_applied: None,
            date_provided_to_legal: None,
            notes: None,
        }
    }

    pub fn applied_on(mut self, date: NaiveDate) -> Self {
        self.date_applied = Some(date);
        self
    }

    /// "<title> at <company>", used in logs and summaries.
    pub fn label(&self) -> String {
        format!("{} at {}", self.role_title, self.company)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Classification {
    Eligible,
    Skip,
}

/// Per-row pipeline state. `Skipped`, `FetchFailed`, `ScanFailed` and
/// `Scanned` are terminal.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum RowState {
    Pending,
    Skipped,
    Eligible,
    FetchFailed,
    FetchOk,
    ScanFailed,
    Scanned,
}

impl RowState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RowState::Skipped | RowState::FetchFailed | RowState::ScanFailed | RowState::Scanned
        )
    }

    /// Legal transitions of the per-row state machine.
    pub fn can_advance_to(&self, next: RowState) -> bool {
        matches!(
            (self, next),
            (RowState::Pending, RowState::Skipped)
                | (RowState::Pending, RowState::Eligible)
                | (RowState::Eligible, RowState::FetchFailed)
                | (RowState::Eligible, RowState::FetchOk)
                | (RowState::FetchOk, RowState::ScanFailed)
                | (RowState::FetchOk, RowState::Scanned)
        )
    }
}
