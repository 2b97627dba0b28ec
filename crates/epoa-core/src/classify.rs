use crate::{Classification, RoleRow};

/// Rows that already carry an applied date were handled in an earlier run.
pub fn classify(row: &RoleRow) -> Classification {
    match row.date_applied {
        Some(_) => Classification::Skip,
        None => Classification::Eligible,
    }
}
