use std::collections::HashMap;
use std::path::{Path, PathBuf};

use epoa_core::{EpoaError, EvidenceLocation, RoleRow};

/// Hands out evidence locations for one run and refuses to give the same
/// directory out twice, even to rows that carry the same row number.
#[derive(Debug)]
pub struct LocationResolver {
    root: PathBuf,
    claimed: HashMap<PathBuf, usize>,
}

impl LocationResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), claimed: HashMap::new() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&mut self, row: &RoleRow) -> Result<EvidenceLocation, EpoaError> {
        let location = EvidenceLocation::for_row(&self.root, row);
        match self.claimed.get(&location.directory_path) {
            Some(&first_row) => Err(EpoaError::PathCollision {
                first_row,
                second_row: row.row_number,
                directory: location.directory_path,
            }),
            None => {
                self.claimed.insert(location.directory_path.clone(), row.row_number);
                Ok(location)
            }
        }
    }
}
