//! Generation request values and the bounds they must satisfy.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::names;

pub const MIN_ROWS: u64 = 100;
pub const MAX_ROWS: u64 = 1_000_000;
pub const MIN_COLS: u64 = 1;
pub const MAX_COLS: u64 = 100;

pub const DEFAULT_ROWS: u64 = 1000;
pub const DEFAULT_COLS: u64 = 10;

/// One request to materialize a dataset.
///
/// Both the in-process path and the container path consume the same value,
/// so the two enforce identical bounds and naming behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub rows: u64,
    pub cols: u64,
    /// Requested base name, without the file extension. Absent means a
    /// timestamp name is chosen at materialization time.
    pub name: Option<String>,
    /// Seed for reproducible output. Fresh entropy when absent.
    pub seed: Option<u64>,
    /// Replace an existing file of the same name.
    pub overwrite: bool,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        GenerationRequest {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            name: None,
            seed: None,
            overwrite: false,
        }
    }
}

impl GenerationRequest {
    pub fn new(rows: u64, cols: u64) -> Self {
        GenerationRequest {
            rows,
            cols,
            ..Default::default()
        }
    }

    /// The requested base name, with empty and whitespace-only values
    /// treated as absent.
    pub fn requested_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Bounds and name checks shared by every path. Runs before any side
    /// effect, in particular before a container is launched.
    pub fn validate(&self) -> Result<()> {
        if self.rows < MIN_ROWS || self.rows > MAX_ROWS {
            return Err(Error::InvalidRequest(format!(
                "rows must be between {} and {}, got {}",
                MIN_ROWS, MAX_ROWS, self.rows
            )));
        }
        if self.cols < MIN_COLS || self.cols > MAX_COLS {
            return Err(Error::InvalidRequest(format!(
                "cols must be between {} and {}, got {}",
                MIN_COLS, MAX_COLS, self.cols
            )));
        }
        if let Some(name) = self.requested_name() {
            names::validate_base_name(name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = GenerationRequest::default();
        assert_eq!(request.rows, 1000);
        assert_eq!(request.cols, 10);
        assert!(request.name.is_none());
        assert!(!request.overwrite);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(GenerationRequest::new(MIN_ROWS, MIN_COLS).validate().is_ok());
        assert!(GenerationRequest::new(MAX_ROWS, MAX_COLS).validate().is_ok());
    }

    #[test]
    fn test_out_of_bounds_dimensions_rejected() {
        for (rows, cols) in [(99, 10), (1_000_001, 10), (1000, 0), (1000, 101)] {
            let result = GenerationRequest::new(rows, cols).validate();
            assert!(
                matches!(result, Err(Error::InvalidRequest(_))),
                "expected InvalidRequest for rows={} cols={}",
                rows,
                cols
            );
        }
    }

    #[test]
    fn test_blank_name_counts_as_absent() {
        let mut request = GenerationRequest::default();
        request.name = Some("   ".to_string());
        assert!(request.requested_name().is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_path_escaping_name_rejected() {
        let mut request = GenerationRequest::default();
        request.name = Some("../escape".to_string());
        assert!(matches!(request.validate(), Err(Error::InvalidRequest(_))));
    }
}
