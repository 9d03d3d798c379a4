//! File naming rules for the storage root.

use chrono::{DateTime, Local};

use crate::error::{Error, Result};

/// Extension every catalog file carries.
pub const EXTENSION: &str = ".parquet";

/// Decide the filename a request materializes to.
///
/// An explicit base name maps to `<base>.parquet`. Without one the local
/// clock names the file `data_YYYYMMDD_HHMMSS.parquet`. Timestamp names
/// have second resolution, so two unnamed requests within the same second
/// resolve to the same file and the later write wins.
pub fn resolve_name(requested: Option<&str>) -> Result<String> {
    resolve_name_at(requested, Local::now())
}

/// Clock-explicit variant of [`resolve_name`].
pub fn resolve_name_at(requested: Option<&str>, now: DateTime<Local>) -> Result<String> {
    match requested.map(str::trim).filter(|base| !base.is_empty()) {
        Some(base) => {
            validate_base_name(base)?;
            Ok(format!("{}{}", base, EXTENSION))
        }
        None => Ok(format!("data_{}{}", now.format("%Y%m%d_%H%M%S"), EXTENSION)),
    }
}

/// Reject base names that would escape the storage root or hide the file.
pub fn validate_base_name(base: &str) -> Result<()> {
    if base.contains('/') || base.contains('\\') || base.contains("..") || base.starts_with('.') {
        return Err(Error::InvalidRequest(format!(
            "invalid dataset name: {}",
            base
        )));
    }
    Ok(())
}

/// [`validate_base_name`] for caller-supplied names that may already carry
/// the extension. Catalog operations apply this so a name can only point
/// inside the storage root.
pub fn validate_lookup_name(name: &str) -> Result<()> {
    let base = base_name(name);
    if base.is_empty() {
        return Err(Error::InvalidRequest("empty dataset name".to_string()));
    }
    validate_base_name(base)
}

/// Append the extension unless the caller already supplied it.
pub fn qualify(name: &str) -> String {
    if name.ends_with(EXTENSION) {
        name.to_string()
    } else {
        format!("{}{}", name, EXTENSION)
    }
}

/// Base name of a qualified filename.
pub fn base_name(qualified: &str) -> &str {
    qualified.strip_suffix(EXTENSION).unwrap_or(qualified)
}
