//! The dataset catalog over a single storage directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use arrow_array::RecordBatch;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::names;
use crate::parquet;

/// One materialized dataset file. Metadata is read live from the
/// filesystem at lookup time, never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetEntry {
    /// Qualified filename, extension included.
    pub name: String,
    pub size_bytes: u64,
    /// Modification time, microseconds since the Unix epoch.
    pub modified: i64,
}

/// Catalog over a storage root.
///
/// The directory is the single source of truth. Every operation inspects
/// it at call time, so concurrent writers are visible the moment their
/// rename lands and no state survives between calls. Caller-supplied names
/// pass the same checks the generation path enforces, so no operation can
/// touch a file outside the root.
pub struct Catalog {
    root: PathBuf,
}

impl Catalog {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Catalog {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Absolute path of a qualified name inside the storage root.
    pub fn path_of(&self, qualified: &str) -> PathBuf {
        self.root.join(qualified)
    }

    /// Create the storage root if it does not exist yet.
    pub fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Fail with a conflict when `qualified` already exists and overwriting
    /// was not requested. The check is advisory: nothing stops another
    /// writer from creating the file between this call and a later write,
    /// in which case the later rename wins.
    pub fn check_available(&self, qualified: &str, overwrite: bool) -> Result<()> {
        names::validate_lookup_name(qualified)?;
        if !overwrite && self.path_of(qualified).exists() {
            return Err(Error::Conflict(qualified.to_string()));
        }
        Ok(())
    }

    /// All dataset files, most recently modified first. Entries with equal
    /// timestamps keep their enumeration order. A missing storage root is
    /// created and yields the empty list.
    pub fn list(&self) -> Result<Vec<DatasetEntry>> {
        self.ensure_root()?;

        let mut entries = Vec::new();
        for dirent in fs::read_dir(&self.root)? {
            let dirent = dirent?;
            let name = dirent.file_name().to_string_lossy().to_string();
            if !name.ends_with(names::EXTENSION) {
                continue;
            }
            let metadata = dirent.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            entries.push(DatasetEntry {
                name,
                size_bytes: metadata.len(),
                modified: modified_micros(&metadata)?,
            });
        }

        // Stable sort: ties stay in enumeration order.
        entries.sort_by_key(|entry| std::cmp::Reverse(entry.modified));

        diagnostics::log_debug!("listed {count} dataset(s)", count: entries.len());
        Ok(entries)
    }

    /// Live metadata for one dataset. The extension is appended when the
    /// caller omitted it.
    pub fn stat(&self, name: &str) -> Result<DatasetEntry> {
        names::validate_lookup_name(name)?;
        let qualified = names::qualify(name);
        let metadata = fs::metadata(self.path_of(&qualified))
            .map_err(|e| not_found_or_io(e, &qualified))?;
        Ok(DatasetEntry {
            name: qualified,
            size_bytes: metadata.len(),
            modified: modified_micros(&metadata)?,
        })
    }

    /// Remove a dataset. Returns the qualified name that was unlinked.
    pub fn delete(&self, name: &str) -> Result<String> {
        names::validate_lookup_name(name)?;
        let qualified = names::qualify(name);
        fs::remove_file(self.path_of(&qualified)).map_err(|e| not_found_or_io(e, &qualified))?;
        diagnostics::log_info!("deleted {name}", name: qualified.as_str());
        Ok(qualified)
    }

    /// Decode a dataset into memory. Decode failures propagate unchanged;
    /// only a missing file maps to [`Error::NotFound`].
    pub fn load(&self, name: &str) -> Result<RecordBatch> {
        names::validate_lookup_name(name)?;
        let qualified = names::qualify(name);
        parquet::read_table(&self.path_of(&qualified)).map_err(|err| match err {
            Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound => Error::NotFound(qualified),
            other => other,
        })
    }
}

fn modified_micros(metadata: &fs::Metadata) -> Result<i64> {
    let modified = metadata.modified()?;
    let micros = match modified.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_micros() as i64,
        Err(_) => 0, // mtime before the epoch
    };
    Ok(micros)
}

fn not_found_or_io(err: std::io::Error, qualified: &str) -> Error {
    if err.kind() == std::io::ErrorKind::NotFound {
        Error::NotFound(qualified.to_string())
    } else {
        Error::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::generate_table;
    use crate::request::GenerationRequest;
    use std::fs::{FileTimes, OpenOptions};
    use std::time::{Duration, SystemTime};
    use tempfile::tempdir;

    fn write_dataset(catalog: &Catalog, qualified: &str) -> Result<()> {
        catalog.ensure_root()?;
        let batch = generate_table(&GenerationRequest::new(100, 2))?;
        parquet::write_table(&catalog.path_of(qualified), &batch)
    }

    fn set_modified(catalog: &Catalog, qualified: &str, unix_secs: u64) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .open(catalog.path_of(qualified))?;
        let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(unix_secs);
        file.set_times(FileTimes::new().set_modified(mtime))?;
        Ok(())
    }

    #[test]
    fn test_list_creates_missing_root_and_returns_empty() -> Result<()> {
        let tmp = tempdir()?;
        let root = tmp.path().join("not_there_yet");
        let catalog = Catalog::new(&root);

        let entries = catalog.list()?;
        assert!(entries.is_empty());
        assert!(root.is_dir());
        Ok(())
    }

    #[test]
    fn test_list_sorts_newest_first() -> Result<()> {
        let tmp = tempdir()?;
        let catalog = Catalog::new(tmp.path());

        write_dataset(&catalog, "oldest.parquet")?;
        write_dataset(&catalog, "newest.parquet")?;
        write_dataset(&catalog, "middle.parquet")?;
        set_modified(&catalog, "oldest.parquet", 1_000_000)?;
        set_modified(&catalog, "middle.parquet", 2_000_000)?;
        set_modified(&catalog, "newest.parquet", 3_000_000)?;

        let names: Vec<String> = catalog.list()?.into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["newest.parquet", "middle.parquet", "oldest.parquet"]);
        Ok(())
    }

    #[test]
    fn test_list_ignores_foreign_files() -> Result<()> {
        let tmp = tempdir()?;
        let catalog = Catalog::new(tmp.path());

        write_dataset(&catalog, "real.parquet")?;
        std::fs::write(tmp.path().join("notes.txt"), "not a dataset")?;
        std::fs::create_dir(tmp.path().join("subdir.parquet"))?;

        let entries = catalog.list()?;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "real.parquet");
        assert!(entries[0].size_bytes > 0);
        Ok(())
    }

    #[test]
    fn test_check_available_conflicts_then_clears_after_delete() -> Result<()> {
        let tmp = tempdir()?;
        let catalog = Catalog::new(tmp.path());

        write_dataset(&catalog, "taken.parquet")?;
        assert!(matches!(
            catalog.check_available("taken.parquet", false),
            Err(Error::Conflict(_))
        ));
        assert!(catalog.check_available("taken.parquet", true).is_ok());
        assert!(catalog.check_available("free.parquet", false).is_ok());

        catalog.delete("taken")?;
        assert!(catalog.check_available("taken.parquet", false).is_ok());
        Ok(())
    }

    #[test]
    fn test_delete_appends_extension_and_reports_missing() -> Result<()> {
        let tmp = tempdir()?;
        let catalog = Catalog::new(tmp.path());

        write_dataset(&catalog, "demo.parquet")?;
        assert_eq!(catalog.delete("demo")?, "demo.parquet");

        let result = catalog.delete("demo");
        assert!(matches!(result, Err(Error::NotFound(name)) if name == "demo.parquet"));
        Ok(())
    }

    #[test]
    fn test_stat_reads_live_metadata() -> Result<()> {
        let tmp = tempdir()?;
        let catalog = Catalog::new(tmp.path());

        write_dataset(&catalog, "stat_me.parquet")?;
        set_modified(&catalog, "stat_me.parquet", 5_000_000)?;

        let entry = catalog.stat("stat_me")?;
        assert_eq!(entry.name, "stat_me.parquet");
        assert!(entry.size_bytes > 0);
        assert_eq!(entry.modified, 5_000_000 * 1_000_000);
        Ok(())
    }

    #[test]
    fn test_lookups_cannot_escape_the_root() -> Result<()> {
        let tmp = tempdir()?;
        let root = tmp.path().join("store");
        let catalog = Catalog::new(&root);
        catalog.ensure_root()?;

        // A sibling of the storage root must be unreachable by name.
        let victim = tmp.path().join("victim.parquet");
        std::fs::write(&victim, b"keep me")?;
        let absolute = victim.to_string_lossy().to_string();

        for name in ["../victim", "../victim.parquet", absolute.as_str(), ".hidden"] {
            assert!(
                matches!(catalog.delete(name), Err(Error::InvalidRequest(_))),
                "expected rejection for {:?}",
                name
            );
        }
        assert!(victim.exists(), "hostile delete must not reach outside the root");

        assert!(matches!(
            catalog.load("../victim"),
            Err(Error::InvalidRequest(_))
        ));
        assert!(matches!(
            catalog.stat("../victim"),
            Err(Error::InvalidRequest(_))
        ));
        Ok(())
    }

    #[test]
    fn test_load_missing_is_not_found_but_corrupt_is_codec_error() -> Result<()> {
        let tmp = tempdir()?;
        let catalog = Catalog::new(tmp.path());
        catalog.ensure_root()?;

        assert!(matches!(catalog.load("absent"), Err(Error::NotFound(_))));

        std::fs::write(catalog.path_of("corrupt.parquet"), b"junk")?;
        assert!(matches!(catalog.load("corrupt"), Err(Error::Parquet(_))));
        Ok(())
    }
}
