//! Runtime configuration, resolved once at startup and passed down
//! explicitly. No process-wide globals.

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming the storage root directory.
pub const STORAGE_ENV: &str = "HATCH_STORAGE";
/// Environment variable naming the generation container image.
pub const IMAGE_ENV: &str = "HATCH_IMAGE";
/// Environment variable naming the volume bound into generation containers.
pub const VOLUME_ENV: &str = "HATCH_VOLUME";

const DEFAULT_STORAGE: &str = "/data";
const DEFAULT_IMAGE: &str = "hatchery";
const DEFAULT_MOUNT: &str = "/data";

/// Everything the catalog and the job runner need to know about their
/// surroundings.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the dataset files.
    pub storage_root: PathBuf,
    /// Image run for isolated generation jobs.
    pub image: String,
    /// Volume name or host path bound into generation containers. Defaults
    /// to the storage root itself, so host runs and container runs see the
    /// same files.
    pub volume: String,
    /// Where the volume appears inside the container.
    pub mount_point: String,
}

impl Config {
    /// Configuration rooted at an explicit storage directory, defaults
    /// everywhere else.
    pub fn new<P: AsRef<Path>>(storage_root: P) -> Self {
        let storage_root = storage_root.as_ref().to_path_buf();
        let volume = storage_root.to_string_lossy().to_string();
        Config {
            storage_root,
            image: DEFAULT_IMAGE.to_string(),
            volume,
            mount_point: DEFAULT_MOUNT.to_string(),
        }
    }

    /// Environment-backed configuration with an optional storage override
    /// (a CLI flag wins over HATCH_STORAGE).
    pub fn resolve(storage_override: Option<PathBuf>) -> Self {
        let storage_root = storage_override
            .or_else(|| env::var(STORAGE_ENV).ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE));

        let mut config = Config::new(storage_root);
        if let Ok(image) = env::var(IMAGE_ENV) {
            config.image = image;
        }
        if let Ok(volume) = env::var(VOLUME_ENV) {
            config.volume = volume;
        }
        config
    }
}
