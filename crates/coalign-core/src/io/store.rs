use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::consts::{LEVEL0_SUFFIX, LEVEL1_SUFFIX, WCS_MATCH_SUFFIX};
use crate::error::{CoalignError, Result};
use crate::record::{AlignmentRecord, MatchedAlignmentRecord, RecordLevel, WcsMatch};

/// Named, structured storage of alignment records.
///
/// Records of a run share a base name. A level-1 save merges the upstream WCS
/// match stored under the same base name and removes it.
pub trait TrajectoryStore {
    /// Persist `record` at `level`, returning where it was written.
    fn save(&self, base: &str, record: &AlignmentRecord, level: RecordLevel) -> Result<PathBuf>;

    fn load(&self, base: &str) -> Result<AlignmentRecord>;

    fn load_matched(&self, base: &str) -> Result<MatchedAlignmentRecord>;

    /// Persist an upstream WCS match for a later level-1 save.
    fn save_wcs_match(&self, base: &str, wcs: &WcsMatch) -> Result<PathBuf>;
}

/// Pretty-printed JSON files in one directory: `<base>_align_lev0.json`,
/// `<base>_align_lev1.json` and `<base>_match_wcs.json`.
#[derive(Clone, Debug)]
pub struct JsonTrajectoryStore {
    dir: PathBuf,
}

impl JsonTrajectoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, base: &str, suffix: &str) -> PathBuf {
        self.dir.join(format!("{base}{suffix}.json"))
    }

    fn write<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(path, serde_json::to_string_pretty(value)?)?;
        Ok(())
    }

    fn read<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        if !path.exists() {
            return Err(CoalignError::MissingRecord(path.display().to_string()));
        }
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

impl TrajectoryStore for JsonTrajectoryStore {
    fn save(&self, base: &str, record: &AlignmentRecord, level: RecordLevel) -> Result<PathBuf> {
        let path = match level {
            RecordLevel::Level0 => {
                let path = self.path_for(base, LEVEL0_SUFFIX);
                self.write(&path, record)?;
                path
            }
            RecordLevel::Level1 => {
                let match_path = self.path_for(base, WCS_MATCH_SUFFIX);
                let wcs: WcsMatch = self.read(&match_path)?;
                let path = self.path_for(base, LEVEL1_SUFFIX);
                self.write(&path, &MatchedAlignmentRecord::new(record.clone(), wcs))?;
                fs::remove_file(&match_path)?;
                info!(path = %match_path.display(), "Removed superseded WCS match record");
                path
            }
        };

        info!(path = %path.display(), %level, "Alignment record saved");
        Ok(path)
    }

    fn load(&self, base: &str) -> Result<AlignmentRecord> {
        self.read(&self.path_for(base, LEVEL0_SUFFIX))
    }

    fn load_matched(&self, base: &str) -> Result<MatchedAlignmentRecord> {
        self.read(&self.path_for(base, LEVEL1_SUFFIX))
    }

    fn save_wcs_match(&self, base: &str, wcs: &WcsMatch) -> Result<PathBuf> {
        let path = self.path_for(base, WCS_MATCH_SUFFIX);
        self.write(&path, wcs)?;
        Ok(path)
    }
}
