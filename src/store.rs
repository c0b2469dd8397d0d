use crate::model::{FileRecord, Finding};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Bump when the snapshot layout changes; older snapshots load as "no data".
pub const SNAPSHOT_VERSION: u32 = 1;

/// One analysis run: the findings payload and the files it was computed
/// from, persisted together so a reader can never observe half a result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    #[serde(default)]
    pub created_at: String,
    pub findings: Vec<Finding>,
    pub files: Vec<FileRecord>,
}

impl Snapshot {
    pub fn new(findings: Vec<Finding>, files: Vec<FileRecord>) -> Self {
        Snapshot {
            version: SNAPSHOT_VERSION,
            created_at: iso_now(),
            findings,
            files,
        }
    }
}

/// Session-lifetime storage for the last analysis result.
/// Holds exactly one snapshot; each save fully replaces the prior one.
pub struct ResultStore {
    path: PathBuf,
}

impl ResultStore {
    pub fn at(path: PathBuf) -> Self {
        ResultStore { path }
    }

    /// Default location under the user cache dir.
    pub fn default_location() -> Result<Self> {
        let dir = dirs::cache_dir()
            .context("could not determine cache directory")?
            .join("cxview");
        Ok(ResultStore::at(dir.join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist a snapshot atomically (write tmp, then rename).
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Load the stored snapshot. Missing file, malformed JSON, a missing
    /// field, or a version mismatch all mean "no results available" —
    /// never an error.
    pub fn load(&self) -> Option<Snapshot> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        let snapshot: Snapshot = match serde_json::from_str(&content) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Discarding malformed snapshot {}: {}", self.path.display(), e);
                return None;
            }
        };
        if snapshot.version != SNAPSHOT_VERSION {
            log::warn!(
                "Discarding snapshot with unsupported version {} (expected {})",
                snapshot.version,
                SNAPSHOT_VERSION
            );
            return None;
        }
        Some(snapshot)
    }

    /// Remove the stored snapshot, so stale results never leak into a
    /// fresh session. Missing file is fine.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// ISO-8601 UTC timestamp without pulling in a date crate.
pub(crate) fn iso_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let dur = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let secs = dur.as_secs();

    let days = secs / 86400;
    let remaining = secs % 86400;
    let hours = remaining / 3600;
    let minutes = (remaining % 3600) / 60;
    let seconds = remaining % 60;

    // Walk years from epoch, subtracting days per year (handles leap years via Gregorian rule)
    let mut y = 1970i64;
    let mut d = i64::try_from(days).unwrap_or(i64::MAX);
    loop {
        let days_in_year = if y % 4 == 0 && (y % 100 != 0 || y % 400 == 0) { 366 } else { 365 };
        if d < days_in_year {
            break;
        }
        d -= days_in_year;
        y += 1;
    }

    // Walk months within the year (m is 0-indexed, d ends as 0-indexed day-of-month)
    let leap = y % 4 == 0 && (y % 100 != 0 || y % 400 == 0);
    let month_days: [i64; 12] = [31, if leap { 29 } else { 28 }, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    let mut m = 0usize;
    for md in &month_days {
        if d < *md {
            break;
        }
        d -= *md;
        m += 1;
    }
    if m >= 12 {
        m = 11;
        d = 0;
    }

    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        y, m + 1, d + 1, hours, minutes, seconds
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> Snapshot {
        Snapshot::new(
            vec![Finding {
                complexity: 5.5,
                complexity_header: "Long parameter list".into(),
                complexity_reasoning: "Seven positional arguments.".into(),
                file_name: "main.py".into(),
                line_number: 10,
            }],
            vec![FileRecord {
                file_name: "main.py".into(),
                file_content: "def main():\n    pass\n".into(),
            }],
        )
    }

    fn store_in(dir: &tempfile::TempDir) -> ResultStore {
        ResultStore::at(dir.path().join("session.json"))
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let snapshot = sample_snapshot();
        store.save(&snapshot).unwrap();

        let loaded = store.load().expect("snapshot should load");
        assert_eq!(loaded.findings, snapshot.findings);
        assert_eq!(loaded.files, snapshot.files);
        assert_eq!(loaded.version, SNAPSHOT_VERSION);
    }

    #[test]
    fn load_without_save_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load().is_none());
    }

    #[test]
    fn malformed_json_is_empty_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{not json").unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn snapshot_missing_files_half_is_empty() {
        // A record with findings but no files must never load as a
        // partial pair.
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(
            store.path(),
            r#"{"version":1,"created_at":"","findings":[]}"#,
        )
        .unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn version_mismatch_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(
            store.path(),
            r#"{"version":99,"created_at":"","findings":[],"files":[]}"#,
        )
        .unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn version_mismatch_discards_populated_snapshot() {
        // Data under an unsupported layout is dropped wholesale, never
        // salvaged field by field.
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let mut snapshot = sample_snapshot();
        snapshot.version = SNAPSHOT_VERSION + 1;
        store.save(&snapshot).unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn clear_removes_snapshot_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&sample_snapshot()).unwrap();
        store.clear().unwrap();
        assert!(store.load().is_none());
        // Clearing again is not an error
        store.clear().unwrap();
    }

    #[test]
    fn save_replaces_prior_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&sample_snapshot()).unwrap();

        let replacement = Snapshot::new(Vec::new(), Vec::new());
        store.save(&replacement).unwrap();
        let loaded = store.load().unwrap();
        assert!(loaded.findings.is_empty());
        assert!(loaded.files.is_empty());
    }
}
