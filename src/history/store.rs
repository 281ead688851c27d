use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use std::fs::File;
use std::path::{Path, PathBuf};

use super::types::Snapshot;

const SNAPSHOT_PREFIX: &str = "okr_snapshot_";
const SNAPSHOT_SUFFIX: &str = ".json";
/// Second-resolution, lexicographically sortable. Two saves within the same
/// second overwrite each other; last write wins.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Append-only snapshot storage: one JSON file per snapshot, timestamp
/// embedded in the filename so lexicographic filename order equals
/// chronological order.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create history directory at {}", dir.display()))?;
        Ok(Self { dir })
    }

    /// Persist a snapshot atomically (write-then-rename). Returns the path
    /// the snapshot was written to.
    pub fn save(&self, snapshot: &Snapshot) -> Result<PathBuf> {
        let filename = format!(
            "{}{}{}",
            SNAPSHOT_PREFIX,
            snapshot.timestamp.format(TIMESTAMP_FORMAT),
            SNAPSHOT_SUFFIX
        );
        let path = self.dir.join(filename);

        let mut file = AtomicWriteFile::open(&path)
            .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
        serde_json::to_writer_pretty(&mut file, snapshot).context("Failed to serialize snapshot")?;
        file.commit()
            .with_context(|| format!("Failed to save snapshot at {}", path.display()))?;

        Ok(path)
    }

    /// The most recent snapshot, or None for an empty store.
    pub fn latest(&self) -> Result<Option<Snapshot>> {
        match self.snapshot_files()?.last() {
            Some(path) => Ok(Some(load_snapshot(path)?)),
            None => Ok(None),
        }
    }

    /// The snapshot nearest in absolute time to `now - days_back` days.
    /// Nearest-neighbor matching, not "exactly N days ago": with history at
    /// day 0 and day 10, `nearest(7)` returns the day-10 snapshot.
    pub fn nearest(&self, days_back: i64) -> Result<Option<Snapshot>> {
        let target = Utc::now() - Duration::days(days_back);

        let mut best: Option<(i64, PathBuf)> = None;
        for path in self.snapshot_files()? {
            // Filename timestamps are second-resolution, which is all the
            // nearest-neighbor match needs; only the winner gets loaded.
            let Some(stamp) = timestamp_from_filename(&path) else {
                continue;
            };
            let diff = (stamp - target).num_seconds().abs();
            if best.as_ref().is_none_or(|(best_diff, _)| diff < *best_diff) {
                best = Some((diff, path));
            }
        }
        match best {
            Some((_, path)) => Ok(Some(load_snapshot(&path)?)),
            None => Ok(None),
        }
    }

    /// Snapshots within an inclusive time range, in chronological order.
    pub fn range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Snapshot>> {
        let mut snapshots = Vec::new();
        for path in self.snapshot_files()? {
            let snapshot = load_snapshot(&path)?;
            if snapshot.timestamp >= start && snapshot.timestamp <= end {
                snapshots.push(snapshot);
            }
        }
        Ok(snapshots)
    }

    /// The full history in chronological order.
    pub fn all(&self) -> Result<Vec<Snapshot>> {
        self.snapshot_files()?.iter().map(|p| load_snapshot(p)).collect()
    }

    pub fn count(&self) -> Result<usize> {
        Ok(self.snapshot_files()?.len())
    }

    /// Snapshot file paths sorted by filename; the embedded timestamp makes
    /// that chronological order.
    fn snapshot_files(&self) -> Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read history directory at {}", self.dir.display()))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with(SNAPSHOT_PREFIX) && name.ends_with(SNAPSHOT_SUFFIX) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Parse the timestamp embedded in a snapshot filename.
pub fn timestamp_from_filename(path: &Path) -> Option<DateTime<Utc>> {
    let name = path.file_name()?.to_str()?;
    let stamp = name
        .strip_prefix(SNAPSHOT_PREFIX)?
        .strip_suffix(SNAPSHOT_SUFFIX)?;
    NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open snapshot at {}", path.display()))?;
    serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse snapshot at {}", path.display()))
}
