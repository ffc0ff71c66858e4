//! JSON manifest read by the app's update checker.
//!
//! The manifest is written only after the store exists, since it records the
//! finished file's byte size.

use std::fmt::Display;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, TimeZone};
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Format of [`Manifest::last_updated`].
pub const LAST_UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One published artefact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDescriptor {
    /// Region identifier, such as `nl`.
    pub id: String,
    /// Artefact file name relative to the manifest.
    pub file: String,
    /// Rows in the artefact.
    pub count: u64,
    /// Artefact size on disk.
    pub size_bytes: u64,
}

/// Manifest document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Human-readable generation time.
    pub last_updated: String,
    /// Generation time as Unix epoch seconds.
    pub timestamp: i64,
    /// Published artefacts.
    pub regions: Vec<RegionDescriptor>,
}

/// Where the manifest goes and what it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestTarget {
    /// Path of the manifest file.
    pub manifest_path: Utf8PathBuf,
    /// Path of the finished store.
    pub store_path: Utf8PathBuf,
    /// Region identifier recorded in the descriptor.
    pub region_id: String,
}

/// Errors raised while writing the manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The store was not on disk when the manifest was written.
    #[error("store artefact {path:?} is missing; the manifest must follow a completed build")]
    MissingArtefact {
        /// Expected store path.
        path: Utf8PathBuf,
    },
    /// Reading the store's metadata failed.
    #[error("failed to inspect store artefact {path:?}")]
    Inspect {
        /// Store path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Encoding the manifest failed.
    #[error("failed to serialise manifest")]
    Serialise {
        /// Source error produced by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// Writing the manifest file failed.
    #[error("failed to write manifest {path:?}")]
    Write {
        /// Manifest path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl Manifest {
    /// Describe a single artefact generated at `generated_at`.
    #[must_use]
    pub fn single_region<Tz>(region: RegionDescriptor, generated_at: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            last_updated: generated_at.format(LAST_UPDATED_FORMAT).to_string(),
            timestamp: generated_at.timestamp(),
            regions: vec![region],
        }
    }
}

/// Describe the finished store at `target.store_path` and write the manifest.
///
/// # Errors
/// Returns [`ManifestError::MissingArtefact`] when the store is absent, and
/// the other variants on I/O or encoding failures.
///
/// # Examples
/// ```
/// use camino::Utf8PathBuf;
/// use chrono::{TimeZone, Utc};
/// use silent_data::{ManifestError, ManifestTarget, write_manifest};
///
/// let dir = tempfile::tempdir().expect("temp dir");
/// let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8");
/// let target = ManifestTarget {
///     manifest_path: root.join("version.json"),
///     store_path: root.join("silent_locations.db"),
///     region_id: "nl".into(),
/// };
/// let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("valid instant");
/// let err = write_manifest(&target, 0, &at).expect_err("store was never built");
/// assert!(matches!(err, ManifestError::MissingArtefact { .. }));
/// ```
pub fn write_manifest<Tz>(
    target: &ManifestTarget,
    count: u64,
    generated_at: &DateTime<Tz>,
) -> Result<Manifest, ManifestError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let store_path = target.store_path.as_path();
    let size_bytes = store_size(store_path)?;
    let file = store_path
        .file_name()
        .ok_or_else(|| ManifestError::MissingArtefact {
            path: store_path.to_path_buf(),
        })?
        .to_owned();

    let manifest = Manifest::single_region(
        RegionDescriptor {
            id: target.region_id.clone(),
            file,
            count,
            size_bytes,
        },
        generated_at,
    );

    let mut json = serde_json::to_string_pretty(&manifest)
        .map_err(|source| ManifestError::Serialise { source })?;
    json.push('\n');
    silent_fs::write_file(&target.manifest_path, json.as_bytes()).map_err(|source| {
        ManifestError::Write {
            path: target.manifest_path.clone(),
            source,
        }
    })?;

    info!(
        "Wrote manifest {} ({count} rows, {size_bytes} bytes)",
        target.manifest_path
    );
    Ok(manifest)
}

fn store_size(path: &Utf8Path) -> Result<u64, ManifestError> {
    silent_fs::file_size(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ManifestError::MissingArtefact {
                path: path.to_path_buf(),
            }
        } else {
            ManifestError::Inspect {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("create temp dir")
    }

    fn target(dir: &TempDir) -> ManifestTarget {
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp path");
        ManifestTarget {
            manifest_path: root.join("version.json"),
            store_path: root.join("silent_locations.db"),
            region_id: "nl".to_owned(),
        }
    }

    #[rstest]
    fn records_store_size_and_count(temp_dir: TempDir) {
        let target = target(&temp_dir);
        silent_fs::write_file(&target.store_path, &[0_u8; 4096]).expect("write store");
        let at = Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 30, 5)
            .single()
            .expect("valid instant");

        let manifest = write_manifest(&target, 42, &at).expect("write manifest");

        assert_eq!(manifest.last_updated, "2024-05-01 12:30:05");
        assert_eq!(manifest.timestamp, 1_714_566_605);
        assert_eq!(
            manifest.regions,
            [RegionDescriptor {
                id: "nl".into(),
                file: "silent_locations.db".into(),
                count: 42,
                size_bytes: 4096,
            }]
        );

        let written = std::fs::read_to_string(&target.manifest_path).expect("read manifest");
        let decoded: Manifest = serde_json::from_str(&written).expect("decode manifest");
        assert_eq!(decoded, manifest);
        assert!(written.contains("\n  \"last_updated\": \"2024-05-01 12:30:05\","));
    }

    #[rstest]
    fn formats_local_wall_clock_time(temp_dir: TempDir) {
        let target = target(&temp_dir);
        silent_fs::write_file(&target.store_path, b"db").expect("write store");
        let amsterdam = FixedOffset::east_opt(2 * 3600).expect("valid offset");
        let at = amsterdam
            .with_ymd_and_hms(2024, 5, 1, 14, 30, 5)
            .single()
            .expect("valid instant");

        let manifest = write_manifest(&target, 1, &at).expect("write manifest");

        assert_eq!(manifest.last_updated, "2024-05-01 14:30:05");
        assert_eq!(manifest.timestamp, 1_714_566_605);
    }

    #[rstest]
    fn missing_store_is_reported(temp_dir: TempDir) {
        let target = target(&temp_dir);
        let at = Utc::now();
        let err = write_manifest(&target, 0, &at).expect_err("store missing");
        assert!(matches!(err, ManifestError::MissingArtefact { .. }));
        assert!(!target.manifest_path.exists());
    }
}
