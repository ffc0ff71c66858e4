//! End-to-end dataset build: fetch, normalise, store, manifest.
//!
//! Stages run strictly in order and each one runs exactly once; there is no
//! retry or partial resume. Any stage error aborts the run.

use std::fmt::Display;

use camino::Utf8PathBuf;
use chrono::{DateTime, Local, TimeZone};
use log::info;
use silent_core::{Classifier, NameFilter};
use thiserror::Error;

use crate::manifest::{ManifestError, ManifestTarget, write_manifest};
use crate::normalise::normalise_elements;
use crate::overpass::{ElementSource, FetchConfig, FetchError, OverpassQuery};
use crate::store::{DuplicateIdentifier, SchemaRevision, StoreBuildError, build_store};

/// Default directory receiving the artefacts.
pub const DEFAULT_OUTPUT_DIR: &str = "public";
/// Default store file name; the app looks the file up by this name.
pub const DEFAULT_DATABASE_FILE: &str = "silent_locations.db";
/// Default manifest file name.
pub const DEFAULT_MANIFEST_FILE: &str = "version.json";
/// Default region identifier.
pub const DEFAULT_REGION_ID: &str = "nl";

/// Everything a dataset build needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Upstream query.
    pub query: OverpassQuery,
    /// HTTP settings for the fetcher.
    pub fetch: FetchConfig,
    /// Directory receiving the store and the manifest.
    pub output_dir: Utf8PathBuf,
    /// Store file name inside `output_dir`.
    pub database_file: String,
    /// Manifest file name inside `output_dir`.
    pub manifest_file: String,
    /// Region identifier written to the manifest.
    pub region_id: String,
    /// Table layout to write.
    pub schema: SchemaRevision,
    /// Tag-to-category rules.
    pub classifier: Classifier,
    /// Name denylist.
    pub name_filter: NameFilter,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let query = OverpassQuery::netherlands();
        Self {
            fetch: FetchConfig::for_query(&query),
            query,
            output_dir: Utf8PathBuf::from(DEFAULT_OUTPUT_DIR),
            database_file: DEFAULT_DATABASE_FILE.to_owned(),
            manifest_file: DEFAULT_MANIFEST_FILE.to_owned(),
            region_id: DEFAULT_REGION_ID.to_owned(),
            schema: SchemaRevision::default(),
            classifier: Classifier::standard(),
            name_filter: NameFilter::default(),
        }
    }
}

impl PipelineConfig {
    /// Default configuration writing into `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Path of the store artefact.
    #[must_use]
    pub fn store_path(&self) -> Utf8PathBuf {
        self.output_dir.join(&self.database_file)
    }

    /// Path of the manifest.
    #[must_use]
    pub fn manifest_path(&self) -> Utf8PathBuf {
        self.output_dir.join(&self.manifest_file)
    }

    fn manifest_target(&self) -> ManifestTarget {
        ManifestTarget {
            manifest_path: self.manifest_path(),
            store_path: self.store_path(),
            region_id: self.region_id.clone(),
        }
    }
}

/// Summary of a completed build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Elements returned by the source.
    pub fetched: u64,
    /// Rows written to the store.
    pub accepted: u64,
    /// Elements dropped by the name denylist.
    pub excluded_by_name: u64,
    /// Elements dropped for lack of coordinates.
    pub dropped_without_position: u64,
    /// Rows skipped on identifier collisions.
    pub duplicates: Vec<DuplicateIdentifier>,
    /// Store path.
    pub store_path: Utf8PathBuf,
    /// Store size on disk.
    pub size_bytes: u64,
    /// Manifest path.
    pub manifest_path: Utf8PathBuf,
}

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Fetching elements failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// The source returned no elements; existing artefacts are left untouched.
    #[error("the query returned no elements; keeping the existing artefacts")]
    NoElements,
    /// Rebuilding the store failed.
    #[error(transparent)]
    Store(#[from] StoreBuildError),
    /// Writing the manifest failed.
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Run the full build, stamping the manifest with the current local time.
///
/// # Errors
/// See [`PipelineError`].
pub fn run_pipeline(
    config: &PipelineConfig,
    source: &dyn ElementSource,
) -> Result<PipelineReport, PipelineError> {
    run_pipeline_at(config, source, &Local::now())
}

/// Run the full build with an explicit manifest timestamp.
///
/// # Errors
/// See [`PipelineError`].
///
/// # Examples
/// ```
/// use camino::Utf8PathBuf;
/// use chrono::{TimeZone, Utc};
/// use silent_data::overpass::test_support::StubElementSource;
/// use silent_data::{PipelineConfig, run_pipeline_at};
///
/// let dir = tempfile::tempdir().expect("temp dir");
/// let config = PipelineConfig::new(
///     Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8"),
/// );
/// let source = StubElementSource::from_json(
///     r#"{"elements":[{"type":"node","id":1,"lat":52.0,"lon":5.0,"tags":{"name":"Domkerk"}}]}"#,
/// )
/// .expect("fixture");
/// let at = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).single().expect("instant");
///
/// let report = run_pipeline_at(&config, &source, &at).expect("pipeline succeeds");
/// assert_eq!(report.accepted, 1);
/// ```
pub fn run_pipeline_at<Tz>(
    config: &PipelineConfig,
    source: &dyn ElementSource,
    generated_at: &DateTime<Tz>,
) -> Result<PipelineReport, PipelineError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let elements = source.fetch_elements(&config.query)?;
    if elements.is_empty() {
        return Err(PipelineError::NoElements);
    }
    let fetched = elements.len() as u64;

    let batch = normalise_elements(&elements, &config.classifier, &config.name_filter);
    let store = build_store(&config.store_path(), &batch, config.schema)?;
    let manifest = write_manifest(&config.manifest_target(), store.accepted, generated_at)?;
    let size_bytes = manifest
        .regions
        .first()
        .map_or(0, |region| region.size_bytes);

    info!(
        "Build complete: {} accepted, {} excluded by name, {} duplicates skipped",
        store.accepted,
        store.excluded_by_name,
        store.duplicates.len()
    );
    Ok(PipelineReport {
        fetched,
        accepted: store.accepted,
        excluded_by_name: store.excluded_by_name,
        dropped_without_position: batch.dropped_without_position,
        duplicates: store.duplicates,
        store_path: store.path,
        size_bytes,
        manifest_path: config.manifest_path(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overpass::test_support::StubElementSource;
    use rstest::rstest;

    #[rstest]
    fn default_paths_live_under_public() {
        let config = PipelineConfig::default();
        assert_eq!(config.store_path(), "public/silent_locations.db");
        assert_eq!(config.manifest_path(), "public/version.json");
        assert_eq!(config.region_id, "nl");
        assert_eq!(config.schema, SchemaRevision::Current);
    }

    #[rstest]
    fn fetch_errors_abort_before_touching_artefacts() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8");
        let config = PipelineConfig::new(root);
        let source = StubElementSource::with_error(FetchError::RateLimited {
            url: "http://localhost".into(),
            retry_after: None,
        });

        let err = run_pipeline(&config, &source).expect_err("rate limited");

        assert!(matches!(
            err,
            PipelineError::Fetch(FetchError::RateLimited { .. })
        ));
        assert!(!config.store_path().exists());
        assert!(!config.manifest_path().exists());
    }

    #[rstest]
    fn empty_results_keep_previous_artefacts() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8");
        let config = PipelineConfig::new(root);
        silent_fs::write_file(&config.store_path(), b"previous").expect("seed store");

        let err = run_pipeline(&config, &StubElementSource::with_elements(Vec::new()))
            .expect_err("empty result");

        assert!(matches!(err, PipelineError::NoElements));
        assert_eq!(
            silent_fs::file_size(&config.store_path()).expect("store kept"),
            8
        );
    }

    #[rstest]
    fn source_receives_configured_query() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8");
        let mut config = PipelineConfig::new(root);
        config.query = config.query.with_timeout_secs(25);
        let source = StubElementSource::with_elements(Vec::new());

        let _ = run_pipeline(&config, &source);

        assert_eq!(source.queries(), [config.query.render()]);
    }
}
