//! Build command implementation for the `silent-locations` CLI.

use std::fmt::{self, Display};
use std::io::Write;
use std::str::FromStr;

use camino::Utf8PathBuf;
use clap::Parser;
use geo::{Coord, Rect};
use log::{LevelFilter, info};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use silent_core::Classifier;
use silent_data::overpass::{DEFAULT_ADMIN_LEVEL, DEFAULT_AREA_NAME};
use silent_data::{
    DEFAULT_OUTPUT_DIR, ElementSource, FetchConfig, OverpassFetcher, OverpassQuery,
    PipelineConfig, PipelineReport, QueryScope, SchemaRevision, run_pipeline,
};

use crate::logging::init_logging;
use crate::{
    ARG_ADMIN_LEVEL, ARG_AREA_NAME, ARG_BBOX, ARG_DATABASE_FILE, ARG_ENDPOINT, ARG_LOG_LEVEL,
    ARG_MANIFEST_FILE, ARG_OUTPUT_DIR, ARG_REFERER, ARG_REGION_ID, ARG_SCHEMA, ARG_TAXONOMY,
    ARG_TIMEOUT_SECS, ARG_USER_AGENT, CliError,
};

/// CLI arguments for the `build` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Query Overpass for quiet venues, rebuild the SQLite store \
                 from scratch and write the version manifest next to it. \
                 Options can come from CLI flags, configuration files, or \
                 SILENT_CMDS_BUILD_* environment variables.",
    about = "Rebuild the location store and manifest"
)]
#[ortho_config(prefix = "SILENT")]
pub(crate) struct BuildArgs {
    /// Directory receiving the store and the manifest (default `public`).
    #[arg(long = ARG_OUTPUT_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) output_dir: Option<Utf8PathBuf>,
    /// Store file name (default `silent_locations.db`).
    #[arg(long = ARG_DATABASE_FILE, value_name = "name")]
    #[serde(default)]
    pub(crate) database_file: Option<String>,
    /// Manifest file name (default `version.json`).
    #[arg(long = ARG_MANIFEST_FILE, value_name = "name")]
    #[serde(default)]
    pub(crate) manifest_file: Option<String>,
    /// Region identifier written to the manifest (default `nl`).
    #[arg(long = ARG_REGION_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) region_id: Option<String>,
    /// Overpass interpreter URL.
    #[arg(long = ARG_ENDPOINT, value_name = "url")]
    #[serde(default)]
    pub(crate) endpoint: Option<String>,
    /// User-Agent header sent to Overpass.
    #[arg(long = ARG_USER_AGENT, value_name = "agent")]
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
    /// Referer header sent to Overpass.
    #[arg(long = ARG_REFERER, value_name = "url")]
    #[serde(default)]
    pub(crate) referer: Option<String>,
    /// Server-side query budget in seconds; the client waits a little longer.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u32>,
    /// Name of the administrative area to search (default `Nederland`).
    #[arg(long = ARG_AREA_NAME, value_name = "name")]
    #[serde(default)]
    pub(crate) area_name: Option<String>,
    /// Administrative level of the area (default 2).
    #[arg(long = ARG_ADMIN_LEVEL, value_name = "level")]
    #[serde(default)]
    pub(crate) admin_level: Option<u8>,
    /// Bounding box `south,west,north,east`; takes precedence over the area.
    #[arg(long = ARG_BBOX, value_name = "south,west,north,east", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) bbox: Option<String>,
    /// Table layout: `current` (with address) or `legacy`.
    #[arg(long = ARG_SCHEMA, value_name = "revision")]
    #[serde(default)]
    pub(crate) schema: Option<String>,
    /// Category set: `full` (nine categories) or `legacy` (four).
    #[arg(long = ARG_TAXONOMY, value_name = "set")]
    #[serde(default)]
    pub(crate) taxonomy: Option<String>,
    /// Log level for the JSON logs on stderr (default `info`).
    #[arg(long = ARG_LOG_LEVEL, value_name = "level")]
    #[serde(default)]
    pub(crate) log_level: Option<String>,
}

impl BuildArgs {
    pub(crate) fn into_config(self) -> Result<BuildConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        BuildConfig::try_from(merged)
    }
}

/// Category set used for both the upstream query and classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Taxonomy {
    /// Theatre, cinema, library and church.
    Legacy,
    /// All nine categories.
    #[default]
    Full,
}

impl Taxonomy {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Full => "full",
        }
    }

    pub(crate) fn classifier(self) -> Classifier {
        match self {
            Self::Legacy => Classifier::legacy(),
            Self::Full => Classifier::standard(),
        }
    }

    pub(crate) fn query(self) -> OverpassQuery {
        match self {
            Self::Legacy => OverpassQuery::netherlands_legacy(),
            Self::Full => OverpassQuery::netherlands(),
        }
    }
}

impl Display for Taxonomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Taxonomy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "full" | "standard" => Ok(Self::Full),
            _ => Err("expected `legacy` or `full`".to_owned()),
        }
    }
}

/// Resolved `build` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BuildConfig {
    /// Settings handed to the pipeline.
    pub(crate) pipeline: PipelineConfig,
    /// Category set the pipeline was configured with.
    pub(crate) taxonomy: Taxonomy,
    /// Logger verbosity.
    pub(crate) log_level: LevelFilter,
}

impl BuildConfig {
    /// Reject an output path that exists but is not a directory.
    ///
    /// A missing directory is fine; the store stage creates it.
    pub(crate) fn validate_output_dir(&self) -> Result<(), CliError> {
        let path = &self.pipeline.output_dir;
        let inspect = |source| CliError::InspectOutputDirectory {
            path: path.clone(),
            source,
        };
        if silent_fs::dir_exists(path).map_err(inspect)? {
            return Ok(());
        }
        match silent_fs::file_is_file(path) {
            Ok(_) => Err(CliError::OutputDirectoryNotDirectory { path: path.clone() }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(inspect(source)),
        }
    }
}

impl TryFrom<BuildArgs> for BuildConfig {
    type Error = CliError;

    fn try_from(args: BuildArgs) -> Result<Self, Self::Error> {
        let taxonomy: Taxonomy =
            parse_option(args.taxonomy.as_deref(), ARG_TAXONOMY)?.unwrap_or_default();
        let schema: SchemaRevision =
            parse_option(args.schema.as_deref(), ARG_SCHEMA)?.unwrap_or_default();
        let log_level =
            parse_option(args.log_level.as_deref(), ARG_LOG_LEVEL)?.unwrap_or(LevelFilter::Info);

        let mut query = taxonomy.query();
        if let Some(timeout_secs) = args.timeout_secs {
            if timeout_secs == 0 {
                return Err(CliError::InvalidArgument {
                    field: ARG_TIMEOUT_SECS,
                    value: timeout_secs.to_string(),
                    reason: "the budget must be at least one second".to_owned(),
                });
            }
            query = query.with_timeout_secs(timeout_secs);
        }
        if let Some(scope) = resolve_scope(&args)? {
            query = query.with_scope(scope);
        }

        let mut fetch = FetchConfig::for_query(&query);
        if let Some(endpoint) = args.endpoint {
            fetch = fetch.with_endpoint(endpoint);
        }
        if let Some(user_agent) = args.user_agent {
            fetch = fetch.with_user_agent(user_agent);
        }
        if let Some(referer) = args.referer {
            fetch = fetch.with_referer(referer);
        }

        let defaults = PipelineConfig::default();
        let pipeline = PipelineConfig {
            query,
            fetch,
            output_dir: args
                .output_dir
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUTPUT_DIR)),
            database_file: non_blank(args.database_file, ARG_DATABASE_FILE)?
                .unwrap_or(defaults.database_file),
            manifest_file: non_blank(args.manifest_file, ARG_MANIFEST_FILE)?
                .unwrap_or(defaults.manifest_file),
            region_id: non_blank(args.region_id, ARG_REGION_ID)?.unwrap_or(defaults.region_id),
            schema,
            classifier: taxonomy.classifier(),
            name_filter: defaults.name_filter,
        };
        Ok(Self {
            pipeline,
            taxonomy,
            log_level,
        })
    }
}

fn parse_option<T>(value: Option<&str>, field: &'static str) -> Result<Option<T>, CliError>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .map(|raw| {
            raw.parse::<T>().map_err(|err| CliError::InvalidArgument {
                field,
                value: raw.to_owned(),
                reason: err.to_string(),
            })
        })
        .transpose()
}

fn non_blank(value: Option<String>, field: &'static str) -> Result<Option<String>, CliError> {
    match value {
        Some(raw) if raw.trim().is_empty() => Err(CliError::InvalidArgument {
            field,
            value: raw,
            reason: "the value must not be empty".to_owned(),
        }),
        other => Ok(other),
    }
}

fn resolve_scope(args: &BuildArgs) -> Result<Option<QueryScope>, CliError> {
    if let Some(raw) = args.bbox.as_deref() {
        return parse_bbox(raw).map(|rect| Some(QueryScope::BoundingBox(rect)));
    }
    if args.area_name.is_none() && args.admin_level.is_none() {
        return Ok(None);
    }
    Ok(Some(QueryScope::Area {
        name: args
            .area_name
            .clone()
            .unwrap_or_else(|| DEFAULT_AREA_NAME.to_owned()),
        admin_level: args.admin_level.unwrap_or(DEFAULT_ADMIN_LEVEL),
    }))
}

/// Parse `south,west,north,east` into a rectangle with `x = lon`, `y = lat`.
pub(crate) fn parse_bbox(raw: &str) -> Result<Rect<f64>, CliError> {
    let invalid = |reason: &str| CliError::InvalidArgument {
        field: ARG_BBOX,
        value: raw.to_owned(),
        reason: reason.to_owned(),
    };
    let values = raw
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid("coordinates must be decimal numbers"))?;
    let [south, west, north, east] = values.as_slice() else {
        return Err(invalid("expected four values: south,west,north,east"));
    };
    let latitudes = -90.0..=90.0;
    let longitudes = -180.0..=180.0;
    if !latitudes.contains(south) || !latitudes.contains(north) {
        return Err(invalid("latitudes must lie within ±90"));
    }
    if !longitudes.contains(west) || !longitudes.contains(east) {
        return Err(invalid("longitudes must lie within ±180"));
    }
    if south >= north || west >= east {
        return Err(invalid("south must lie below north and west below east"));
    }
    Ok(Rect::new(
        Coord { x: *west, y: *south },
        Coord { x: *east, y: *north },
    ))
}

/// Builds the element source for the current build invocation.
pub(super) trait ElementSourceBuilder {
    fn build(&self, config: &FetchConfig) -> Result<Box<dyn ElementSource>, CliError>;
}

pub(super) struct OverpassSourceBuilder;

impl ElementSourceBuilder for OverpassSourceBuilder {
    fn build(&self, config: &FetchConfig) -> Result<Box<dyn ElementSource>, CliError> {
        let fetcher = OverpassFetcher::with_config(config.clone())?;
        Ok(Box::new(fetcher))
    }
}

pub(super) fn run_build(args: BuildArgs) -> Result<(), CliError> {
    let config = resolve_build_config(args)?;
    init_logging(config.log_level)?;
    let mut stdout = std::io::stdout().lock();
    execute_build(&config, &OverpassSourceBuilder, &mut stdout)
}

pub(super) fn run_build_with(
    args: BuildArgs,
    builder: &dyn ElementSourceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_build_config(args)?;
    execute_build(&config, builder, writer)
}

fn resolve_build_config(args: BuildArgs) -> Result<BuildConfig, CliError> {
    let config = args.into_config()?;
    config.validate_output_dir()?;
    Ok(config)
}

fn execute_build(
    config: &BuildConfig,
    builder: &dyn ElementSourceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    info!(
        "Building {} with the {} taxonomy and the {} schema",
        config.pipeline.store_path(),
        config.taxonomy,
        config.pipeline.schema
    );
    let source = builder.build(&config.pipeline.fetch)?;
    let report = run_pipeline(&config.pipeline, source.as_ref())?;
    write_summary(writer, &report)
}

fn write_summary(writer: &mut dyn Write, report: &PipelineReport) -> Result<(), CliError> {
    writeln!(
        writer,
        "Wrote {} locations to {} ({} bytes); manifest at {}",
        report.accepted, report.store_path, report.size_bytes, report.manifest_path
    )
    .map_err(CliError::WriteSummary)?;
    writeln!(
        writer,
        "Fetched {} elements: {} excluded by name, {} without coordinates, {} duplicate identifiers skipped",
        report.fetched,
        report.excluded_by_name,
        report.dropped_without_position,
        report.duplicates.len()
    )
    .map_err(CliError::WriteSummary)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<BuildConfig, CliError> {
    let merged = BuildArgs::merge_from_layers(layers).map_err(CliError::from)?;
    BuildConfig::try_from(merged)
}
