//! Shared helpers for `silent-data` integration tests.

use std::fs;
use std::path::PathBuf;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::Connection;
use silent_data::overpass::test_support::StubElementSource;
use tempfile::TempDir;

/// A stored row in `locations` column order, without the address.
pub type Row = (i64, String, f64, f64, String);

/// Directory containing the JSON fixtures.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Read a fixture document as text.
pub fn read_fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    fs::read_to_string(&path).unwrap_or_else(|err| {
        panic!("failed to read fixture {path:?}: {err}");
    })
}

/// Stub source replaying the sample Overpass response.
pub fn sample_source() -> StubElementSource {
    StubElementSource::from_json(&read_fixture("overpass_sample.json"))
        .unwrap_or_else(|err| panic!("sample fixture should decode: {err}"))
}

/// Fixed manifest timestamp used across scenarios.
pub fn generated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("fixed instant should be valid"))
}

/// UTF-8 path of a temporary directory.
pub fn utf8_dir(dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
        .unwrap_or_else(|path| panic!("temp dir {path:?} should be UTF-8"))
}

/// Read every row ordered by identifier.
pub fn read_rows(path: &Utf8Path) -> Vec<Row> {
    let connection = Connection::open(path.as_std_path())
        .unwrap_or_else(|err| panic!("failed to open store {path}: {err}"));
    let mut statement = connection
        .prepare("SELECT id, name, lat, lon, category FROM locations ORDER BY id")
        .unwrap_or_else(|err| panic!("failed to prepare select: {err}"));
    statement
        .query_map([], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
        })
        .and_then(Iterator::collect)
        .unwrap_or_else(|err| panic!("failed to read rows: {err}"))
}

/// Column names of the `locations` table.
pub fn column_names(path: &Utf8Path) -> Vec<String> {
    let connection = Connection::open(path.as_std_path())
        .unwrap_or_else(|err| panic!("failed to open store {path}: {err}"));
    let mut statement = connection
        .prepare("SELECT name FROM pragma_table_info('locations')")
        .unwrap_or_else(|err| panic!("failed to prepare pragma: {err}"));
    statement
        .query_map([], |row| row.get(0))
        .and_then(Iterator::collect)
        .unwrap_or_else(|err| panic!("failed to read columns: {err}"))
}

/// Address column keyed by identifier.
pub fn read_addresses(path: &Utf8Path) -> Vec<(i64, String)> {
    let connection = Connection::open(path.as_std_path())
        .unwrap_or_else(|err| panic!("failed to open store {path}: {err}"));
    let mut statement = connection
        .prepare("SELECT id, address FROM locations ORDER BY id")
        .unwrap_or_else(|err| panic!("failed to prepare select: {err}"));
    statement
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .and_then(Iterator::collect)
        .unwrap_or_else(|err| panic!("failed to read addresses: {err}"))
}

/// Epsilon for floating-point coordinate comparisons in tests
const COORDINATE_EPSILON: f64 = 1.0e-7;

/// Compare floating-point coordinates within a small epsilon.
pub fn assert_close(actual: f64, expected: f64) {
    let delta = (actual - expected).abs();
    assert!(
        delta <= COORDINATE_EPSILON,
        "expected {expected}, got {actual} (|Δ| = {delta})"
    );
}
