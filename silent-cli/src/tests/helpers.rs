//! Test helpers for driving the build command without a network.

use std::rc::Rc;

use camino::{Utf8Path, Utf8PathBuf};
use silent_core::RawElement;
use silent_data::overpass::test_support::StubElementSource;
use silent_data::{ElementSource, FetchConfig, FetchError, OverpassQuery};
use tempfile::TempDir;

use crate::CliError;
use crate::build::ElementSourceBuilder;

/// Three venues around Rotterdam: a church, a chapel and a cinema way that
/// shares the church's source id.
pub(super) const SAMPLE_RESPONSE: &str = r#"{
  "version": 0.6,
  "elements": [
    {
      "type": "node",
      "id": 101,
      "lat": 51.9244,
      "lon": 4.4777,
      "tags": {
        "amenity": "place_of_worship",
        "name": "Laurenskerk",
        "addr:street": "Grotekerkplein",
        "addr:housenumber": "15",
        "addr:city": "Rotterdam"
      }
    },
    {
      "type": "node",
      "id": 102,
      "lat": 51.9201,
      "lon": 4.4702,
      "tags": { "amenity": "place_of_worship", "name": "Sint-Rochuskapel" }
    },
    {
      "type": "way",
      "id": 101,
      "center": { "lat": 51.921, "lon": 4.4731 },
      "tags": { "amenity": "cinema", "name": "Pathé Schouwburgplein" }
    }
  ]
}"#;

/// Stub source shared between the builder and the assertions.
#[derive(Debug, Clone)]
pub(super) struct SharedSource(pub(super) Rc<StubElementSource>);

impl ElementSource for SharedSource {
    fn fetch_elements(&self, query: &OverpassQuery) -> Result<Vec<RawElement>, FetchError> {
        self.0.fetch_elements(query)
    }
}

/// Builder handing out a [`SharedSource`].
#[derive(Debug)]
pub(super) struct StubSourceBuilder {
    source: Rc<StubElementSource>,
}

impl StubSourceBuilder {
    pub(super) fn new(source: StubElementSource) -> Self {
        Self {
            source: Rc::new(source),
        }
    }

    pub(super) fn sample() -> Self {
        Self::new(StubElementSource::from_json(SAMPLE_RESPONSE).expect("sample decodes"))
    }

    pub(super) fn queries(&self) -> Vec<String> {
        self.source.queries()
    }
}

impl ElementSourceBuilder for StubSourceBuilder {
    fn build(&self, _config: &FetchConfig) -> Result<Box<dyn ElementSource>, CliError> {
        Ok(Box::new(SharedSource(Rc::clone(&self.source))))
    }
}

/// UTF-8 root of a temporary directory.
pub(super) fn utf8_root(dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace")
}

/// Write `contents` to `path`, creating the file.
pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    silent_fs::write_file(path, contents).expect("write file");
}
