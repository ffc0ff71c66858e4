use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Revision of the `locations` table layout.
///
/// Older app releases read the five-column layout; the current one adds a
/// non-null `address` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaRevision {
    /// `id, name, lat, lon, category`.
    Legacy,
    /// `id, name, lat, lon, category, address`.
    #[default]
    Current,
}

impl SchemaRevision {
    /// Value recorded in `PRAGMA user_version`.
    #[must_use]
    pub const fn user_version(self) -> i64 {
        match self {
            Self::Legacy => 1,
            Self::Current => 2,
        }
    }

    /// Whether rows carry an address column.
    #[must_use]
    pub const fn has_address(self) -> bool {
        matches!(self, Self::Current)
    }

    pub(crate) const fn create_table_sql(self) -> &'static str {
        match self {
            Self::Legacy => {
                "CREATE TABLE locations (
                    id INTEGER PRIMARY KEY NOT NULL,
                    name TEXT NOT NULL,
                    lat REAL NOT NULL,
                    lon REAL NOT NULL,
                    category TEXT NOT NULL
                )"
            }
            Self::Current => {
                "CREATE TABLE locations (
                    id INTEGER PRIMARY KEY NOT NULL,
                    name TEXT NOT NULL,
                    lat REAL NOT NULL,
                    lon REAL NOT NULL,
                    category TEXT NOT NULL,
                    address TEXT NOT NULL
                )"
            }
        }
    }

    pub(crate) const fn insert_sql(self) -> &'static str {
        match self {
            Self::Legacy => {
                "INSERT INTO locations (id, name, lat, lon, category) VALUES (?1, ?2, ?3, ?4, ?5)"
            }
            Self::Current => {
                "INSERT INTO locations (id, name, lat, lon, category, address) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
            }
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Current => "current",
        }
    }
}

impl fmt::Display for SchemaRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown schema revision name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown schema revision {0:?}; expected \"legacy\" or \"current\"")]
pub struct SchemaParseError(pub String);

impl FromStr for SchemaRevision {
    type Err = SchemaParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" | "v1" => Ok(Self::Legacy),
            "current" | "v2" => Ok(Self::Current),
            _ => Err(SchemaParseError(s.to_owned())),
        }
    }
}
