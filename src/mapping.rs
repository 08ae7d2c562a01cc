//! Explicit column choices supplied by the operator

use crate::fields::{Field, FieldMap};
use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A column picked by name, or the explicit `none`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnChoice {
    Named(String),
    Absent,
}

impl From<String> for ColumnChoice {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("none") {
            ColumnChoice::Absent
        } else {
            ColumnChoice::Named(value)
        }
    }
}

impl From<ColumnChoice> for String {
    fn from(choice: ColumnChoice) -> Self {
        match choice {
            ColumnChoice::Named(name) => name,
            ColumnChoice::Absent => "none".to_string(),
        }
    }
}

impl FromStr for ColumnChoice {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.to_string().into())
    }
}

impl JsonSchema for ColumnChoice {
    fn schema_name() -> String {
        "ColumnChoice".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}

/// Explicit choice per field; `None` leaves the field to header detection
pub type Overrides = FieldMap<Option<ColumnChoice>>;

/// Per-table section of a mapping file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TableMapping {
    pub taxable_value: Option<ColumnChoice>,
    pub cgst: Option<ColumnChoice>,
    pub sgst: Option<ColumnChoice>,
    pub igst: Option<ColumnChoice>,
}

impl From<&TableMapping> for Overrides {
    fn from(mapping: &TableMapping) -> Self {
        FieldMap {
            taxable_value: mapping.taxable_value.clone(),
            cgst: mapping.cgst.clone(),
            sgst: mapping.sgst.clone(),
            igst: mapping.igst.clone(),
        }
    }
}

/// Column overrides for both registers.
///
/// Each value is a column name from the file, or "none" to treat the field as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct MappingFile {
    /// Overrides for the sales (outward supplies) file
    pub sales: TableMapping,
    /// Overrides for the purchases (inward supplies) file
    pub purchases: TableMapping,
}

#[derive(Debug, thiserror::Error)]
pub enum MappingFileError {
    #[error("failed to open mapping file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid mapping file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl MappingFile {
    pub fn from_reader<R: Read>(reader: R) -> serde_json::Result<Self> {
        serde_json::from_reader(reader)
    }

    pub fn load(path: &Path) -> Result<Self, MappingFileError> {
        let file = File::open(path).map_err(|source| MappingFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mapping = Self::from_reader(BufReader::new(file)).map_err(|source| {
            MappingFileError::Json {
                path: path.to_path_buf(),
                source,
            }
        })?;
        log::debug!("Loaded column mapping from {}", path.display());
        Ok(mapping)
    }
}

/// Layer `overrides` on top of `base`; a choice in `overrides` wins
pub fn merge(base: &Overrides, overrides: &Overrides) -> Overrides {
    FieldMap::from_fn(|field: Field| {
        overrides
            .get(field)
            .clone()
            .or_else(|| base.get(field).clone())
    })
}
