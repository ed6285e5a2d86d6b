//! Dataset loading: the boundary to the upstream data store.
//!
//! The report core treats its input as an opaque, fully materialized
//! collection; this module materializes it from a serialized dataset file.
//! The format is resolved from the file extension (`.json` or `.yaml`/`.yml`),
//! the same way CSV delimiters are resolved elsewhere from `.csv`/`.tsv`.
//! Any failure here is fatal to the run and propagates unmodified — no
//! partial report is produced and no retries happen at this layer.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{Catalog, Request};

/// Everything one report run consumes: the catalog to resolve references
/// against and the requests to report on.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dataset {
    #[serde(default)]
    pub catalog: Catalog,
    #[serde(default)]
    pub requests: Vec<Request>,
}

impl Dataset {
    pub fn line_item_count(&self) -> usize {
        self.requests
            .iter()
            .map(|request| request.line_items.len())
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Json,
    Yaml,
}

/// The fatal upstream-data-access error class.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("opening dataset {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing JSON dataset {path:?}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("parsing YAML dataset {path:?}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("dataset {path:?} has an unsupported extension (expected .json, .yaml, or .yml)")]
    UnsupportedFormat { path: PathBuf },
}

pub fn resolve_format(path: &Path) -> Result<DatasetFormat, DatasetError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(DatasetFormat::Json),
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            Ok(DatasetFormat::Yaml)
        }
        _ => Err(DatasetError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

pub fn load(path: &Path) -> Result<Dataset, DatasetError> {
    let format = resolve_format(path)?;
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    match format {
        DatasetFormat::Json => {
            serde_json::from_reader(reader).map_err(|source| DatasetError::Json {
                path: path.to_path_buf(),
                source,
            })
        }
        DatasetFormat::Yaml => {
            serde_yaml::from_reader(reader).map_err(|source| DatasetError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}
