//! Format detection, file discovery and deserialization of network
//! definitions.

use std::path::{Path, PathBuf};

use factorial_logistics::{LogisticsError, NetworkBuilder};
use tracing::debug;

use crate::schema::NetworkData;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading a network definition.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// An entry parsed but describes an invalid provider or requester.
    #[error("invalid {kind} #{index}: {source}")]
    InvalidEntry {
        kind: &'static str,
        index: usize,
        #[source]
        source: LogisticsError,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for `{base_name}.ron`, `.toml` or `.json`.
///
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// more than one format exists for the same base name.
pub fn find_network_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Parse a network definition from text in the given format. `origin` is
/// only used to label parse errors.
pub fn parse_network_str(
    content: &str,
    format: Format,
    origin: &Path,
) -> Result<NetworkData, DataLoadError> {
    let parse_err = |detail: String| DataLoadError::Parse {
        file: origin.to_path_buf(),
        detail,
    };

    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_err(e.to_string())),
    }
}

/// Read a file and parse it according to its extension.
pub fn read_network_file(path: &Path) -> Result<NetworkData, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_network_str(&content, format, path)
}

/// Read a network definition and register every entry with a fresh builder.
pub fn load_network_file(path: &Path) -> Result<NetworkBuilder, DataLoadError> {
    let data = read_network_file(path)?;
    debug!(
        file = %path.display(),
        providers = data.providers.len(),
        requesters = data.requesters.len(),
        "network definition loaded"
    );
    data.into_builder()
}

// ===========================================================================
// Tests
// ===========================================================================
