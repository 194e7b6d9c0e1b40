//! Errors raised while loading the district data source.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading a local file failed
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP request could not be sent or its body could not be read
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// The body is not valid GeoJSON
    #[error("invalid GeoJSON: {0}")]
    Parse(#[from] simd_json::Error),

    /// Parsed fine but contained no polygon features
    #[error("no polygon features found")]
    Empty,
}
