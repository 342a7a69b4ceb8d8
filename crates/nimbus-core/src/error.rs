use std::path::PathBuf;

use thiserror::Error;

/// Error type for the analysis pipeline.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The input image could not be opened or the output could not be written.
    #[error("i/o failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The raster could not be decoded or encoded.
    #[error("image codec failure on {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// A configuration value is not valid.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// A configuration file is not valid JSON for `AnalysisConfig`.
    #[error("cannot parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A geographic point lies outside the declared image extent.
    #[error("point ({lat}, {lon}) lies outside the image extent")]
    OutOfBounds { lat: f64, lon: f64 },
    #[error("cannot take the maximum of an empty sequence")]
    EmptyInput,
    /// No data rows remain once the header band is removed.
    #[error("image has no data rows below a {header_height}px header (height {height})")]
    EmptyImage { header_height: usize, height: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
