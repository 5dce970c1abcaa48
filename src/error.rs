use std::process::ExitStatus;

use thiserror::Error;

/// Everything that can go wrong between a folder of photos and a gif.
///
/// The core reduction steps never recover on their own; errors travel up to
/// the pipeline, which decides whether to abort the run.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("empty photo set")]
    EmptyInput,

    #[error("photo sequence is not sorted by capture time")]
    UnsortedSequence,

    #[error("image write failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("cache serialization failed: {0}")]
    Cache(#[from] serde_json::Error),

    #[error("ffmpeg exited with {status}: {stderr}")]
    Encoder { status: ExitStatus, stderr: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
