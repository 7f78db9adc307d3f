use std::path::PathBuf;

use thiserror::Error;

/// Whole-source failures. Anything smaller than a source is absorbed during
/// cleaning and only shows up in the load report.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("{} has no columns", .path.display())]
    NoColumns { path: PathBuf },
}
