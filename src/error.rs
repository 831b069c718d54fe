use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("invalid world dimensions {width}x{height}: both must be at least 1")]
    InvalidDimensions { width: usize, height: usize },

    #[error("failed to read params file {path}: {source}")]
    ParamsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid params: {0}")]
    ParamsParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WorldError>;
