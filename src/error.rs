use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A forecast was requested for a horizon the data provider never supplied.
    #[error("no percentile bracket for horizon +{horizon}Y")]
    MissingHorizon { horizon: u32 },

    #[error("malformed percentile bracket at horizon +{horizon}Y: {detail}")]
    MalformedBracket { horizon: u32, detail: String },

    #[error("unknown ticker `{0}`")]
    UnknownTicker(String),
}
