use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("estimate horizon must cover at least one hour")]
    EmptyHorizon,

    #[error("rate must be non-negative: {0}")]
    NegativeRate(f64),
}
