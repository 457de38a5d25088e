use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("No price history for ticker: {0}")]
    EmptyHistory(String),

    #[error("Insufficient data: offset {offset} exceeds series length {len}")]
    InsufficientData { offset: usize, len: usize },

    #[error("Division by zero: opening price is zero at index {0}")]
    DivisionByZero(usize),

    #[error("Degenerate magnitude range: all crossing magnitudes are equal")]
    DegenerateMagnitudeRange,

    #[error("Data source error: {0}")]
    Source(String),
}

pub type Result<T> = std::result::Result<T, Error>;
