use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewBoxError {
    #[error("a view box needs 4 values (min-x min-y width height), found {0}")]
    WrongValueCount(usize),
    #[error("invalid number in view box: {0:?}")]
    InvalidNumber(String),
    #[error("view box dimensions must be positive, got {width} x {height}")]
    NonPositive { width: f64, height: f64 },
}
