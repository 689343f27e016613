use thiserror::Error;

/// Validation failures surfaced before any transformation runs.
///
/// Cell-level garbage never raises: unparseable numeric cells degrade to
/// missing during coercion, and arithmetic edge cases in the growth stage
/// (division by zero, non-finite ratios) are nulled out. Only structural
/// problems with the input table are errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid input shape: {0}")]
    InvalidInputShape(String),
    #[error("year {0} is outside the supported range 2000-2023")]
    YearOutOfRange(u16),
    #[error("column label '{0}' is not a year")]
    InvalidYearLabel(String),
}

impl PipelineError {
    pub fn shape(reason: impl Into<String>) -> Self {
        PipelineError::InvalidInputShape(reason.into())
    }
}
