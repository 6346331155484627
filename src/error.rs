use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("unknown structure type: {0}")]
    UnknownStructureType(String),
    #[error("{label} at ({row}, {col}) does not fit on the grid")]
    OutOfBounds { label: String, row: i32, col: i32 },
    #[error("{label} at ({row}, {col}) overlaps an occupied cell")]
    Overlap { label: String, row: i32, col: i32 },
    #[error("malformed detection result: {0}")]
    Detection(#[from] serde_json::Error),
}

pub type PlannerResult<T> = Result<T, PlannerError>;
