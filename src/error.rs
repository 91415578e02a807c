use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Duplicate job id: {0}")]
    DuplicateJobId(String),

    #[error("Malformed job spec at line {line}: {reason}")]
    MalformedSpec { line: usize, reason: String },

    #[error("Job {id} requests zero slots, minimum is 1")]
    InvalidSlotCount { id: String },

    #[error("allocate called with no free ranges")]
    NoCapacity,

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Run interrupted before all jobs completed")]
    Interrupted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
