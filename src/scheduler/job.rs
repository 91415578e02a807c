use chrono::{DateTime, Utc};
use serde::Serialize;

/// A slot range assigned to a running job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Assignment {
    /// First slot of the assigned range.
    pub start_slot: u32,
    /// Granted width. May be less than the requested width: slot 1 does not
    /// count toward a multi-slot job, and the grant is clamped to the free
    /// range it was carved from.
    pub slot_count: u32,
}

/// One unit of work: an opaque command line plus its slot requirement.
///
/// The id doubles as the name of the job's completion sentinel. Records are
/// never destroyed during a run; they carry the assignment and timestamps
/// for post-run reporting.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: String,
    pub command: String,
    pub requested_slots: u32,
    pub assigned: Option<Assignment>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn new(id: impl Into<String>, command: impl Into<String>, requested_slots: u32) -> Self {
        Self {
            id: id.into(),
            command: command.into(),
            requested_slots,
            assigned: None,
            started_at: None,
            finished_at: None,
        }
    }

    /// Wall-clock duration, available once the job has started and finished.
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        match (self.started_at, self.finished_at) {
            (Some(started), Some(finished)) => Some(finished - started),
            _ => None,
        }
    }
}

/// A parsed job spec, before registry construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    pub id: String,
    pub command: String,
    pub requested_slots: u32,
}
