use std::collections::HashMap;

use crate::error::{Result, SchedulerError};
use crate::scheduler::job::{Job, JobSpec};

/// Ordered collection of jobs with lookup by id.
///
/// Built once from the parsed specs; the launch order is the order the
/// specs arrived in and is never reordered or filtered. Records are only
/// mutated through [`get_mut`](Self::get_mut) and
/// [`job_at_mut`](Self::job_at_mut) as the run progresses.
#[derive(Debug)]
pub struct JobRegistry {
    jobs: Vec<Job>,
    index: HashMap<String, usize>,
}

impl JobRegistry {
    /// Build the registry, validating ids and slot counts up front.
    pub fn from_specs(specs: Vec<JobSpec>) -> Result<Self> {
        let mut jobs = Vec::with_capacity(specs.len());
        let mut index = HashMap::with_capacity(specs.len());
        for spec in specs {
            if spec.requested_slots == 0 {
                return Err(SchedulerError::InvalidSlotCount { id: spec.id });
            }
            if index.contains_key(&spec.id) {
                return Err(SchedulerError::DuplicateJobId(spec.id));
            }
            index.insert(spec.id.clone(), jobs.len());
            jobs.push(Job::new(spec.id, spec.command, spec.requested_slots));
        }
        Ok(Self { jobs, index })
    }

    /// Look up a job by id. Absence is not an error: the completion
    /// directory may contain entries that belong to another run.
    pub fn get(&self, id: &str) -> Option<&Job> {
        self.index.get(id).map(|&pos| &self.jobs[pos])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Job> {
        let pos = *self.index.get(id)?;
        Some(&mut self.jobs[pos])
    }

    /// Job at a queue position.
    pub fn job_at(&self, pos: usize) -> Option<&Job> {
        self.jobs.get(pos)
    }

    pub fn job_at_mut(&mut self, pos: usize) -> Option<&mut Job> {
        self.jobs.get_mut(pos)
    }

    /// All jobs in queue order, for reporting.
    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
