use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::completion::CompletionChannel;
use crate::config::RunnerConfig;
use crate::error::{Result, SchedulerError};
use crate::launcher::Launcher;
use crate::scheduler::allocator::SlotAllocator;
use crate::scheduler::registry::JobRegistry;

/// Drives a batch of jobs to completion over a fixed slot pool.
///
/// Single-threaded cooperative loop: each iteration either launches the
/// next queued job (when any free range exists) or makes one non-blocking
/// pass over the completion channel. The queue is consumed strictly front
/// to back; a job that cannot obtain slots stalls the queue rather than
/// being skipped.
pub struct CommandsRunner<L, C> {
    registry: JobRegistry,
    allocator: SlotAllocator,
    launcher: L,
    channel: C,
    cursor: usize,
    poll_interval: Duration,
    shutdown: CancellationToken,
}

impl<L: Launcher, C: CompletionChannel> CommandsRunner<L, C> {
    pub fn new(registry: JobRegistry, config: &RunnerConfig, launcher: L, channel: C) -> Self {
        Self {
            registry,
            allocator: SlotAllocator::new(config.slots),
            launcher,
            channel,
            cursor: 0,
            poll_interval: config.poll_interval,
            shutdown: CancellationToken::new(),
        }
    }

    /// Stop launching when this token is cancelled. Already-running job
    /// processes are not touched.
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    pub fn allocator(&self) -> &SlotAllocator {
        &self.allocator
    }

    pub fn into_registry(self) -> JobRegistry {
        self.registry
    }

    /// Run until the queue is exhausted and every launched job has been
    /// observed as finished. A job that never publishes its sentinel keeps
    /// its slots forever and this loop never returns; detecting that is an
    /// external monitoring concern.
    pub async fn run(&mut self) -> Result<()> {
        while self.cursor < self.registry.len() || !self.allocator.all_free() {
            if self.shutdown.is_cancelled() {
                tracing::warn!(
                    launched = self.cursor,
                    total = self.registry.len(),
                    in_use = self.allocator.in_use(),
                    "Run interrupted"
                );
                return Err(SchedulerError::Interrupted);
            }
            if self.cursor < self.registry.len() && self.allocator.has_capacity() {
                self.launch_next()?;
                // Launching is prioritized over polling; skip the
                // completion pass this iteration.
                continue;
            }
            let reclaimed = self.poll_completions()?;
            if reclaimed == 0 {
                tokio::time::sleep(self.poll_interval).await;
            }
        }
        tracing::info!(jobs = self.registry.len(), "All jobs finished");
        Ok(())
    }

    /// Launch the job at the queue cursor with slots from the allocator.
    fn launch_next(&mut self) -> Result<()> {
        let requested = self
            .registry
            .job_at(self.cursor)
            .ok_or_else(|| SchedulerError::JobNotFound(format!("queue position {}", self.cursor)))?
            .requested_slots;
        let assignment = self.allocator.allocate(requested)?;

        let job = self
            .registry
            .job_at_mut(self.cursor)
            .ok_or_else(|| SchedulerError::JobNotFound(format!("queue position {}", self.cursor)))?;
        job.assigned = Some(assignment);
        job.started_at = Some(Utc::now());
        tracing::info!(
            job_id = %job.id,
            start_slot = assignment.start_slot,
            slot_count = assignment.slot_count,
            requested = requested,
            "Launching job"
        );
        self.launcher
            .launch(job, assignment.start_slot, assignment.slot_count);
        self.cursor += 1;
        Ok(())
    }

    /// One non-blocking pass over the completion channel.
    ///
    /// Every id that matches a launched, not-yet-finished job is consumed,
    /// time-stamped, and its range returned to the allocator. Unknown ids
    /// are left on the channel; they may belong to another run. Returns the
    /// number of jobs reclaimed in this pass.
    fn poll_completions(&mut self) -> Result<usize> {
        let mut reclaimed = 0;
        for id in self.channel.poll()? {
            let Some(job) = self.registry.get_mut(&id) else {
                continue;
            };
            if job.finished_at.is_some() {
                continue;
            }
            let Some(assignment) = job.assigned else {
                continue;
            };
            job.finished_at = Some(Utc::now());
            let elapsed_ms = job.elapsed().map(|d| d.num_milliseconds());

            self.channel.consume(&id)?;
            self.allocator
                .free(assignment.start_slot, assignment.slot_count);
            reclaimed += 1;
            tracing::info!(
                job_id = %id,
                elapsed_ms = ?elapsed_ms,
                slot_count = assignment.slot_count,
                "Job finished"
            );
        }
        Ok(reclaimed)
    }
}
