use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use crate::error::Result;
use crate::scheduler::registry::JobRegistry;

/// Aggregate view of a finished run.
///
/// The load-balance ratio is the slot-time actually spent in jobs divided
/// by the slot-time the pool offered over the run window; 1.0 means every
/// slot was busy from start to finish.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub pool_size: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total_elapsed_ms: i64,
    pub longest_job_ms: i64,
    pub load_balance_ratio: f64,
    pub jobs: Vec<JobOutcome>,
}

#[derive(Debug, Serialize)]
pub struct JobOutcome {
    pub id: String,
    pub start_slot: Option<u32>,
    pub slot_count: Option<u32>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub elapsed_ms: Option<i64>,
}

impl RunReport {
    pub fn from_registry(
        registry: &JobRegistry,
        pool_size: u32,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let total_elapsed_ms = (finished_at - started_at).num_milliseconds().max(1);
        let mut cumulative_ms: i64 = 0;
        let mut longest_job_ms: i64 = 0;
        let mut jobs = Vec::with_capacity(registry.len());

        for job in registry.jobs() {
            let elapsed_ms = job.elapsed().map(|d| d.num_milliseconds());
            if let (Some(elapsed), Some(assignment)) = (elapsed_ms, job.assigned) {
                cumulative_ms += elapsed * i64::from(assignment.slot_count);
                longest_job_ms = longest_job_ms.max(elapsed);
            }
            jobs.push(JobOutcome {
                id: job.id.clone(),
                start_slot: job.assigned.map(|a| a.start_slot),
                slot_count: job.assigned.map(|a| a.slot_count),
                started_at: job.started_at,
                finished_at: job.finished_at,
                elapsed_ms,
            });
        }

        let load_balance_ratio =
            cumulative_ms as f64 / (f64::from(pool_size) * total_elapsed_ms as f64);

        Self {
            pool_size,
            started_at,
            finished_at,
            total_elapsed_ms,
            longest_job_ms,
            load_balance_ratio,
            jobs,
        }
    }

    pub fn print_table(&self) {
        println!(
            "Finished running {} jobs on {} slots",
            self.jobs.len(),
            self.pool_size
        );
        println!("Total elapsed time: {}ms", self.total_elapsed_ms);
        println!("Longest job: {}ms", self.longest_job_ms);
        println!("Load balance ratio: {:.3}", self.load_balance_ratio);
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render the schedule as an SVG timeline: slots on the x axis, time on
    /// the y axis, one randomly colored rectangle per job.
    pub fn export_svg(&self, path: &Path) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        let ratio_w = 500.0 / f64::from(self.pool_size + 1);
        let ratio_h = 500.0 / self.total_elapsed_ms as f64;
        let mut rng = rand::thread_rng();

        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">"#
        )?;
        writeln!(
            out,
            r#"  <rect x="0" y="0" width="500" height="500" style="fill: #ffffff"/>"#
        )?;
        for job in &self.jobs {
            let (Some(start_slot), Some(slot_count), Some(job_started), Some(elapsed)) = (
                job.start_slot,
                job.slot_count,
                job.started_at,
                job.elapsed_ms,
            ) else {
                continue;
            };
            let x = ratio_w * f64::from(start_slot);
            let y = ratio_h * (job_started - self.started_at).num_milliseconds() as f64;
            let width = ratio_w * f64::from(slot_count);
            let height = ratio_h * elapsed as f64;
            let color: u32 = rng.gen_range(0..0x100_0000);
            writeln!(
                out,
                r#"  <rect x="{x:.2}" y="{y:.2}" width="{width:.2}" height="{height:.2}" style="fill: #{color:06x}"/>"#
            )?;
        }
        writeln!(out, "</svg>")?;
        Ok(())
    }
}
