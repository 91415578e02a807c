use std::process::Stdio;

use tokio::process::Command;

use crate::completion::{CompletionChannel, DirectoryChannel};
use crate::scheduler::job::Job;

/// Starts a job out of process. Fire and forget: the scheduling loop does
/// not consume a return value; the launcher is responsible for eventually
/// publishing the job's id on the completion channel.
pub trait Launcher {
    fn launch(&self, job: &Job, start_slot: u32, slot_count: u32);
}

/// Runs each job's command under `sh -c` as a detached task.
///
/// The assigned range is exported to the child through `RANKRUN_START_SLOT`
/// and `RANKRUN_SLOT_COUNT`. Once the child exits, whatever its exit
/// status, the sentinel is published so the loop can reclaim the slots: a
/// failed job still completes from the allocator's point of view.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    channel: DirectoryChannel,
}

impl ProcessLauncher {
    pub fn new(channel: DirectoryChannel) -> Self {
        Self { channel }
    }
}

impl Launcher for ProcessLauncher {
    fn launch(&self, job: &Job, start_slot: u32, slot_count: u32) {
        let id = job.id.clone();
        let command = job.command.clone();
        let channel = self.channel.clone();

        tokio::spawn(async move {
            let result = Command::new("sh")
                .arg("-c")
                .arg(&command)
                .env("RANKRUN_START_SLOT", start_slot.to_string())
                .env("RANKRUN_SLOT_COUNT", slot_count.to_string())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output()
                .await;

            match result {
                Ok(output) => {
                    if output.status.success() {
                        tracing::info!(job_id = %id, "Job process exited");
                    } else {
                        let stderr = String::from_utf8_lossy(&output.stderr);
                        tracing::warn!(
                            job_id = %id,
                            exit_code = ?output.status.code(),
                            stderr = %stderr.trim_end(),
                            "Job process failed"
                        );
                    }
                }
                Err(e) => {
                    tracing::error!(job_id = %id, error = %e, "Failed to run job process");
                }
            }

            if let Err(e) = channel.publish(&id) {
                tracing::error!(job_id = %id, error = %e, "Failed to publish completion sentinel");
            }
        });
    }
}
