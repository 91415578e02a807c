use std::path::PathBuf;
use std::time::Duration;

/// Configuration for one scheduling run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Total number of execution slots in the pool. Slot 1 is the
    /// coordinator slot and does not count toward a multi-slot job's width.
    pub slots: u32,
    /// Directory where completion sentinels are published.
    pub output_dir: PathBuf,
    /// Idle delay between completion polls that found nothing.
    pub poll_interval: Duration,
    /// Reuse the output directory if it already exists.
    pub force: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            slots: 1,
            output_dir: PathBuf::from("rankrun_out"),
            poll_interval: Duration::from_millis(10),
            force: false,
        }
    }
}

impl RunnerConfig {
    pub fn new(slots: u32, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            slots,
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runner_config_default() {
        let cfg = RunnerConfig::default();
        assert_eq!(cfg.slots, 1);
        assert_eq!(cfg.output_dir, PathBuf::from("rankrun_out"));
        assert_eq!(cfg.poll_interval, Duration::from_millis(10));
        assert!(!cfg.force);
    }

    #[test]
    fn runner_config_new() {
        let cfg = RunnerConfig::new(16, "/tmp/run");
        assert_eq!(cfg.slots, 16);
        assert_eq!(cfg.output_dir, PathBuf::from("/tmp/run"));
        assert_eq!(cfg.poll_interval, Duration::from_millis(10));
    }

    #[test]
    fn runner_config_with_poll_interval() {
        let cfg = RunnerConfig::new(4, "out").with_poll_interval(Duration::from_millis(50));
        assert_eq!(cfg.poll_interval, Duration::from_millis(50));
    }
}
