use std::time::Duration;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use rankrun::completion::{CompletionChannel, DirectoryChannel};
use rankrun::config::RunnerConfig;
use rankrun::launcher::ProcessLauncher;
use rankrun::loader::parse_commands;
use rankrun::report::RunReport;
use rankrun::scheduler::{Assignment, CommandsRunner, JobRegistry, JobSpec};

#[test]
fn test_directory_channel_publish_poll_consume() {
    let dir = TempDir::new().unwrap();
    let mut channel = DirectoryChannel::new(dir.path());

    assert!(channel.poll().unwrap().is_empty());

    channel.publish("job-a").unwrap();
    channel.publish("job-b").unwrap();
    let mut ids = channel.poll().unwrap();
    ids.sort();
    assert_eq!(ids, vec!["job-a".to_string(), "job-b".to_string()]);

    channel.consume("job-a").unwrap();
    assert_eq!(channel.poll().unwrap(), vec!["job-b".to_string()]);

    // A consumed sentinel stays gone on the next poll.
    channel.consume("job-b").unwrap();
    assert!(channel.poll().unwrap().is_empty());
}

#[tokio::test]
async fn test_real_processes_run_to_completion() {
    let dir = TempDir::new().unwrap();
    let text = "\
# three real shell jobs
a true
b 2 true
c echo $RANKRUN_SLOT_COUNT
";
    let registry = JobRegistry::from_specs(parse_commands(text).unwrap()).unwrap();
    let channel = DirectoryChannel::new(dir.path());
    let launcher = ProcessLauncher::new(channel.clone());
    let config =
        RunnerConfig::new(3, dir.path()).with_poll_interval(Duration::from_millis(5));

    let started_at = Utc::now();
    let mut runner = CommandsRunner::new(registry, &config, launcher, channel);
    runner.run().await.unwrap();
    let finished_at = Utc::now();

    assert!(runner.allocator().all_free());
    for job in runner.registry().jobs() {
        assert!(job.finished_at.is_some(), "job {} not finished", job.id);
    }
    // Sentinels were consumed.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    let report =
        RunReport::from_registry(runner.registry(), config.slots, started_at, finished_at);
    assert_eq!(report.jobs.len(), 3);
    assert!(report.total_elapsed_ms >= 1);
    assert!(report.load_balance_ratio > 0.0);
    assert!(report.load_balance_ratio <= 1.0);
}

fn finished_registry() -> JobRegistry {
    // Two jobs of width 2, each running exactly 100ms over a 200ms window
    // on a 4-slot pool: ratio = (100*2 + 100*2) / (4 * 200) = 0.25.
    let specs = vec![
        JobSpec {
            id: "a".to_string(),
            command: "x".to_string(),
            requested_slots: 2,
        },
        JobSpec {
            id: "b".to_string(),
            command: "y".to_string(),
            requested_slots: 2,
        },
    ];
    let mut registry = JobRegistry::from_specs(specs).unwrap();
    let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

    let a = registry.get_mut("a").unwrap();
    a.assigned = Some(Assignment {
        start_slot: 1,
        slot_count: 2,
    });
    a.started_at = Some(t0);
    a.finished_at = Some(t0 + chrono::Duration::milliseconds(100));

    let b = registry.get_mut("b").unwrap();
    b.assigned = Some(Assignment {
        start_slot: 3,
        slot_count: 2,
    });
    b.started_at = Some(t0 + chrono::Duration::milliseconds(100));
    b.finished_at = Some(t0 + chrono::Duration::milliseconds(200));

    registry
}

#[test]
fn test_report_load_balance_ratio() {
    let registry = finished_registry();
    let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let report = RunReport::from_registry(
        &registry,
        4,
        t0,
        t0 + chrono::Duration::milliseconds(200),
    );

    assert_eq!(report.total_elapsed_ms, 200);
    assert_eq!(report.longest_job_ms, 100);
    assert!((report.load_balance_ratio - 0.25).abs() < 1e-9);
    assert_eq!(report.jobs[0].elapsed_ms, Some(100));
    assert_eq!(report.jobs[1].start_slot, Some(3));
}

#[test]
fn test_report_json_and_svg_export() {
    let registry = finished_registry();
    let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let report = RunReport::from_registry(
        &registry,
        4,
        t0,
        t0 + chrono::Duration::milliseconds(200),
    );

    let json = report.to_json().unwrap();
    assert!(json.contains("\"load_balance_ratio\""));
    assert!(json.contains("\"id\": \"a\""));

    let dir = TempDir::new().unwrap();
    let svg_path = dir.path().join("schedule.svg");
    report.export_svg(&svg_path).unwrap();
    let svg = std::fs::read_to_string(&svg_path).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.trim_end().ends_with("</svg>"));
    // One background rectangle plus one per job.
    assert_eq!(svg.matches("<rect").count(), 3);
}
