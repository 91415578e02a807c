use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use rankrun::completion::DirectoryChannel;
use rankrun::config::RunnerConfig;
use rankrun::launcher::ProcessLauncher;
use rankrun::loader::load_commands_file;
use rankrun::report::RunReport;
use rankrun::scheduler::{CommandsRunner, JobRegistry};
use rankrun::shutdown::install_shutdown_handler;

#[derive(Parser, Debug)]
#[command(name = "rankrun")]
#[command(version)]
#[command(about = "Dispatch a batch of command jobs across a fixed pool of execution slots")]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run every job in a commands file to completion
    Run(RunArgs),

    /// Parse a commands file and report what would run
    Check {
        /// Path to the commands file
        #[arg(long, short = 'c')]
        commands: PathBuf,
    },
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Path to the commands file (one job per line: id [slots] command)
    #[arg(long, short = 'c')]
    commands: PathBuf,

    /// Number of execution slots in the pool
    #[arg(long, short = 's', value_parser = clap::value_parser!(u32).range(1..))]
    slots: u32,

    /// Directory for completion sentinels
    #[arg(long, short = 'o', default_value = "rankrun_out")]
    output: PathBuf,

    /// Reuse the output directory if it already exists
    #[arg(long)]
    force: bool,

    /// Idle delay between completion polls, in milliseconds
    #[arg(long, default_value = "10")]
    poll_interval_ms: u64,

    /// Write an SVG timeline of the schedule to this path
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Output format for the run report
    #[arg(long, short = 'f', default_value = "table")]
    format: OutputFormat,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

async fn run_batch(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = RunnerConfig {
        slots: args.slots,
        output_dir: args.output,
        poll_interval: Duration::from_millis(args.poll_interval_ms),
        force: args.force,
    };

    if config.output_dir.exists() && !config.force {
        return Err(format!(
            "output directory {} already exists, use --force to reuse it",
            config.output_dir.display()
        )
        .into());
    }
    std::fs::create_dir_all(&config.output_dir)?;

    let specs = load_commands_file(&args.commands)?;
    let registry = JobRegistry::from_specs(specs)?;
    tracing::info!(
        jobs = registry.len(),
        slots = config.slots,
        output_dir = %config.output_dir.display(),
        "Starting run"
    );

    let channel = DirectoryChannel::new(&config.output_dir);
    let launcher = ProcessLauncher::new(channel.clone());
    let shutdown = install_shutdown_handler();

    let started_at = Utc::now();
    let mut runner =
        CommandsRunner::new(registry, &config, launcher, channel).with_shutdown(shutdown);
    runner.run().await?;
    let finished_at = Utc::now();

    let report = RunReport::from_registry(runner.registry(), config.slots, started_at, finished_at);
    match args.format {
        OutputFormat::Table => report.print_table(),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    if let Some(svg) = args.svg {
        report.export_svg(&svg)?;
        tracing::info!(path = %svg.display(), "Wrote SVG timeline");
    }
    Ok(())
}

fn check_commands(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let specs = load_commands_file(path)?;
    let registry = JobRegistry::from_specs(specs)?;
    for job in registry.jobs() {
        println!("{} {{slots: {}}} {}", job.id, job.requested_slots, job.command);
    }
    println!("{} jobs parsed", registry.len());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match args.command {
        Commands::Run(run_args) => run_batch(run_args).await?,
        Commands::Check { commands } => check_commands(&commands)?,
    }

    Ok(())
}
