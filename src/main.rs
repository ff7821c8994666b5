use std::path::PathBuf;

use clap::Parser;

use herdsim::log::{set_log_level, LevelFilter};
use herdsim::progress::init_step_progress_bar;
use herdsim::{info, Epidemic, HerdsimError, ReportOptions, ScenarioParams, SnapshotReport};

/// Command line arguments for the simulation runner
#[derive(Parser, Debug)]
#[command(name = "herdsim", about = "Discrete-time herd-immunity epidemic simulation")]
struct Args {
    /// Random seed
    #[arg(short, long, default_value = "0")]
    random_seed: u64,

    /// Optional path to a JSON file with scenario parameters
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for report output
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Replace an existing report file
    #[arg(long)]
    overwrite: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,

    /// Disable the step progress bar
    #[arg(long)]
    no_progress: bool,
}

fn run(args: &Args) -> Result<(), HerdsimError> {
    let params = match &args.config {
        Some(path) => ScenarioParams::from_file(path)?,
        None => ScenarioParams::default(),
    };

    let mut epidemic = Epidemic::new(params, args.random_seed)?;
    info!("{}", epidemic.summary());

    let mut options = ReportOptions::default();
    options
        .directory(args.output_dir.clone())
        .overwrite(args.overwrite);
    let mut report = SnapshotReport::create(&options, "epidemic_report")?;

    let total_time_steps = epidemic.params().total_time_steps;
    if !args.no_progress && total_time_steps > 0 {
        init_step_progress_bar(total_time_steps);
    }

    epidemic.run();

    report.record_all(epidemic.history())?;
    info!("{}", epidemic.summary());
    info!("step report written to {}", report.path().display());
    Ok(())
}

fn main() {
    let args = Args::parse();
    set_log_level(args.log_level);

    match run(&args) {
        Ok(()) => {
            println!("Simulation completed successfully");
        }
        Err(error) => {
            eprintln!("Simulation failed: {error}");
            std::process::exit(1);
        }
    }
}
