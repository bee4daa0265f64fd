use std::{path::PathBuf, process::ExitCode, time::Instant};

use clap::{Parser, ValueEnum};
use log::{error, info, warn};
use memory_stats::memory_stats;
use sparsemc::{
    ParseError, ParserSettings,
    formats,
    linalg::fields::{PseudoField, rational::Rational},
};

pub mod report;
use report::*;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Transition file to read.
    #[arg(short, long)]
    transitions: PathBuf,
    /// Transition reward file whose rows are aligned to the transitions.
    #[arg(short, long)]
    rewards: Option<PathBuf>,
    /// Insert self-loops for states without outgoing transitions.
    #[arg(long)]
    fix_deadlocks: bool,
    #[arg(value_enum, short, long, default_value_t = NumericField::F64)]
    numeric_field: NumericField,
    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum NumericField {
    F64,
    Rational,
}

fn run<F: PseudoField>(args: &Args) -> Result<Summary, ParseError> {
    let settings = ParserSettings::default().with_fix_deadlocks(args.fix_deadlocks);
    let model = formats::read_transitions::<F>(&args.transitions, &settings)?;
    let rewards = match &args.rewards {
        Some(path) => Some(formats::read_rewards::<F, F>(path, &model)?.matrix),
        None => None,
    };
    Ok(summarize(&model, rewards.as_ref()))
}

fn current_memory() -> (usize, usize) {
    if let Some(usage) = memory_stats() {
        (usage.physical_mem, usage.virtual_mem)
    } else {
        warn!("Couldn't get the current memory usage :(");
        (0, 0)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let (pre_physical_mem, pre_virtual_mem) = current_memory();
    let time_start = Instant::now();
    info!("Using [{:?}] as numerical field.", args.numeric_field);

    let summary = match args.numeric_field {
        NumericField::F64 => run::<f64>(&args),
        NumericField::Rational => run::<Rational>(&args),
    };

    let elapsed = time_start.elapsed();
    let (post_physical_mem, post_virtual_mem) = current_memory();
    info!(
        "Elapsed: {:?}. physical mem used: {:.2} MB. virtual mem used: {:.2} MB",
        elapsed,
        post_physical_mem.saturating_sub(pre_physical_mem) as f64 / 1048576.0,
        post_virtual_mem.saturating_sub(pre_virtual_mem) as f64 / 1048576.0
    );

    match summary {
        Ok(summary) => {
            if args.json {
                match serde_json::to_string_pretty(&summary) {
                    Ok(json) => println!("{json}"),
                    Err(err) => {
                        error!("Unable to serialize the summary: {err}");
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                summary.log();
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
