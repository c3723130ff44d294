//! Resampling cache model CLI.
//!
//! This binary is a thin front end over `warpcache-core`. It provides:
//! 1. **Single run:** Simulate one kernel/cache configuration and print the report (text or JSON).
//! 2. **Sweep:** Expand an experiment grid, simulate every point in parallel, and write CSV rows.
//! 3. **Trace:** Dump the generated load/store sequence as JSON lines, without simulating.

use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use warpcache_core::config::CacheLevelConfig;
use warpcache_core::image::{ImageGeometry, KernelKind};
use warpcache_core::common::AccessError;
use warpcache_core::sim::{SweepPlan, SweepRecord, TraceDriver, run_sweep};
use warpcache_core::{CostModel, SimConfig, simulate};

#[derive(Parser, Debug)]
#[command(
    name = "warpcache",
    author,
    version,
    about = "Cache-hierarchy time/energy model for image resampling kernels",
    long_about = "Replay the memory accesses of rotation and flip kernels against a multi-level \
                  LRU cache and convert the counters into time and energy per pixel.\n\n\
                  Examples:\n  \
                  warpcache run rot 250 32 8 64 32768 8 64 2097152 --cost cacti.json\n  \
                  warpcache run --config run.json --cost cacti.json --json\n  \
                  warpcache sweep --cost cacti.json --output results.csv\n  \
                  warpcache trace --config run.json --limit 1000"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate a single configuration.
    Run(RunArgs),

    /// Simulate an experiment grid in parallel and write one CSV row per point.
    Sweep {
        /// JSON sweep plan; the built-in batch-size grid is used when omitted.
        #[arg(long)]
        plan: Option<PathBuf>,

        /// JSON cost model (per-level access time, read and write energy).
        #[arg(long)]
        cost: PathBuf,

        /// CSV output path; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the access trace of a configuration to stdout, one JSON event per line.
    Trace {
        /// JSON configuration file.
        #[arg(long)]
        config: PathBuf,

        /// Stop writing after this many events.
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Kernel: rot, hflip or vflip.
    #[arg(required_unless_present = "config")]
    kernel: Option<String>,
    /// Width of the (square) images.
    #[arg(required_unless_present = "config")]
    image_size: Option<u64>,
    /// Number of images to process.
    #[arg(required_unless_present = "config")]
    n_images: Option<u64>,
    #[arg(required_unless_present = "config")]
    l1_ways: Option<u64>,
    #[arg(required_unless_present = "config")]
    l1_block_size: Option<u64>,
    #[arg(required_unless_present = "config")]
    l1_size: Option<u64>,
    #[arg(required_unless_present = "config")]
    l2_ways: Option<u64>,
    #[arg(required_unless_present = "config")]
    l2_block_size: Option<u64>,
    #[arg(required_unless_present = "config")]
    l2_size: Option<u64>,

    /// JSON configuration file; replaces the positional parameters.
    #[arg(long, conflicts_with = "kernel")]
    config: Option<PathBuf>,

    /// JSON cost model (per-level access time, read and write energy).
    #[arg(long)]
    cost: PathBuf,

    /// Rows processed together.
    #[arg(long)]
    rows: Option<u64>,

    /// Model one store per destination pixel.
    #[arg(long)]
    stores: bool,

    /// Scale applied to the DRAM time and energy constants.
    #[arg(long)]
    dram_multiplier: Option<f64>,

    /// Seed for the per-image rotation angle.
    #[arg(long)]
    seed: Option<u64>,

    /// Print the report as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

type CliResult<T> = Result<T, Box<dyn Error>>;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => cmd_run(&args),
        Commands::Sweep { plan, cost, output } => {
            cmd_sweep(plan.as_deref(), &cost, output.as_deref())
        }
        Commands::Trace { config, limit } => cmd_trace(&config, limit),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Installs the stderr subscriber; stdout is reserved for results.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_cost(path: &Path) -> CliResult<CostModel> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("reading cost model {}: {e}", path.display()))?;
    Ok(CostModel::from_json(&text)?)
}

fn read_config(path: &Path) -> CliResult<SimConfig> {
    let text =
        fs::read_to_string(path).map_err(|e| format!("reading config {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&text)?)
}

/// Builds the run configuration from a file or from the positional parameters.
fn build_config(args: &RunArgs) -> CliResult<SimConfig> {
    let mut config = if let Some(path) = &args.config {
        read_config(path)?
    } else {
        let missing = |name: &str| format!("missing positional parameter {name}");
        let kernel: KernelKind = args
            .kernel
            .as_deref()
            .ok_or_else(|| missing("kernel"))?
            .parse()?;
        let size = args.image_size.ok_or_else(|| missing("image_size"))?;
        SimConfig {
            kernel,
            image: ImageGeometry::square_rgb(size),
            n_images: args.n_images.ok_or_else(|| missing("n_images"))?,
            levels: vec![
                CacheLevelConfig::new(
                    "L1",
                    args.l1_size.ok_or_else(|| missing("l1_size"))?,
                    args.l1_block_size.ok_or_else(|| missing("l1_block_size"))?,
                    args.l1_ways.ok_or_else(|| missing("l1_ways"))?,
                ),
                CacheLevelConfig::new(
                    "L2",
                    args.l2_size.ok_or_else(|| missing("l2_size"))?,
                    args.l2_block_size.ok_or_else(|| missing("l2_block_size"))?,
                    args.l2_ways.ok_or_else(|| missing("l2_ways"))?,
                ),
            ],
            ..SimConfig::default()
        }
    };

    if let Some(rows) = args.rows {
        config.parallelism = rows;
    }
    if args.stores {
        config.model_stores = true;
    }
    if let Some(multiplier) = args.dram_multiplier {
        config.dram_multiplier = multiplier;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Ok(config)
}

fn cmd_run(args: &RunArgs) -> CliResult<()> {
    let config = build_config(args)?;
    let cost = load_cost(&args.cost)?;
    tracing::info!(kernel = %config.kernel, n_images = config.n_images, "starting run");

    let report = simulate(&config, &cost)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print();
    }
    Ok(())
}

fn cmd_sweep(plan: Option<&Path>, cost: &Path, output: Option<&Path>) -> CliResult<()> {
    let plan = match plan {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("reading sweep plan {}: {e}", path.display()))?;
            serde_json::from_str::<SweepPlan>(&text)?
        }
        None => SweepPlan::default(),
    };
    let cost = load_cost(cost)?;
    let configs = plan.configs();
    tracing::info!(points = configs.len(), "starting sweep");

    let results = run_sweep(&configs, &cost);

    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(fs::File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = csv::Writer::from_writer(sink);
    let mut failures = 0usize;
    for (config, result) in configs.iter().zip(&results) {
        let record = SweepRecord::new(config, result);
        if record.is_error() {
            failures += 1;
        }
        writer.serialize(record)?;
    }
    writer.flush()?;

    if failures > 0 {
        tracing::warn!(failures, total = configs.len(), "some sweep points failed");
    }
    Ok(())
}

/// Why trace generation stopped before the end of the batch.
enum TraceStop {
    /// The requested number of events was written.
    Limit,
    /// Generation or output failed.
    Failed(Box<dyn Error>),
}

impl From<AccessError> for TraceStop {
    fn from(e: AccessError) -> Self {
        Self::Failed(e.into())
    }
}

fn cmd_trace(path: &Path, limit: Option<usize>) -> CliResult<()> {
    let config = read_config(path)?.validate()?;
    let limit = limit.unwrap_or(usize::MAX);
    let mut out = io::BufWriter::new(io::stdout().lock());
    let mut written = 0usize;

    let outcome = TraceDriver::new(&config).visit(|event| -> Result<(), TraceStop> {
        if written == limit {
            return Err(TraceStop::Limit);
        }
        serde_json::to_writer(&mut out, &event).map_err(|e| TraceStop::Failed(e.into()))?;
        writeln!(out).map_err(|e| TraceStop::Failed(e.into()))?;
        written += 1;
        Ok(())
    });
    match outcome {
        Ok(()) | Err(TraceStop::Limit) => {}
        Err(TraceStop::Failed(e)) => return Err(e),
    }
    out.flush()?;
    tracing::info!(events = written, "trace written");
    Ok(())
}
