//! LineLab CLI: run indicator graphs over CSV data, sweep periods, generate data.
//!
//! Commands:
//! - `run`: wire a graph from a TOML config, or a single oscillator from
//!   `--average`/`--period`, and evaluate it over a CSV feed
//! - `sweep`: evaluate one oscillator family over a list of periods in parallel
//! - `synth`: write a deterministic synthetic CSV feed

mod feed_csv;
mod output;
mod sweep;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use linelab_core::data::synthetic_bars;
use linelab_core::engine::{EngineConfig, EvalMode, IndicatorEntry};
use linelab_core::indicators::AverageKind;
use linelab_core::IndicatorConfig;

use sweep::SweepSpec;

#[derive(Parser)]
#[command(
    name = "linelab",
    about = "LineLab CLI: time-series line engine for bar-by-bar indicators"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Incremental,
    Batch,
}

impl From<ModeArg> for EvalMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Incremental => EvalMode::Incremental,
            ModeArg::Batch => EvalMode::Batch,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AverageArg {
    Sma,
    Ema,
    Wma,
    Smma,
    Dema,
    Tema,
}

impl From<AverageArg> for AverageKind {
    fn from(arg: AverageArg) -> Self {
        match arg {
            AverageArg::Sma => AverageKind::Sma,
            AverageArg::Ema => AverageKind::Ema,
            AverageArg::Wma => AverageKind::Wma,
            AverageArg::Smma => AverageKind::Smma,
            AverageArg::Dema => AverageKind::Dema,
            AverageArg::Tema => AverageKind::Tema,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a TOML-configured graph, or one oscillator, over a CSV feed.
    Run {
        /// CSV feed (datetime,open,high,low,close,volume[,openinterest]).
        #[arg(long)]
        data: PathBuf,

        /// TOML graph config.
        #[arg(long, required_unless_present = "average", conflicts_with = "average")]
        config: Option<PathBuf>,

        /// Run a single price-minus-average oscillator of this family.
        #[arg(long, value_enum)]
        average: Option<AverageArg>,

        /// Oscillator period (the fast period with --slow).
        #[arg(long, default_value_t = 30)]
        period: i64,

        /// Slow period; switches to the fast-minus-slow form.
        #[arg(long, requires = "average")]
        slow: Option<i64>,

        /// Override the evaluation mode from the config.
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        /// Write every output line as CSV to this path.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Drop rows before every indicator is ready.
        #[arg(long, default_value_t = false)]
        skip_warmup: bool,
    },
    /// Evaluate one oscillator family over several periods in parallel.
    Sweep {
        /// CSV feed. Defaults to synthetic data when omitted.
        #[arg(long)]
        data: Option<PathBuf>,

        /// Averaging method.
        #[arg(long, value_enum, default_value = "sma")]
        average: AverageArg,

        /// Comma-separated periods (e.g., 5,10,20,30).
        #[arg(long, value_delimiter = ',', required = true)]
        periods: Vec<usize>,

        /// Fixed slow period; switches to the fast-minus-slow form.
        #[arg(long)]
        slow: Option<usize>,

        #[arg(long, value_enum, default_value = "batch")]
        mode: ModeArg,

        /// Bars of synthetic data when --data is omitted.
        #[arg(long, default_value_t = 255)]
        bars: usize,

        /// Write sweep rows as CSV to this path instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write a deterministic synthetic CSV feed.
    Synth {
        #[arg(long, default_value_t = 255)]
        bars: usize,

        #[arg(long, default_value_t = 2006)]
        seed: u64,

        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            data,
            config,
            average,
            period,
            slow,
            mode,
            output,
            skip_warmup,
        } => {
            let mut config = match (config, average) {
                (Some(path), _) => load_config(&path)?,
                (None, Some(average)) => single_oscillator_config(average.into(), period, slow),
                (None, None) => bail!("run needs --config or --average"),
            };
            if let Some(mode) = mode {
                config.mode = mode.into();
            }
            run_cmd(&data, &config, output.as_deref(), skip_warmup)
        }
        Commands::Sweep {
            data,
            average,
            periods,
            slow,
            mode,
            bars,
            output,
        } => {
            let spec = SweepSpec {
                average: average.into(),
                periods,
                slow,
                mode: mode.into(),
            };
            sweep_cmd(data.as_deref(), &spec, bars, output.as_deref())
        }
        Commands::Synth {
            bars,
            seed,
            output,
        } => synth_cmd(bars, seed, &output),
    }
}

fn load_config(path: &Path) -> Result<EngineConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = EngineConfig::from_toml(&text)
        .with_context(|| format!("invalid config {}", path.display()))?;
    if config.indicators.is_empty() {
        bail!("config {} declares no indicators", path.display());
    }
    Ok(config)
}

/// One oscillator on `close`, named like the computation it builds.
fn single_oscillator_config(kind: AverageKind, period: i64, slow: Option<i64>) -> EngineConfig {
    let (name, indicator) = match slow {
        Some(slow) => (
            format!("{kind}osc_{period}_{slow}"),
            IndicatorConfig::dual_oscillator(kind, period, slow),
        ),
        None => (
            format!("{kind}osc_{period}"),
            IndicatorConfig::oscillator(kind, period),
        ),
    };
    EngineConfig {
        mode: EvalMode::default(),
        indicators: vec![IndicatorEntry {
            name,
            input: "close".to_string(),
            indicator,
        }],
    }
}

fn run_cmd(
    data: &Path,
    config: &EngineConfig,
    output: Option<&Path>,
    skip_warmup: bool,
) -> Result<()> {
    let bars = feed_csv::read_bars(data)?;
    info!(
        bars = bars.len(),
        indicators = config.indicators.len(),
        mode = ?config.mode,
        "running graph"
    );
    let (graph, nodes) = config.run(&bars)?;

    output::print_summary(&graph, &nodes);
    if let Some(path) = output {
        let csv = output::export_lines_csv(&graph, &nodes, skip_warmup)?;
        std::fs::write(path, csv)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Lines saved to: {}", path.display());
    }
    Ok(())
}

fn sweep_cmd(data: Option<&Path>, spec: &SweepSpec, bars: usize, output: Option<&Path>) -> Result<()> {
    let bars = match data {
        Some(path) => feed_csv::read_bars(path)?,
        None => synthetic_bars(bars, 2006),
    };
    let rows = sweep::run_sweep(spec, &bars)?;
    let csv = sweep::export_sweep_csv(&rows)?;
    match output {
        Some(path) => {
            std::fs::write(path, csv)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Sweep saved to: {}", path.display());
        }
        None => print!("{csv}"),
    }
    Ok(())
}

fn synth_cmd(bars: usize, seed: u64, output: &Path) -> Result<()> {
    let series = synthetic_bars(bars, seed);
    let file = std::fs::File::create(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    feed_csv::write_bars(file, &series)?;
    info!(bars, seed, path = %output.display(), "wrote synthetic feed");
    Ok(())
}
