use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, warn};
use wage_cli::app::{self, CliOverrides, Settings};
use wage_cli::logging;
use wage_cli::prompt::Prompter;
use wage_core::chart::{self, RealChartOptions};
use wage_core::{InflationOverride, Year};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Base versus astro pay scale projections.
///
/// Loads the base and astro wage tables, derives increases and
/// inflation-adjusted wages, and prints or charts them.
#[derive(Debug, Parser)]
#[command(name = "wage-projection", version)]
struct Cli {
    /// Base wage table (CSV).
    #[arg(long, global = true)]
    base: Option<PathBuf>,

    /// Astro wage table (CSV).
    #[arg(long, global = true)]
    astro: Option<PathBuf>,

    /// TOML scenario file with inputs, inflation and raises.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `wage_core=trace,info`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Suppress log output on the console.
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every wage, increase and real-wage grid.
    Report {
        /// Include the 60%-FTE grids.
        #[arg(long)]
        fte60: bool,
    },

    /// Override raise rates for one track and level, then print the report.
    ///
    /// Anything not given is asked for interactively.
    Raise {
        /// `astro` or `base`.
        #[arg(long)]
        track: Option<String>,

        /// `premaster`, `intermediate` or `candidate`.
        #[arg(long)]
        level: Option<String>,

        /// Years to override (default: the last three years with a raise).
        #[arg(long, value_delimiter = ',')]
        years: Option<Vec<Year>>,

        /// Percent raise per year, in the same order as the years.
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        rates: Vec<String>,
    },

    /// Override inflation rates, then print the report.
    Inflation {
        #[arg(long, value_delimiter = ',', required = true)]
        years: Vec<Year>,

        /// Percent inflation per year, in the same order as the years.
        #[arg(long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
        rates: Vec<String>,
    },

    /// Write a line chart of the wages as JSON.
    Chart {
        #[arg(value_enum)]
        kind: ChartKind,

        /// Output file.
        #[arg(long)]
        out: PathBuf,

        /// Include the 60%-FTE series.
        #[arg(long)]
        fte60: bool,

        /// Leave out the base real-wage series (real chart only).
        #[arg(long)]
        no_base: bool,

        /// Draw base-year base real wages as reference lines (real chart only).
        #[arg(long)]
        base_line: bool,

        /// Leave out the base-year astro reference lines (real chart only).
        #[arg(long)]
        no_astro_line: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ChartKind {
    /// Nominal wages.
    Gross,
    /// Inflation-adjusted wages in base-year dollars.
    Real,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    logging::init_logging();

    let cli = Cli::parse();

    let scenario = app::load_scenario(cli.config.as_deref())?;
    let settings = Settings::resolve(
        CliOverrides {
            base_wages: cli.base,
            astro_wages: cli.astro,
            log_level: cli.log_level,
            log_file: cli.log_file,
        },
        scenario,
    );
    logging::configure(
        settings.log_level.as_deref(),
        settings.log_file.as_deref(),
        cli.quiet,
    )?;

    debug!(
        base = %settings.base_wages.display(),
        astro = %settings.astro_wages.display(),
        base_year = settings.base_year,
        "loading wage tables"
    );
    let mut model = app::load_model(&settings)?;

    match cli.command {
        Command::Report { fte60 } => {
            print!("{}", app::render_report(&model, fte60));
        }

        Command::Raise {
            track,
            level,
            years,
            rates,
        } => {
            let years = years.unwrap_or_else(|| app::default_raise_years(&model));
            let answers = Prompter::new(io::stdin().lock(), io::stdout())
                .raise_answers(track, level, &years, rates)?;

            let adjustments = model.set_raise_rate(&answers.track, &answers.level, &answers.rates)?;
            for line in app::describe_adjustments(&adjustments) {
                println!("{line}");
            }
            print!("{}", app::render_report(&model, false));
        }

        Command::Inflation { years, rates } => {
            let update = InflationOverride::parse(&years, &rates)?;
            model.apply_inflation(&update)?;
            print!("{}", app::render_report(&model, false));
        }

        Command::Chart {
            kind,
            out,
            fte60,
            no_base,
            base_line,
            no_astro_line,
        } => {
            let figure = match kind {
                ChartKind::Gross => {
                    if no_base || base_line || no_astro_line {
                        warn!("--no-base, --base-line and --no-astro-line only affect the real chart");
                    }
                    chart::gross_wage_chart(model.snapshot(), fte60)
                }
                ChartKind::Real => chart::real_wage_chart(
                    model.snapshot(),
                    RealChartOptions {
                        base: !no_base,
                        fte60,
                        base_reference: base_line,
                        astro_reference: !no_astro_line,
                    },
                ),
            };
            app::write_chart(&figure, &out)?;
        }
    }

    Ok(())
}
