//! Command Line Interface for TokenomicsLab.
mod config;
mod output;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use config::CliConfig;
use dotenv::dotenv;
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;
use tokenomics_lab_domain::prelude::*;
use tokenomics_lab_simulation::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tokenomics-lab")]
#[command(about = "Token economy design and simulation toolkit", long_about = None)]
struct Cli {
    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cumulative vesting release at a given month
    Vesting {
        /// Schedule as month:percent pairs (e.g., 0:10,6:20,12:30)
        #[arg(long, value_delimiter = ',', value_parser = parse_entry, required = true)]
        schedule: Vec<VestingEntry>,

        /// Month to evaluate
        #[arg(short, long)]
        month: u32,

        /// Total token supply, to report released tokens
        #[arg(long, requires = "category_percent")]
        total_supply: Option<Decimal>,

        /// Category share of total supply (0-100)
        #[arg(long, requires = "total_supply")]
        category_percent: Option<Decimal>,
    },
    /// Month-by-month release timeline from a JSON tokenomics file
    Release {
        /// Path to the tokenomics JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Last month to report
        #[arg(long, default_value_t = 48)]
        months: u32,

        /// Report every N months
        #[arg(long, default_value_t = 6)]
        step: u32,
    },
    /// Simulate a single price path
    PricePath {
        #[command(flatten)]
        path: PathArgs,
    },
    /// Monte Carlo ensemble of price paths
    MonteCarlo {
        #[command(flatten)]
        path: PathArgs,

        /// Number of paths (defaults to TOKENOMICS_MC_PATHS or 100)
        #[arg(long)]
        paths: Option<usize>,

        /// Run bear/base/bull uniform-shock scenarios instead
        #[arg(long)]
        scenarios: bool,
    },
    /// Quote selling tokens into a constant-product pool
    Trade {
        /// Token reserve of the pool
        #[arg(long)]
        token_reserve: Decimal,

        /// Paired asset reserve of the pool
        #[arg(long)]
        paired_reserve: Decimal,

        /// Tokens sold into the pool
        #[arg(long)]
        amount: Decimal,
    },
    /// Autoregressive price forecast
    Forecast {
        /// Historical prices, oldest first (comma separated)
        #[arg(long, value_delimiter = ',', required = true)]
        prices: Vec<f64>,

        /// Periods to forecast
        #[arg(long, default_value_t = 12)]
        horizon: usize,

        /// Confidence level in percent (defaults to TOKENOMICS_CONFIDENCE or 95)
        #[arg(long)]
        confidence: Option<f64>,

        /// AR order 1-5 (defaults to TOKENOMICS_AR_ORDER or 1)
        #[arg(long)]
        order: Option<usize>,
    },
    /// Discounted cash flow valuation
    Dcf {
        /// Five yearly cash flows (comma separated)
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true, required = true)]
        cash_flows: Vec<Decimal>,

        /// Discount rate as a decimal (0.2 = 20%)
        #[arg(long, allow_negative_numbers = true)]
        rate: Decimal,

        /// Terminal value multiple of the year-5 cash flow
        #[arg(long, default_value = "10")]
        multiple: Decimal,
    },
    /// TAM / SAM / SOM market sizing
    MarketSize {
        /// Total addressable market
        #[arg(long)]
        tam: Decimal,

        /// Serviceable share of TAM (0-100)
        #[arg(long)]
        sam_percent: Decimal,

        /// Obtainable share of SAM (0-100)
        #[arg(long)]
        som_percent: Decimal,
    },
    /// Relative Strength Index of a price series
    Rsi {
        /// Prices, oldest first (comma separated)
        #[arg(long, value_delimiter = ',', required = true)]
        prices: Vec<Decimal>,

        /// Lookback period
        #[arg(long, default_value_t = 14)]
        period: usize,
    },
    /// Correlation matrix of several series
    Correlation {
        /// One series per flag, values comma separated
        #[arg(long = "series", required = true, num_args = 1, allow_hyphen_values = true)]
        series: Vec<String>,
    },
}

#[derive(clap::Args)]
struct PathArgs {
    /// Initial price
    #[arg(long)]
    initial_price: Decimal,

    /// Mean return per period
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    drift: f64,

    /// Return standard deviation per period
    #[arg(long, default_value_t = 0.05)]
    volatility: f64,

    /// Number of periods
    #[arg(long, default_value_t = 12)]
    periods: usize,

    /// Random seed (defaults to TOKENOMICS_SEED)
    #[arg(long)]
    seed: Option<u64>,
}

impl PathArgs {
    fn to_config(&self, defaults: &CliConfig) -> PricePathConfig {
        let config = PricePathConfig::new(self.initial_price)
            .with_drift(self.drift)
            .with_volatility(self.volatility)
            .with_periods(self.periods);
        match self.seed.or(defaults.seed) {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let defaults = CliConfig::from_env().context("invalid environment configuration")?;

    match &cli.command {
        Commands::Vesting {
            schedule,
            month,
            total_supply,
            category_percent,
        } => {
            let schedule = VestingSchedule::new(schedule.clone())?;
            let percent = accumulate_vesting(schedule.entries(), *month);
            let tokens = match (total_supply, category_percent) {
                (Some(supply), Some(share)) => {
                    let allocation = category_allocation(*supply, *share)?;
                    Some(released_tokens(schedule.entries(), *month, allocation)?)
                }
                _ => None,
            };

            if cli.json {
                output::print_json(&serde_json::json!({
                    "month": month,
                    "cumulative_percent": percent,
                    "released_tokens": tokens,
                    "schedule_total_percent": schedule.total_percent(),
                }))?;
            } else {
                println!("📅 Month {month}: {percent}% released");
                if let Some(tokens) = tokens {
                    println!("🪙 Released tokens: {tokens:.2}");
                }
                if !schedule.is_fully_allocated() {
                    println!(
                        "⚠️  Schedule releases {}% in total",
                        schedule.total_percent()
                    );
                }
            }
        }
        Commands::Release { file, months, step } => {
            let raw = fs::read_to_string(file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let model: Tokenomics = serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse {}", file.display()))?;
            info!(
                categories = model.allocations().len(),
                months, "Building release timeline"
            );

            let step = (*step).max(1);
            let timeline: Vec<ReleasePoint> = model
                .release_timeline(*months)?
                .into_iter()
                .filter(|p| p.month % step == 0 || p.month == *months)
                .collect();

            if cli.json {
                output::print_json(&timeline)?;
            } else {
                println!(
                    "📦 Total supply {} across {} categories ({}% distributed)",
                    model.total_supply(),
                    model.allocations().len(),
                    model.distributed_percent()
                );
                output::print_timeline(&model, &timeline);
            }
        }
        Commands::PricePath { path } => {
            let config = path.to_config(&defaults);
            let prices = simulate_price_path(&config)?;

            if cli.json {
                output::print_json(&prices)?;
            } else {
                output::print_path(&prices);
            }
        }
        Commands::MonteCarlo {
            path,
            paths,
            scenarios,
        } => {
            let config = path.to_config(&defaults);
            let num_paths = paths.unwrap_or(defaults.mc_paths);
            info!(
                paths = num_paths,
                periods = config.periods,
                scenarios = *scenarios,
                "Running Monte Carlo simulation"
            );

            if *scenarios {
                let results = simulate_market_scenarios(&config, num_paths)?;
                if cli.json {
                    output::print_json(&output::scenario_summaries(&results))?;
                } else {
                    output::print_scenarios(&results);
                }
            } else {
                let result = simulate_price_ensemble(&config, num_paths)?;
                if cli.json {
                    output::print_json(&serde_json::json!({
                        "period_stats": result.period_stats,
                        "terminal": result.terminal,
                    }))?;
                } else {
                    output::print_ensemble(&result);
                }
            }
        }
        Commands::Trade {
            token_reserve,
            paired_reserve,
            amount,
        } => {
            let pool = LiquidityPool::new(*token_reserve, *paired_reserve)?;
            let quote = pool.quote_sell(*amount)?;

            if cli.json {
                output::print_json(&quote)?;
            } else {
                output::print_quote(&quote);
            }
        }
        Commands::Forecast {
            prices,
            horizon,
            confidence,
            order,
        } => {
            let config = ForecastConfig::new(*horizon, confidence.unwrap_or(defaults.confidence_pct))
                .with_ar_order(order.unwrap_or(defaults.ar_order));
            let result = forecast_prices(prices, &config)?;

            if cli.json {
                output::print_json(&result)?;
            } else {
                output::print_forecast(&result, config.confidence_pct);
            }
        }
        Commands::Dcf {
            cash_flows,
            rate,
            multiple,
        } => {
            let valuation = dcf_value(cash_flows, *rate, *multiple)?;

            if cli.json {
                output::print_json(&valuation)?;
            } else {
                println!("\n💰 DCF Valuation");
                println!("════════════════════════════════════");
                println!("Discounted cash flows: {:.2}", valuation.npv);
                println!("Terminal value:        {:.2}", valuation.terminal_value);
                println!("Discounted terminal:   {:.2}", valuation.discounted_terminal);
                println!("Total valuation:       {:.2}", valuation.total);
                println!("════════════════════════════════════");
            }
        }
        Commands::MarketSize {
            tam,
            sam_percent,
            som_percent,
        } => {
            let funnel = MarketFunnel::new(*tam, *sam_percent, *som_percent)?;

            if cli.json {
                output::print_json(&funnel)?;
            } else {
                println!("🎯 TAM: {:.2}", funnel.tam);
                println!("   SAM: {:.2}", funnel.sam);
                println!("   SOM: {:.2} ({:.4}% of TAM)", funnel.som, funnel.obtainable_share());
            }
        }
        Commands::Rsi { prices, period } => {
            let rsi = relative_strength_index(prices, *period)?;

            if cli.json {
                output::print_json(&serde_json::json!({ "period": period, "rsi": rsi }))?;
            } else {
                println!("📈 RSI({period}): {rsi:.2}");
            }
        }
        Commands::Correlation { series } => {
            let parsed = series
                .iter()
                .map(|s| parse_series(s.as_str()))
                .collect::<Result<Vec<_>>>()?;
            let matrix = correlation_matrix(&parsed)?;

            if cli.json {
                output::print_json(&matrix)?;
            } else {
                output::print_matrix(&matrix);
            }
        }
    }

    Ok(())
}

/// Parses a `month:percent` vesting entry.
fn parse_entry(s: &str) -> Result<VestingEntry, String> {
    let (month, percent) = s
        .split_once(':')
        .ok_or_else(|| format!("expected month:percent, got '{s}'"))?;
    let month = month
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid month '{month}': {e}"))?;
    let percent = percent
        .trim()
        .parse::<Decimal>()
        .map_err(|e| format!("invalid percent '{percent}': {e}"))?;
    Ok(VestingEntry::new(month, percent))
}

fn parse_series(s: &str) -> Result<Vec<f64>> {
    let values = s
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .with_context(|| format!("invalid number '{v}'"))
        })
        .collect::<Result<Vec<_>>>()?;
    if values.is_empty() {
        bail!("empty series");
    }
    Ok(values)
}
