//! Table and JSON rendering for command results.

use anyhow::Result;
use prettytable::{Table, format, row};
use serde::Serialize;
use tokenomics_lab_domain::prelude::*;
use tokenomics_lab_simulation::prelude::*;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table
}

pub fn print_timeline(model: &Tokenomics, timeline: &[ReleasePoint]) {
    let mut table = new_table();
    let mut titles = row!["Month"];
    for allocation in model.allocations() {
        titles.add_cell(prettytable::Cell::new(&allocation.category));
    }
    titles.add_cell(prettytable::Cell::new("Circulating"));
    titles.add_cell(prettytable::Cell::new("% Supply"));
    table.set_titles(titles);

    for point in timeline {
        let mut r = row![point.month];
        for release in &point.releases {
            r.add_cell(prettytable::Cell::new(&format!("{:.0}", release.tokens)));
        }
        r.add_cell(prettytable::Cell::new(&format!("{:.0}", point.total_released)));
        r.add_cell(prettytable::Cell::new(&format!("{:.2}", point.circulating_percent)));
        table.add_row(r);
    }
    table.printstd();
}

pub fn print_path(prices: &[Price]) {
    let mut table = new_table();
    table.set_titles(row!["Period", "Price"]);
    for (period, price) in prices.iter().enumerate() {
        table.add_row(row![period, format!("{:.8}", price.value)]);
    }
    table.printstd();
}

pub fn print_ensemble(result: &EnsembleResult) {
    println!(
        "\n📊 Monte Carlo Results ({} paths)",
        result.iterations()
    );
    let mut table = new_table();
    table.set_titles(row!["Period", "Mean", "Median", "Min", "Max"]);
    for stats in &result.period_stats {
        table.add_row(row![
            stats.period,
            format!("{:.6}", stats.mean),
            format!("{:.6}", stats.median),
            format!("{:.6}", stats.min),
            format!("{:.6}", stats.max)
        ]);
    }
    table.printstd();
    print_terminal(&result.terminal);
}

fn print_terminal(terminal: &TerminalStats) {
    println!("════════════════════════════════════");
    println!("Terminal mean:   {:.6}", terminal.mean);
    println!("Terminal median: {:.6}", terminal.median);
    println!("Terminal p95:    {:.6}", terminal.p95);
    println!("════════════════════════════════════");
}

#[derive(Serialize)]
pub struct ScenarioSummary<'a> {
    scenario: MarketScenario,
    growth_bias: f64,
    terminal: &'a TerminalStats,
}

pub fn scenario_summaries(results: &[ScenarioResult]) -> Vec<ScenarioSummary<'_>> {
    results
        .iter()
        .map(|r| ScenarioSummary {
            scenario: r.scenario,
            growth_bias: r.scenario.growth_bias(),
            terminal: &r.ensemble.terminal,
        })
        .collect()
}

pub fn print_scenarios(results: &[ScenarioResult]) {
    println!("\n📊 Market Scenarios");
    let mut table = new_table();
    table.set_titles(row!["Scenario", "Bias", "Mean", "Median", "p95"]);
    for result in results {
        let terminal = &result.ensemble.terminal;
        table.add_row(row![
            result.scenario,
            format!("{:+.2}", result.scenario.growth_bias()),
            format!("{:.6}", terminal.mean),
            format!("{:.6}", terminal.median),
            format!("{:.6}", terminal.p95)
        ]);
    }
    table.printstd();
}

pub fn print_quote(quote: &TradeQuote) {
    println!("\n🔄 Constant Product Trade");
    println!("════════════════════════════════════");
    println!("k:                  {}", quote.k);
    println!("New token reserve:  {}", quote.new_token_reserve);
    println!("New paired reserve: {:.8}", quote.new_paired_reserve);
    println!("Received:           {:.8}", quote.tokens_received);
    println!("Spot price:         {:.8}", quote.no_slippage_price);
    println!("Execution price:    {:.8}", quote.actual_price);
    println!("Slippage:           {:.4}%", quote.slippage_percent);
    println!("════════════════════════════════════");
}

pub fn print_forecast(result: &ForecastResult, confidence_pct: f64) {
    println!(
        "\n🔮 AR({}) forecast, sigma {:.6}, {}% band (z = {:.4})",
        result.model.order(),
        result.model.sigma,
        confidence_pct,
        result.z
    );
    let mut table = new_table();
    table.set_titles(row!["Period", "Lower", "Point", "Upper"]);
    for p in &result.points {
        table.add_row(row![
            p.period,
            format!("{:.6}", p.lower),
            format!("{:.6}", p.point),
            format!("{:.6}", p.upper)
        ]);
    }
    table.printstd();
}

pub fn print_matrix(matrix: &[Vec<f64>]) {
    let mut table = new_table();
    let mut titles = row![""];
    for i in 0..matrix.len() {
        titles.add_cell(prettytable::Cell::new(&format!("S{}", i + 1)));
    }
    table.set_titles(titles);

    for (i, values) in matrix.iter().enumerate() {
        let mut r = row![format!("S{}", i + 1)];
        for value in values {
            r.add_cell(prettytable::Cell::new(&format!("{value:.4}")));
        }
        table.add_row(r);
    }
    table.printstd();
}
