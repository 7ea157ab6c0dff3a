//! XY Plans CLI
//!
//! Runs a plan book through a portfolio and prints the consolidated timeline

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};

use xy_plans::plan::{diff_plan_irr, plan_irr};
use xy_plans::portfolio::{load_plan_book, TimelineRow, TimelineSummary};
use xy_plans::scenario::{distinct_pairings, reference_book, run_book, REFERENCE_MONTHS};
use xy_plans::rates::PERIODS_PER_YEAR;
use xy_plans::{PlanTuple, XYInterest};

#[derive(Parser, Debug)]
#[command(name = "xy-plans", version, about = "Consolidated cash flows of monthly XY plan issuance")]
struct Args {
    /// Months in the portfolio grid
    #[arg(long, default_value_t = REFERENCE_MONTHS)]
    duration: usize,

    /// CSV plan book (month,principal,x_rate,x_periods,y_rate,y_periods,annual_irr);
    /// the built-in reference book when omitted
    #[arg(long)]
    book: Option<PathBuf>,

    /// Grid month of the book's first month
    #[arg(long, default_value_t = 0)]
    from_month: usize,

    /// Calendar date of grid month 0 (YYYY-MM-DD), used to label rows
    #[arg(long)]
    origin: Option<NaiveDate>,

    /// Print a JSON document instead of tables
    #[arg(long)]
    json: bool,

    /// Also write the timeline to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Serialize)]
struct ScheduleReport {
    schedule: XYInterest,
    benchmark_irr: f64,
    /// Annualized plan IRR; None when no real rate exists
    plan_irr: Option<f64>,
    /// Annualized IRR of switching from the benchmark; None when undefined
    diff_irr: Option<f64>,
}

#[derive(Serialize)]
struct Report {
    duration: usize,
    plan_count: usize,
    schedules: Vec<ScheduleReport>,
    summary: TimelineSummary,
    timeline: Vec<TimelineRow>,
}

fn schedule_reports(book: &[Vec<PlanTuple>]) -> Result<Vec<ScheduleReport>> {
    let mut reports = Vec::new();

    for (schedule, benchmark_irr) in distinct_pairings(book) {
        let benchmark = XYInterest::benchmark(schedule.x_periods, schedule.y_periods, benchmark_irr)?;

        let plan_irr = match plan_irr(&schedule) {
            Ok(rate) => Some(rate * PERIODS_PER_YEAR),
            Err(e) => {
                log::warn!("No plan IRR for {:?}: {}", schedule, e);
                None
            }
        };
        let diff_irr = match diff_plan_irr(&schedule, &benchmark) {
            Ok(rate) => Some(rate),
            Err(e) => {
                log::warn!("No switch IRR for {:?}: {}", schedule, e);
                None
            }
        };

        reports.push(ScheduleReport {
            schedule,
            benchmark_irr,
            plan_irr,
            diff_irr,
        });
    }

    Ok(reports)
}

fn write_csv(path: &Path, rows: &[TimelineRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Unable to create {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn fmt_rate(rate: Option<f64>) -> String {
    rate.map(|r| format!("{:.4}%", r * 100.0))
        .unwrap_or_else(|| "undefined".to_string())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let book = match &args.book {
        Some(path) => load_plan_book(path)
            .with_context(|| format!("Failed to load plan book {}", path.display()))?,
        None => reference_book(),
    };

    let portfolio = run_book(&book, args.duration, args.from_month)?;
    let timeline = portfolio
        .timeline()
        .context("portfolio has no merged timeline")?;
    let rows = timeline.rows(args.origin);
    let summary = timeline.summary();
    let schedules = schedule_reports(&book)?;

    if let Some(path) = &args.csv {
        write_csv(path, &rows)?;
    }

    if args.json {
        let report = Report {
            duration: portfolio.duration(),
            plan_count: portfolio.records().len(),
            schedules,
            summary,
            timeline: rows,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("XY Plans v{}", env!("CARGO_PKG_VERSION"));
    println!("==============\n");
    println!("Plans: {} over a {}-month grid", portfolio.records().len(), portfolio.duration());
    println!();

    println!("{:>9} {:>4} {:>9} {:>4} {:>10} {:>12} {:>12}",
        "X rate", "X n", "Y rate", "Y n", "Benchmark", "Plan IRR", "Switch IRR");
    println!("{}", "-".repeat(68));
    for report in &schedules {
        println!("{:>9.5} {:>4} {:>9.5} {:>4} {:>9.2}% {:>12} {:>12}",
            report.schedule.x_rate,
            report.schedule.x_periods,
            report.schedule.y_rate,
            report.schedule.y_periods,
            report.benchmark_irr * 100.0,
            fmt_rate(report.plan_irr),
            fmt_rate(report.diff_irr),
        );
    }
    println!();

    println!("{:>5} {:>10} {:>16} {:>14} {:>16} {:>18}",
        "Month", "Date", "Principal", "Revenue", "PrincipalRet", "CumulativePV");
    println!("{}", "-".repeat(84));
    for row in &rows {
        let date = row.date.map(|d| d.format("%Y-%m").to_string()).unwrap_or_default();
        println!("{:>5} {:>10} {:>16.2} {:>14.2} {:>16.2} {:>18.2}",
            row.month,
            date,
            row.principal,
            row.revenue,
            row.principal_return,
            row.cumulative_present_value,
        );
    }

    println!("\nSummary:");
    println!("  Months: {}", summary.months);
    println!("  Total Principal: {:.2}", summary.total_principal);
    println!("  Total Revenue: {:.2}", summary.total_revenue);
    println!("  Total Principal Returned: {:.2}", summary.total_principal_return);
    println!("  Final Cumulative PV: {:.2}", summary.final_present_value);
    match summary.payback_month {
        Some(month) => println!("  Payback Month: {}", month),
        None => println!("  Payback Month: not reached"),
    }
    println!("  Peak Revenue: {:.2} (month {})", summary.peak_revenue, summary.peak_revenue_month);

    if let Some(path) = &args.csv {
        println!("\nTimeline written to: {}", path.display());
    }

    Ok(())
}
