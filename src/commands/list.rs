use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use serde::Serialize;

use crate::core::config::Config;
use crate::core::process_monitor::{
    query, FilterCriteria, ProcSource, ProcessSnapshot, QueryField, SnapshotBuilder, SortMode,
    SystemTotals,
};
use crate::ui::formatters::{format_cpu_time, format_memory_mb, format_percent, format_timestamp};

#[derive(Debug, Clone, PartialEq)]
pub struct ListOptions {
    pub criteria: FilterCriteria,
    pub sort_mode: SortMode,
    pub limit: Option<usize>,
    pub json: bool,
}

impl ListOptions {
    /// Read flags, falling back to the configured sort mode
    pub fn from_matches(matches: &ArgMatches, config: &Config) -> Result<Self> {
        let field = match matches.get_one::<String>("by") {
            Some(value) => value.parse::<QueryField>().map_err(anyhow::Error::msg)?,
            None => QueryField::Name,
        };
        let sort_mode = match matches.get_one::<String>("sort") {
            Some(value) => value.parse::<SortMode>().map_err(anyhow::Error::msg)?,
            None => config.sort_mode,
        };

        Ok(Self {
            criteria: FilterCriteria {
                query: matches.get_one::<String>("query").cloned().unwrap_or_default(),
                field,
                min_cpu_seconds: matches.get_one::<f64>("min-cpu").copied().unwrap_or(0.0),
                min_memory_mb: matches.get_one::<f64>("min-mem").copied().unwrap_or(0.0),
            },
            sort_mode,
            limit: matches.get_one::<usize>("limit").copied(),
            json: matches.get_flag("json"),
        })
    }
}

/// Parse a `--min-cpu`/`--min-mem` threshold: finite and not negative
pub fn parse_threshold(value: &str) -> std::result::Result<f64, String> {
    let threshold = value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(format!("'{}' must be a finite number >= 0", value));
    }
    Ok(threshold)
}

/// One-shot listing: the filtered rows plus the unfiltered totals
#[derive(Debug, Clone, Serialize)]
pub struct ListReport {
    pub timestamp: i64,
    pub totals: SystemTotals,
    pub processes: Vec<ProcessSnapshot>,
}

/// Sample once and apply the options
pub fn collect<S: ProcSource>(
    builder: &SnapshotBuilder<S>,
    options: &ListOptions,
) -> Result<ListReport> {
    let sample = builder.build().context("Failed to sample the process table")?;

    let mut processes = query::apply(&sample.processes, &options.criteria, options.sort_mode);
    if let Some(limit) = options.limit {
        processes.truncate(limit);
    }

    Ok(ListReport {
        timestamp: sample.timestamp,
        totals: sample.totals,
        processes,
    })
}

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = Config::load()?;
    let options = ListOptions::from_matches(matches, &config)?;
    let report = collect(&SnapshotBuilder::procfs(), &options)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &ListReport) {
    let totals = &report.totals;
    println!(
        "{}  CPU {}  MEM {}  {} processes",
        format_timestamp(report.timestamp).dimmed(),
        format_percent(totals.cpu_utilization_percent).cyan().bold(),
        format_percent(totals.memory_utilization_percent).cyan().bold(),
        totals.process_count
    );
    println!();

    if report.processes.is_empty() {
        println!("{}", "No matching processes.".dimmed());
        return;
    }

    println!(
        "{}",
        format!("{:>8}  {:<24} {:>12} {:>12}", "PID", "NAME", "CPU TIME", "MEMORY")
            .white()
            .bold()
    );

    for proc in &report.processes {
        println!(
            "{:>8}  {:<24} {:>12} {:>12}",
            proc.pid.to_string().yellow(),
            truncate_name(&proc.name, 24),
            format_cpu_time(proc.cpu_seconds),
            format_memory_mb(proc.memory_mb).green()
        );
    }
}

fn truncate_name(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        name.to_string()
    } else {
        let mut short: String = name.chars().take(width.saturating_sub(1)).collect();
        short.push('…');
        short
    }
}
