//! Report command - full login, fetch, aggregate and logout run

use std::collections::BTreeSet;
use std::io;

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use serde::Serialize;

use bankfold_core::services::Report;
use bankfold_core::BalancePolicy;

use super::{get_context, parse_window, GlobalOpts};
use crate::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
    Csv,
}

pub fn run(
    opts: GlobalOpts,
    from: Option<String>,
    to: Option<String>,
    strict_balance: bool,
    format: ReportFormat,
) -> Result<()> {
    let window = parse_window(from.as_deref(), to.as_deref())?;
    let policy = if strict_balance {
        BalancePolicy::RequireBoth
    } else {
        BalancePolicy::MissingAsZero
    };
    let ctx = get_context(opts)?;

    let progress = (format == ReportFormat::Table && atty::is(atty::Stream::Stdout)).then(|| {
        let pb = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}") {
            pb.set_style(style);
        }
        pb
    });

    let report = ctx.report_service.run_with_progress(window, policy, |p| {
        if let Some(pb) = &progress {
            pb.set_length(p.total as u64);
            pb.set_position((p.index - 1) as u64);
            pb.set_message(format!("{} {}", p.source, p.number));
        }
    });
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    match format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Csv => write_csv(&report, io::stdout())?,
        ReportFormat::Table => print_table(&report),
    }

    if !report.logged_in {
        anyhow::bail!("Login failed, no data was fetched");
    }
    Ok(())
}

/// One CSV line per account
#[derive(Debug, Serialize)]
struct TotalsRow<'a> {
    account: &'a str,
    movements: usize,
    expenses: Option<Decimal>,
    credits: Option<Decimal>,
    balance: Option<Decimal>,
}

fn report_rows(report: &Report) -> Vec<TotalsRow<'_>> {
    let ids: BTreeSet<&str> = report
        .totals
        .account_ids()
        .into_iter()
        .chain(report.movements.keys().map(String::as_str))
        .collect();

    ids.into_iter()
        .map(|id| TotalsRow {
            account: id,
            movements: report.movement_count(id),
            expenses: report.totals.expenses.get(id).copied(),
            credits: report.totals.credits.get(id).copied(),
            balance: report.totals.balance.get(id).copied(),
        })
        .collect()
}

const CSV_HEADER: [&str; 5] = ["account", "movements", "expenses", "credits", "balance"];

fn write_csv<W: io::Write>(report: &Report, out: W) -> Result<()> {
    // Header even when there are no rows
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    writer.write_record(CSV_HEADER)?;
    for row in report_rows(report) {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn print_table(report: &Report) {
    println!(
        "{} {} ({})",
        "Report:".bold(),
        report.provider,
        report.window
    );
    println!();

    println!("{}", "User".bold());
    output::print_object(&report.info);
    println!();

    if !report.accounts.is_empty() {
        let mut table = output::create_table();
        table.set_header(vec!["Account", "Name", "Currency", "Balance"]);
        for account in &report.accounts {
            table.add_row(vec![
                comfy_table::Cell::new(account.number.as_deref().unwrap_or("-")),
                comfy_table::Cell::new(account.name.as_deref().unwrap_or("")),
                comfy_table::Cell::new(account.currency_or_default()),
                output::amount_cell(account.balance),
            ]);
        }
        println!("{table}");
    }

    if !report.credit_cards.is_empty() {
        let mut table = output::create_table();
        table.set_header(vec!["Card", "Name", "Currency", "Local balance", "Dollar balance"]);
        for card in &report.credit_cards {
            table.add_row(vec![
                comfy_table::Cell::new(card.number.as_deref().unwrap_or("-")),
                comfy_table::Cell::new(card.name.as_deref().unwrap_or("")),
                comfy_table::Cell::new(card.currency_or_default()),
                output::amount_cell(card.balance_local),
                output::amount_cell(card.balance_dollar),
            ]);
        }
        println!("{table}");
    }

    let rows = report_rows(report);
    if rows.is_empty() {
        output::warning("No movements found.");
    } else {
        let mut table = output::create_table();
        table.set_header(vec!["Account", "Movements", "Expenses", "Credits", "Balance"]);
        for row in &rows {
            table.add_row(vec![
                comfy_table::Cell::new(row.account),
                comfy_table::Cell::new(row.movements),
                output::amount_cell(row.expenses),
                output::amount_cell(row.credits),
                output::balance_cell(row.balance),
            ]);
        }
        println!("{table}");
        println!(
            "  Total expenses: {}   Total credits: {}",
            output::format_amount(Some(report.totals.total_expenses())),
            output::format_amount(Some(report.totals.total_credits()))
        );
    }

    if !report.warnings.is_empty() {
        println!();
        for warning in &report.warnings {
            output::warning(&format!("Warning: {}", warning));
        }
    }
    if report.logged_in && !report.logged_out {
        output::warning("Warning: logout failed, the session may still be open");
    }
}
