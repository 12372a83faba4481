// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::SqliteStore;
use crate::models::Settings;
use crate::period::{Period, ReportKind, resolve_period, resolve_range};
use crate::render::{render_statement, write_statement_csv};
use crate::report::{ReportBuilder, ReportInput, ReportModel, ReportPolicy};
use crate::store::LedgerRepository;
use crate::summary::overview;
use crate::utils::{fmt_amount, maybe_print_json, now_local, parse_date, pretty_table};
use anyhow::{Context, Result, anyhow};
use chrono::NaiveTime;
use std::fs::File;

pub fn handle(store: &SqliteStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("statement", sub)) => statement(store, sub)?,
        Some(("overview", sub)) => overview_cmd(store, sub)?,
        _ => {}
    }
    Ok(())
}

/// Resolve the window from `--kind`/`--date` or an explicit `--from`/`--to`.
pub fn period_from_args(sub: &clap::ArgMatches) -> Result<Period> {
    if let (Some(from), Some(to)) = (
        sub.get_one::<String>("from"),
        sub.get_one::<String>("to"),
    ) {
        return Ok(resolve_range(parse_date(from)?, parse_date(to)?)?);
    }
    let kind = sub
        .get_one::<String>("kind")
        .map(|s| s.parse::<ReportKind>().map_err(|e| anyhow!(e)))
        .transpose()?
        .unwrap_or(ReportKind::Monthly);
    let reference = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?.and_time(NaiveTime::MIN),
        None => now_local(),
    };
    Ok(resolve_period(kind, reference))
}

/// Build the statement the `statement` subcommand would print.
pub fn statement_model(
    store: &SqliteStore,
    sub: &clap::ArgMatches,
) -> Result<(ReportModel, Settings)> {
    let period = period_from_args(sub)?;
    let policy = if sub.get_flag("strict") {
        ReportPolicy::strict()
    } else {
        ReportPolicy::default()
    };
    let snap = store.snapshot()?;
    let model = ReportBuilder::new(policy).build(&period, ReportInput::from(&snap))?;
    tracing::info!(
        period = %model.period_label,
        within = model.within_count,
        excluded = model.excluded.len(),
        "statement built"
    );
    for e in &model.excluded {
        tracing::warn!(%e, "transaction left out of statement");
    }
    Ok((model, snap.settings))
}

fn statement(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let (model, settings) = statement_model(store, sub)?;

    if let Some(path) = sub.get_one::<String>("csv") {
        let path = path.trim();
        let file = File::create(path).with_context(|| format!("Create {}", path))?;
        write_statement_csv(&model, file)?;
        println!("Wrote statement to {}", path);
        return Ok(());
    }
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &model)? {
        return Ok(());
    }
    print!("{}", render_statement(&model, &settings, sub.get_flag("detail")));
    Ok(())
}

fn overview_cmd(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let recent = *sub.get_one::<usize>("recent").unwrap_or(&5);
    let snap = store.snapshot()?;
    let ov = overview(&snap, recent)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &ov)? {
        return Ok(());
    }
    println!(
        "{}",
        pretty_table(
            &["Opening", "Income", "Expense", "Balance"],
            vec![vec![
                fmt_amount(&ov.opening_balance),
                fmt_amount(&ov.total_income),
                fmt_amount(&ov.total_expense),
                fmt_amount(&ov.balance),
            ]],
        )
    );
    if ov.recent.is_empty() {
        println!("No transactions recorded yet.");
        return Ok(());
    }
    let rows = ov
        .recent
        .iter()
        .map(|t| {
            let sub_name = snap
                .sub_categories
                .iter()
                .find(|s| s.id == t.sub_category_id)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| "(missing)".into());
            vec![
                t.date.format("%Y-%m-%d").to_string(),
                t.r#type.to_string(),
                sub_name,
                t.description.clone(),
                fmt_amount(&t.amount),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Date", "Type", "Sub-category", "Description", "Amount"], rows)
    );
    Ok(())
}
