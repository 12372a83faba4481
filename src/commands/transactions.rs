// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{NewTransaction, SqliteStore, TransactionPatch};
use crate::models::EntryType;
use crate::store::LedgerRepository;
use crate::utils::{
    fmt_amount, maybe_print_json, now_local, parse_amount, parse_date, parse_datetime,
    pretty_table,
};
use anyhow::{Result, anyhow};
use serde::Serialize;

pub fn handle(store: &SqliteStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            store.delete_transaction(id.trim())?;
            println!("Removed transaction {}", id.trim());
        }
        _ => {}
    }
    Ok(())
}

fn add(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_datetime(s)?,
        None => now_local(),
    };
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let sc = store.find_sub_category(sub.get_one::<String>("sub-category").unwrap())?;
    let r#type = sub
        .get_one::<String>("type")
        .map(|s| s.parse::<EntryType>().map_err(|e| anyhow!(e)))
        .transpose()?;
    let description = sub.get_one::<String>("description").cloned().unwrap_or_default();

    let tx = store.add_transaction(NewTransaction {
        r#type,
        amount,
        date,
        description,
        sub_category_id: sc.id.clone(),
    })?;
    println!(
        "Recorded {} {} on {} under '{}' (id: {})",
        tx.r#type,
        fmt_amount(&tx.amount),
        tx.date.format("%Y-%m-%d %H:%M"),
        sc.name,
        tx.id
    );
    Ok(())
}

fn edit(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let sub_category_id = match sub.get_one::<String>("sub-category") {
        Some(s) => Some(store.find_sub_category(s)?.id),
        None => None,
    };
    let patch = TransactionPatch {
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_amount(s))
            .transpose()?,
        date: sub
            .get_one::<String>("date")
            .map(|s| parse_datetime(s))
            .transpose()?,
        description: sub.get_one::<String>("description").cloned(),
        sub_category_id,
    };
    let tx = store.update_transaction(id, patch)?;
    println!(
        "Updated transaction {}: {} {} on {}",
        tx.id,
        tx.r#type,
        fmt_amount(&tx.amount),
        tx.date.format("%Y-%m-%d %H:%M")
    );
    Ok(())
}

fn list(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.r#type.clone(),
                    r.category.clone(),
                    r.sub_category.clone(),
                    r.description.clone(),
                    fmt_amount(&r.amount),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Type", "Category", "Sub-category", "Description", "Amount", "Id"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub r#type: String,
    pub category: String,
    pub sub_category: String,
    pub description: String,
    pub amount: rust_decimal::Decimal,
}

/// Transactions newest first, filtered by the `list` flags.
pub fn query_rows(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let from = sub.get_one::<String>("from").map(|s| parse_date(s)).transpose()?;
    let to = sub.get_one::<String>("to").map(|s| parse_date(s)).transpose()?;
    let only = sub
        .get_one::<String>("type")
        .map(|s| s.parse::<EntryType>().map_err(|e| anyhow!(e)))
        .transpose()?;
    let limit = sub.get_one::<usize>("limit").copied();

    let snap = store.snapshot()?;
    let mut txs: Vec<_> = snap
        .transactions
        .iter()
        .filter(|t| from.is_none_or(|d| t.date.date() >= d))
        .filter(|t| to.is_none_or(|d| t.date.date() <= d))
        .filter(|t| only.is_none_or(|k| t.r#type == k))
        .collect();
    // newest first; ties show the later entry first
    txs.reverse();
    txs.sort_by(|a, b| b.date.cmp(&a.date));
    if let Some(n) = limit {
        txs.truncate(n);
    }

    let data = txs
        .into_iter()
        .map(|t| {
            let sc = snap.sub_categories.iter().find(|s| s.id == t.sub_category_id);
            let cat = sc.and_then(|s| snap.categories.iter().find(|c| c.id == s.parent_id));
            TransactionRow {
                id: t.id.clone(),
                date: t.date.format("%Y-%m-%d %H:%M").to_string(),
                r#type: t.r#type.to_string(),
                category: cat.map(|c| c.name.clone()).unwrap_or_default(),
                sub_category: sc
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| "(missing)".into()),
                description: t.description.clone(),
                amount: t.amount,
            }
        })
        .collect();
    Ok(data)
}
