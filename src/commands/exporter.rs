// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{SqliteStore, format_stored_date};
use crate::store::LedgerRepository;
use anyhow::{Result, bail};
use serde_json::json;

pub fn handle(store: &SqliteStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(store, sub),
        _ => Ok(()),
    }
}

fn export_transactions(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let snap = store.snapshot()?;
    // chronological, storage order on ties
    let mut txs: Vec<_> = snap.transactions.iter().collect();
    txs.sort_by_key(|t| t.date);

    let rows = txs.into_iter().map(|t| {
        let sc = snap.sub_categories.iter().find(|s| s.id == t.sub_category_id);
        let cat = sc.and_then(|s| snap.categories.iter().find(|c| c.id == s.parent_id));
        (
            t,
            cat.map(|c| c.name.clone()).unwrap_or_default(),
            sc.map(|s| s.name.clone()).unwrap_or_default(),
        )
    });

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record([
            "date", "type", "amount", "category", "sub_category", "description", "id",
        ])?;
        for (t, cat, sc) in rows {
            wtr.write_record([
                format_stored_date(&t.date),
                t.r#type.to_string(),
                t.amount.to_string(),
                cat,
                sc,
                t.description.clone(),
                t.id.clone(),
            ])?;
        }
        wtr.flush()?;
    } else {
        let items: Vec<_> = rows
            .map(|(t, cat, sc)| {
                json!({
                    "id": t.id, "date": format_stored_date(&t.date), "type": t.r#type,
                    "amount": t.amount.to_string(), "category": cat, "sub_category": sc,
                    "description": t.description
                })
            })
            .collect();
        std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
    }
    tracing::info!(path = out, format = %fmt, "transactions exported");
    println!("Exported transactions to {}", out);
    Ok(())
}
