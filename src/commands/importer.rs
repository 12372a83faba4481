// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{NewTransaction, SqliteStore};
use crate::models::{EntryType, SubCategory};
use crate::utils::{parse_amount, parse_datetime};
use anyhow::{Context, Result, anyhow};
use csv::ReaderBuilder;
use rusqlite::Connection;
use std::collections::{HashMap, hash_map::Entry};

pub fn handle(conn: &mut Connection, owner: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(conn, owner, sub),
        _ => Ok(()),
    }
}

/// Columns: date,type,amount,category,sub_category,description. Either every
/// row is imported or none is.
fn import_transactions(conn: &mut Connection, owner: &str, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut count = 0usize;
    {
        let store = SqliteStore::new(&tx, owner);
        let mut sub_cache: HashMap<(String, String), SubCategory> = HashMap::new();

        for (i, result) in rdr.records().enumerate() {
            let line = i + 2; // header is line 1
            let rec = result?;
            let date_raw = rec.get(0).context("date missing")?.trim();
            let type_raw = rec.get(1).unwrap_or("").trim();
            let amount_raw = rec.get(2).context("amount missing")?.trim();
            let category = rec.get(3).context("category missing")?.trim().to_string();
            let sub_name = rec.get(4).context("sub_category missing")?.trim().to_string();
            let description = rec.get(5).unwrap_or("").trim().to_string();

            let date = parse_datetime(date_raw).with_context(|| format!("Line {}", line))?;
            let amount = parse_amount(amount_raw).with_context(|| format!("Line {}", line))?;
            let r#type = if type_raw.is_empty() {
                None
            } else {
                Some(
                    type_raw
                        .parse::<EntryType>()
                        .map_err(|e| anyhow!("Line {}: {}", line, e))?,
                )
            };

            let sc = match sub_cache.entry((category.clone(), sub_name.clone())) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let found = store
                        .find_sub_category(&format!("{}/{}", category, sub_name))
                        .with_context(|| format!("Line {}", line))?;
                    entry.insert(found)
                }
            };

            store
                .add_transaction(NewTransaction {
                    r#type,
                    amount,
                    date,
                    description,
                    sub_category_id: sc.id.clone(),
                })
                .with_context(|| format!("Line {}", line))?;
            count += 1;
        }
    }
    tx.commit()?;
    tracing::info!(path, count, "transactions imported");
    println!("Imported {} transactions from {}", count, path);
    Ok(())
}
