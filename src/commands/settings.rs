// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::SqliteStore;
use crate::store::LedgerRepository;
use crate::utils::{fmt_amount, maybe_print_json, parse_amount, pretty_table};
use anyhow::Result;

pub fn handle(store: &SqliteStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(store, sub)?,
        Some(("set", sub)) => set(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn show(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let s = store.settings()?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    let opening = s
        .opening_balance
        .map(|b| fmt_amount(&b))
        .unwrap_or_else(|| "(not set)".into());
    let rows = vec![
        vec!["Owner".into(), store.owner().to_string()],
        vec!["Mosque name".into(), s.mosque_name],
        vec!["Mosque address".into(), s.mosque_address],
        vec!["Chairman".into(), s.chairman_name],
        vec!["Treasurer".into(), s.treasurer_name],
        vec!["Opening balance".into(), opening],
    ];
    println!("{}", pretty_table(&["Setting", "Value"], rows));
    Ok(())
}

/// Only the flags given are changed; everything else keeps its stored value.
fn set(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let mut s = store.settings()?;
    if let Some(v) = sub.get_one::<String>("mosque-name") {
        s.mosque_name = v.trim().to_string();
    }
    if let Some(v) = sub.get_one::<String>("mosque-address") {
        s.mosque_address = v.trim().to_string();
    }
    if let Some(v) = sub.get_one::<String>("chairman") {
        s.chairman_name = v.trim().to_string();
    }
    if let Some(v) = sub.get_one::<String>("treasurer") {
        s.treasurer_name = v.trim().to_string();
    }
    if let Some(v) = sub.get_one::<String>("opening-balance") {
        // may be negative when the account starts overdrawn
        s.opening_balance = Some(parse_amount(v)?);
    }
    store.update_settings(&s)?;
    println!("Settings saved for '{}'", store.owner());
    Ok(())
}
