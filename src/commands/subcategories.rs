// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::SqliteStore;
use crate::store::LedgerRepository;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(store: &SqliteStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let cat = store.category_by_name(sub.get_one::<String>("category").unwrap())?;
            let sc = store.add_sub_category(&cat.id, sub.get_one::<String>("name").unwrap())?;
            println!("Added {} sub-category '{}/{}'", sc.r#type, cat.name, sc.name);
        }
        Some(("list", sub)) => list(store, sub)?,
        Some(("rename", sub)) => {
            let sc = store.find_sub_category(sub.get_one::<String>("name").unwrap())?;
            let to = sub.get_one::<String>("to").unwrap();
            store.rename_sub_category(&sc.id, to)?;
            println!("Renamed sub-category '{}' to '{}'", sc.name, to.trim());
        }
        Some(("rm", sub)) => {
            let sc = store.find_sub_category(sub.get_one::<String>("name").unwrap())?;
            let orphaned = store.delete_sub_category(&sc.id)?;
            println!("Removed sub-category '{}'", sc.name);
            if orphaned > 0 {
                println!(
                    "Warning: {} transaction(s) still reference it and will be left out of statements; see `treasurer doctor`",
                    orphaned
                );
            }
        }
        _ => {}
    }
    Ok(())
}

fn list(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let cats = store.categories()?;
    let only = match sub.get_one::<String>("category") {
        Some(name) => Some(store.category_by_name(name)?.id),
        None => None,
    };
    let subs: Vec<_> = store
        .sub_categories()?
        .into_iter()
        .filter(|s| only.as_ref().is_none_or(|id| &s.parent_id == id))
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &subs)? {
        let data = subs
            .iter()
            .map(|s| {
                let parent = cats
                    .iter()
                    .find(|c| c.id == s.parent_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| "(missing)".into());
                vec![parent, s.name.clone(), s.r#type.to_string()]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Sub-category", "Type"], data));
    }
    Ok(())
}
