// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::SqliteStore;
use crate::models::EntryType;
use crate::store::LedgerRepository;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, anyhow};

pub fn handle(store: &SqliteStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let typ = sub
                .get_one::<String>("type")
                .unwrap()
                .parse::<EntryType>()
                .map_err(|e| anyhow!(e))?;
            let icon = sub.get_one::<String>("icon").map(|s| s.as_str());
            let cat = store.add_category(name, typ, icon)?;
            println!("Added {} category '{}'", cat.r#type, cat.name);
        }
        Some(("list", sub)) => {
            let cats = store.categories()?;
            let subs = store.sub_categories()?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
                let data = cats
                    .iter()
                    .map(|c| {
                        let n = subs.iter().filter(|s| s.parent_id == c.id).count();
                        vec![
                            c.name.clone(),
                            c.r#type.to_string(),
                            n.to_string(),
                            c.icon.clone().unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Category", "Type", "Sub-categories", "Icon"], data)
                );
            }
        }
        Some(("rename", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let to = sub.get_one::<String>("to").unwrap();
            let cat = store.category_by_name(name)?;
            store.rename_category(&cat.id, to)?;
            println!("Renamed category '{}' to '{}'", cat.name, to.trim());
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let cat = store.category_by_name(name)?;
            let (removed, orphaned) = store.delete_category(&cat.id)?;
            println!(
                "Removed category '{}' and {} sub-categor{}",
                cat.name,
                removed,
                if removed == 1 { "y" } else { "ies" }
            );
            if orphaned > 0 {
                println!(
                    "Warning: {} transaction(s) still reference its sub-categories and will be left out of statements; see `treasurer doctor`",
                    orphaned
                );
            }
        }
        _ => {}
    }
    Ok(())
}
