// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::SqliteStore;
use crate::store::LedgerRepository;
use crate::utils::pretty_table;
use crate::validation::{audit, validate_sub_category};
use anyhow::Result;

/// One row per problem found; empty when the ledger is consistent.
pub fn issues(store: &SqliteStore) -> Result<Vec<Vec<String>>> {
    let snap = store.snapshot()?;
    let mut rows = Vec::new();

    if snap.settings.opening_balance.is_none() {
        rows.push(vec![
            "opening_balance_missing".into(),
            "set it with `settings set --opening-balance`".into(),
        ]);
    }

    for sc in &snap.sub_categories {
        if let Err(e) = validate_sub_category(sc, &snap.categories) {
            rows.push(vec!["sub_category".into(), format!("'{}': {}", sc.name, e)]);
        }
    }

    for e in audit(&snap) {
        rows.push(vec!["unplaceable_transaction".into(), e.to_string()]);
    }
    Ok(rows)
}

pub fn handle(store: &SqliteStore) -> Result<()> {
    let rows = issues(store)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        tracing::warn!(count = rows.len(), "ledger has issues");
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
