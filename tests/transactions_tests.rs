// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use treasurer::db::{self, NewTransaction, SqliteStore};
use treasurer::models::EntryType;
use treasurer::{cli, commands::transactions};

fn setup(conn: &Connection) -> SqliteStore<'_> {
    db::init_schema(conn).unwrap();
    let store = SqliteStore::new(conn, "default");
    let inc = store.add_category("Income", EntryType::Income, None).unwrap();
    let exp = store.add_category("Expense", EntryType::Expense, None).unwrap();
    let gifts = store.add_sub_category(&inc.id, "Gifts").unwrap();
    let bills = store.add_sub_category(&exp.id, "Bills").unwrap();
    for i in 1..=3 {
        store
            .add_transaction(NewTransaction {
                r#type: None,
                amount: Decimal::from(10 * i),
                date: NaiveDate::from_ymd_opt(2025, 1, i)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
                description: "P".into(),
                sub_category_id: gifts.id.clone(),
            })
            .unwrap();
    }
    store
        .add_transaction(NewTransaction {
            r#type: None,
            amount: Decimal::from(7),
            date: NaiveDate::from_ymd_opt(2025, 1, 2)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            description: "Power".into(),
            sub_category_id: bills.id.clone(),
        })
        .unwrap();
    store
}

fn list_rows(store: &SqliteStore, args: &[&str]) -> Vec<transactions::TransactionRow> {
    let mut argv = vec!["treasurer", "tx", "list"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            transactions::query_rows(store, list_m).unwrap()
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_limit_respected() {
    let conn = Connection::open_in_memory().unwrap();
    let store = setup(&conn);
    let rows = list_rows(&store, &["--limit", "2"]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2025-01-03 00:00");
    assert_eq!(rows[1].sub_category, "Bills");
}

#[test]
fn list_filters_by_type_and_range() {
    let conn = Connection::open_in_memory().unwrap();
    let store = setup(&conn);
    let rows = list_rows(&store, &["--type", "income", "--from", "2025-01-02"]);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.r#type == "income" && r.category == "Income"));

    let rows = list_rows(&store, &["--to", "2025-01-01"]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, Decimal::from(10));
}
