// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal_macros::dec;
use std::io::Write;
use tempfile::NamedTempFile;
use treasurer::db::{self, SqliteStore};
use treasurer::models::EntryType;
use treasurer::store::LedgerRepository;
use treasurer::{cli, commands::importer};

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    {
        let store = SqliteStore::new(&conn, "default");
        let inc = store.add_category("Income", EntryType::Income, None).unwrap();
        let exp = store.add_category("Expense", EntryType::Expense, None).unwrap();
        store.add_sub_category(&inc.id, "Donations").unwrap();
        store.add_sub_category(&exp.id, "Utilities").unwrap();
    }
    conn
}

fn run_import(conn: &mut Connection, csv: &str) -> anyhow::Result<()> {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", csv).unwrap();
    let path = file.path().to_string_lossy().to_string();
    let matches = cli::build_cli().get_matches_from([
        "treasurer",
        "import",
        "transactions",
        "--path",
        &path,
    ]);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(conn, "default", import_m)
    } else {
        panic!("no import subcommand");
    }
}

#[test]
fn import_transactions_resolves_sub_categories() {
    let mut conn = base_conn();
    run_import(
        &mut conn,
        "date,type,amount,category,sub_category,description\n\
         2025-01-03,income,\"500,000\",Income,Donations,Friday box\n\
         2025-01-04 18:30,,150000,Expense,Utilities,Power\n",
    )
    .unwrap();

    let store = SqliteStore::new(&conn, "default");
    let txs = store.transactions().unwrap();
    assert_eq!(txs.len(), 2);
    assert_eq!(txs[0].amount, dec!(500000));
    assert_eq!(txs[0].r#type, EntryType::Income);
    assert_eq!(txs[1].r#type, EntryType::Expense);
    assert_eq!(txs[1].description, "Power");
}

#[test]
fn import_is_all_or_nothing() {
    let mut conn = base_conn();
    let err = run_import(
        &mut conn,
        "date,type,amount,category,sub_category,description\n\
         2025-01-03,income,10,Income,Donations,ok\n\
         2025-01-04,expense,10,Income,Donations,wrong type\n",
    )
    .unwrap_err();
    assert!(format!("{:#}", err).contains("Line 3"));

    let store = SqliteStore::new(&conn, "default");
    assert!(store.transactions().unwrap().is_empty());
}

#[test]
fn import_rejects_unknown_sub_category() {
    let mut conn = base_conn();
    assert!(
        run_import(
            &mut conn,
            "date,type,amount,category,sub_category,description\n\
             2025-01-03,,10,Income,Zakat,\n",
        )
        .is_err()
    );
}
