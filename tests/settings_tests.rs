// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal_macros::dec;
use treasurer::db::{self, SqliteStore};
use treasurer::store::LedgerRepository;
use treasurer::{cli, commands::settings};

fn run_set(store: &SqliteStore, args: &[&str]) {
    let mut argv = vec!["treasurer", "settings", "set"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("settings", settings_m)) = matches.subcommand() {
        settings::handle(store, settings_m).unwrap();
    } else {
        panic!("no settings subcommand");
    }
}

#[test]
fn overdrawn_opening_balance_is_accepted() {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let store = SqliteStore::new(&conn, "default");
    run_set(&store, &["--opening-balance", "-2,500"]);
    assert_eq!(store.settings().unwrap().opening_balance, Some(dec!(-2500)));
}

#[test]
fn set_only_touches_given_fields() {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let store = SqliteStore::new(&conn, "default");
    run_set(&store, &["--mosque-name", "Al-Noor", "--opening-balance", "1000"]);
    run_set(&store, &["--treasurer", "S. Rahman"]);
    let s = store.settings().unwrap();
    assert_eq!(s.mosque_name, "Al-Noor");
    assert_eq!(s.treasurer_name, "S. Rahman");
    assert_eq!(s.opening_balance, Some(dec!(1000)));
}
