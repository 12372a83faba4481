// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use treasurer::{cli, commands, db};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("treasurer=warn")),
        )
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let db_path = matches.get_one::<String>("db").map(PathBuf::from);
    let owner = matches
        .get_one::<String>("owner")
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "default".into());

    let mut conn = db::open_or_init(db_path.as_deref())?;

    if let Some(("import", sub)) = matches.subcommand() {
        return commands::importer::handle(&mut conn, &owner, sub);
    }

    let store = db::SqliteStore::new(&conn, owner.as_str());
    match matches.subcommand() {
        Some(("init", _)) => {
            let shown = match &db_path {
                Some(p) => p.clone(),
                None => db::db_path()?,
            };
            println!("Database initialized at {}", shown.display());
        }
        Some(("category", sub)) => commands::categories::handle(&store, sub)?,
        Some(("subcategory", sub)) => commands::subcategories::handle(&store, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&store, sub)?,
        Some(("settings", sub)) => commands::settings::handle(&store, sub)?,
        Some(("report", sub)) => commands::reports::handle(&store, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&store, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&store)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
