// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use kudi::{cli, commands, config::Config, db, logging};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let cfg = Config::from_env()?;
    logging::init(&cfg.log_filter);
    let mut conn = db::open(&cfg.db_path)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", cfg.db_path.display());
        }
        Some(("config", sub)) => commands::settings::handle(&conn, &cfg, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&conn, &cfg, sub)?,
        Some(("card", sub)) => commands::cards::handle(&conn, &cfg, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, &cfg, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut conn, &cfg, sub)?,
        Some(("doctor", sub)) => commands::doctor::handle(&conn, &cfg, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
