use tracing::warn;

use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::open_and_init;
use crate::db::log::ttlog;
use crate::errors::AppResult;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the SQLite database with all pending migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;
    let db_path = cfg.database.clone();

    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", &db_path);

    let pool = open_and_init(&db_path)?;

    pool.with_conn(|conn| {
        if let Err(e) = ttlog(
            conn,
            "init",
            &db_path,
            &format!("Database initialized at {}", &db_path),
        ) {
            warn!(error = %e, "failed to write internal log");
        }
        Ok(())
    })?;

    println!("✅ Database initialized at {}", &db_path);
    Ok(())
}
