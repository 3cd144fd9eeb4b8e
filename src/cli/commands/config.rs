use std::path::Path;

use crate::cli::parser::Commands;
use crate::config::Config;
use crate::config::check::fill_missing;
use crate::db::migrate::pending_migrations;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};

/// Tell whether the configured database is behind this build's schema.
fn report_schema(cfg: &Config) -> AppResult<()> {
    if !Path::new(&cfg.database).exists() {
        println!("⚠️  Database {} does not exist yet", cfg.database);
        return Ok(());
    }

    let pool = DbPool::new(&cfg.database)?;
    let pending = pool.with_conn(|conn| pending_migrations(conn))?;
    if pending.is_empty() {
        println!("✅ Database schema is up to date");
    } else {
        println!("🔧 Pending migrations (applied by `init` or `serve`): {}", pending.join(", "));
    }
    Ok(())
}

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check_config,
    } = cmd
    {
        if *print_config {
            let mut shown = cfg.clone();
            if !shown.jwt_secret.is_empty() {
                shown.jwt_secret = "********".into();
            }
            let yaml = serde_yaml::to_string(&shown).map_err(|e| AppError::Config(e.to_string()))?;
            println!("📄 Current configuration:\n");
            println!("{}", yaml);
        }

        if *check_config {
            let path = Config::config_file();
            if !path.exists() {
                println!("⚠️  No configuration file at {}; run `absensi init`", path.display());
                return Ok(());
            }

            let added = fill_missing(&path)?;
            if added.is_empty() {
                println!("✅ Configuration is complete");
            } else {
                println!("🔧 Added missing keys: {}", added.join(", "));
            }

            report_schema(cfg)?;
        }
    }

    Ok(())
}
