use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if !matches!(cmd, Commands::Log { print: true }) {
        return Ok(());
    }

    let pool = DbPool::new(&cfg.database)?;
    let rows = pool.with_conn(|conn| load_log(conn))?;

    if rows.is_empty() {
        println!("⚠️  The log table is empty");
        return Ok(());
    }

    let op_width = rows
        .iter()
        .map(|r| r.operation.len() + r.target.len() + 3)
        .max()
        .unwrap_or(0)
        .min(60);

    println!("📜 Internal log:\n");
    for r in &rows {
        let op_target = if r.target.is_empty() {
            r.operation.clone()
        } else {
            format!("{} ({})", r.operation, r.target)
        };
        println!("{:<20} {:<w$} {}", r.date, op_target, r.message, w = op_width);
    }

    Ok(())
}
