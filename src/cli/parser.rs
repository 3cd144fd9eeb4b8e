use clap::{Parser, Subcommand};

/// Command-line interface definition for absensi
/// Employee attendance and activity-log backend with SQLite
#[derive(Parser)]
#[command(
    name = "absensi",
    version = env!("CARGO_PKG_VERSION"),
    about = "Employee attendance and activity-log HTTP backend backed by SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Run migrations and start the HTTP server
    Serve {
        /// Listen port (overrides config and $PORT)
        #[arg(long = "port", short = 'p')]
        port: Option<u16>,
    },

    /// Inspect the configuration file
    Config {
        /// Print the current configuration file to stdout
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        /// Add missing keys with their default values
        #[arg(long = "check", help = "Report and fill missing configuration keys")]
        check_config: bool,
    },

    /// Print or manage the internal log table
    Log {
        /// Print rows from the internal `log` table
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}
