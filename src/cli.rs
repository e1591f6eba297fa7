use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "evenue")]
#[command(author, version, about = "Party database builder and showcase query runner")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// PostgreSQL connection string, overriding the config file
    #[arg(long, global = true, env = "EVENUE_DATABASE_URL")]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rebuild the schema, truncate, seed, and run every query
    Run {
        /// Print query results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Drop and recreate all tables and enum types
    Setup,

    /// Empty every table in the current schema
    Truncate,

    /// Load the sample users, parties, and reports
    Seed,

    /// Run the showcase queries against the current data
    Query {
        /// Run only the query with this number (1-10)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=10))]
        number: Option<u8>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List tables with their row counts
    Tables,

    /// Check a user's password
    Login {
        /// Email address of the user
        email: String,

        /// Password to check
        password: String,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
