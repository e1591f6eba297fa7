mod cli;

use evenue::{
    config,
    demo::{self, Phase, PhaseContext, PhaseReport},
    report,
};
use evenue_db::pool::{get_conn, init_pool, DbPool};
use evenue_db::queries::{maintenance, showcase, users};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::io::Write;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "evenue=trace,evenue_db=debug,evenue_common=debug".to_string()
        } else {
            "evenue=info,evenue_db=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let database_url = cli.database_url.as_deref();

    match cli.command {
        Commands::Run { json } => run_all_phases(cli.config.as_deref(), database_url, json),
        Commands::Setup => run_single_phase(Phase::Structure, cli.config.as_deref(), database_url),
        Commands::Truncate => run_single_phase(Phase::Truncate, cli.config.as_deref(), database_url),
        Commands::Seed => run_single_phase(Phase::Seed, cli.config.as_deref(), database_url),
        Commands::Query { number, json } => {
            run_queries(cli.config.as_deref(), database_url, number, json)
        }
        Commands::Tables => list_tables(cli.config.as_deref(), database_url),
        Commands::Login { email, password } => {
            check_login(cli.config.as_deref(), database_url, &email, &password)
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("evenue {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn load(config_path: Option<&Path>, database_url: Option<&str>) -> Result<config::Config> {
    let mut config = config::load_config_or_default(config_path)?;
    config::apply_database_url(&mut config, database_url);
    config::validate_config(&config)?;
    Ok(config)
}

fn connect(config: &config::Config) -> Result<DbPool> {
    tracing::info!("Connecting to {}", config.database.describe());
    init_pool(&config.database).context("Failed to connect to the database")
}

fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

fn run_all_phases(config_path: Option<&Path>, database_url: Option<&str>, json: bool) -> Result<()> {
    let config = load(config_path, database_url)?;
    let pool = connect(&config)?;
    let ctx = PhaseContext {
        json,
        ..PhaseContext::new(&config, today())
    };

    let stdout = std::io::stdout();
    let summary = demo::run_demo(&pool, &ctx, &mut stdout.lock())?;

    if !summary.succeeded() {
        anyhow::bail!("{} of {} phases failed", summary.failed.len(), Phase::ALL.len());
    }
    Ok(())
}

fn run_single_phase(phase: Phase, config_path: Option<&Path>, database_url: Option<&str>) -> Result<()> {
    let config = load(config_path, database_url)?;
    let pool = connect(&config)?;
    let mut conn = get_conn(&pool)?;
    let ctx = PhaseContext::new(&config, today());

    let stdout = std::io::stdout();
    let report = demo::run_phase(&mut *conn, phase, &ctx, &mut stdout.lock())?;

    match report {
        PhaseReport::Structured(steps) => println!("✓ Schema rebuilt ({} steps)", steps),
        PhaseReport::Truncated(tables) => println!("✓ Truncated {} tables", tables.len()),
        PhaseReport::Seeded(summary) => {
            println!("✓ Sample data loaded ({} rows)", summary.total());
            println!("  Users: {}", summary.users);
            println!("  Parties: {} (first starts {})", summary.parties, ctx.plan.anchor);
            println!("  Attendees: {}", summary.attendees);
            println!("  Reports: {}", summary.user_reports + summary.party_reports);
        }
        PhaseReport::Queried { total, failed } => {
            println!("{} queries run, {} failed", total, failed);
        }
    }
    Ok(())
}

fn run_queries(
    config_path: Option<&Path>,
    database_url: Option<&str>,
    number: Option<u8>,
    json: bool,
) -> Result<()> {
    let config = load(config_path, database_url)?;
    let pool = connect(&config)?;
    let mut conn = get_conn(&pool)?;
    let params = config.showcase_params(&config.seed_plan(today()));

    let outcomes = match number {
        Some(n) => {
            let query = showcase::ShowcaseQuery::from_number(usize::from(n))
                .with_context(|| format!("No query numbered {}", n))?;
            let result = showcase::run(&mut *conn, query, &params).map_err(|e| e.to_string());
            vec![showcase::QueryOutcome {
                number: query.number(),
                query,
                result,
            }]
        }
        None => showcase::run_all(&mut *conn, &params),
    };

    let stdout = std::io::stdout();
    report::write_outcomes(&mut stdout.lock(), &outcomes, json)?;

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed > 0 {
        anyhow::bail!("{} of {} queries failed", failed, outcomes.len());
    }
    Ok(())
}

fn list_tables(config_path: Option<&Path>, database_url: Option<&str>) -> Result<()> {
    let config = load(config_path, database_url)?;
    let pool = connect(&config)?;
    let mut conn = get_conn(&pool)?;

    let counts = maintenance::row_counts(&mut *conn)?;
    if counts.is_empty() {
        println!("No tables found. Run `evenue setup` first.");
        return Ok(());
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for (table, count) in counts {
        writeln!(out, "{}\t{}", table, count)?;
    }
    Ok(())
}

fn check_login(
    config_path: Option<&Path>,
    database_url: Option<&str>,
    email: &str,
    password: &str,
) -> Result<()> {
    let config = load(config_path, database_url)?;
    let pool = connect(&config)?;
    let mut conn = get_conn(&pool)?;

    if users::verify_password(&mut *conn, email, password)? {
        println!("✓ Credentials valid for {}", email);
        Ok(())
    } else {
        anyhow::bail!("Invalid email or password")
    }
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    let plan = config.seed_plan(today());
    let params = config.showcase_params(&plan);
    println!("  Database: {}", config.database.describe());
    println!("  Pool size: {}", config.database.pool_size);
    println!("  First party starts: {}", plan.anchor);
    println!(
        "  Query 3 window: {} to {}",
        params.window_start, params.window_end
    );
    println!("  Country: {}", params.country);
    println!("  Party title: {}", params.party_title);

    Ok(())
}
