//! The end-to-end run: rebuild, empty, seed, and query the database.
//!
//! Phases run in a fixed order on one connection. A phase that fails is
//! logged and reported as `Exception: <message>` on the output, and the run
//! carries on with the next phase. Only failing to connect stops it early.
//!
//! With JSON output the query phase writes one JSON array and failed phases
//! are only logged, so the output stays parseable.

use std::fmt;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use evenue_db::pool::{get_conn, DbPool};
use evenue_db::queries::{maintenance, showcase};
use evenue_db::schema;
use evenue_db::seed::{self, SeedPlan, SeedSummary};
use postgres::GenericClient;
use serde::Serialize;

use crate::config::Config;
use crate::report;

/// One step of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Structure,
    Truncate,
    Seed,
    Query,
}

impl Phase {
    /// All phases in execution order.
    pub const ALL: [Phase; 4] = [Phase::Structure, Phase::Truncate, Phase::Seed, Phase::Query];

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Structure => "structure",
            Phase::Truncate => "truncate",
            Phase::Seed => "seed",
            Phase::Query => "query",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a finished run did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DemoSummary {
    /// Phases that reported an error.
    pub failed: Vec<Phase>,
    /// Rows written by the seed phase, if it succeeded.
    pub seeded: Option<SeedSummary>,
    /// Number of showcase queries that failed.
    pub failed_queries: usize,
}

impl DemoSummary {
    pub fn succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Inputs shared by the phases.
pub struct PhaseContext<'a> {
    pub config: &'a Config,
    pub plan: SeedPlan,
    /// Write query results as JSON instead of text blocks.
    pub json: bool,
}

impl<'a> PhaseContext<'a> {
    pub fn new(config: &'a Config, today: NaiveDate) -> Self {
        Self {
            config,
            plan: config.seed_plan(today),
            json: false,
        }
    }
}

/// Result of one phase that did not error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseReport {
    Structured(usize),
    Truncated(Vec<String>),
    Seeded(SeedSummary),
    /// Number of queries run and how many of them failed.
    Queried { total: usize, failed: usize },
}

/// Run one phase, writing query results to `out`.
pub fn run_phase(
    client: &mut impl GenericClient,
    phase: Phase,
    ctx: &PhaseContext<'_>,
    out: &mut impl Write,
) -> Result<PhaseReport> {
    tracing::info!("Running phase: {}", phase);

    let report = match phase {
        Phase::Structure => PhaseReport::Structured(schema::structure_database(client)?),
        Phase::Truncate => PhaseReport::Truncated(maintenance::truncate_tables(client)?),
        Phase::Seed => PhaseReport::Seeded(seed::seed_database(client, &ctx.plan)?),
        Phase::Query => {
            let params = ctx.config.showcase_params(&ctx.plan);
            let outcomes = showcase::run_all(client, &params);
            report::write_outcomes(out, &outcomes, ctx.json)
                .context("Failed to write query results")?;
            PhaseReport::Queried {
                total: outcomes.len(),
                failed: outcomes.iter().filter(|o| o.result.is_err()).count(),
            }
        }
    };

    Ok(report)
}

/// Run every phase in order.
///
/// # Returns
///
/// * `Ok(DemoSummary)` - Which phases failed; check [`DemoSummary::succeeded`]
/// * `Err(_)` - If no connection could be made or `out` cannot be written
pub fn run_demo(pool: &DbPool, ctx: &PhaseContext<'_>, out: &mut impl Write) -> Result<DemoSummary> {
    let mut conn = get_conn(pool).context("Failed to connect to the database")?;
    let mut summary = DemoSummary::default();

    for phase in Phase::ALL {
        match run_phase(&mut *conn, phase, ctx, out) {
            Ok(PhaseReport::Seeded(seeded)) => summary.seeded = Some(seeded),
            Ok(PhaseReport::Queried { failed, .. }) if failed > 0 => {
                summary.failed_queries = failed;
                summary.failed.push(phase);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!("Phase {} failed: {:#}", phase, e);
                if !ctx.json {
                    writeln!(out, "Exception: {:#}", e)?;
                }
                summary.failed.push(phase);
            }
        }
    }

    if summary.succeeded() {
        tracing::info!("All phases completed");
    } else {
        tracing::warn!(
            "Finished with failed phases: {}",
            summary
                .failed
                .iter()
                .map(Phase::name)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        assert_eq!(
            Phase::ALL,
            [Phase::Structure, Phase::Truncate, Phase::Seed, Phase::Query]
        );
        assert_eq!(Phase::Seed.to_string(), "seed");
    }

    #[test]
    fn test_context_uses_config_plan() {
        let mut config = Config::default();
        config.seed.party_start_date = NaiveDate::from_ymd_opt(2031, 3, 1);
        let ctx = PhaseContext::new(&config, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(ctx.plan.anchor, NaiveDate::from_ymd_opt(2031, 3, 1).unwrap());
        assert!(!ctx.json);
    }

    #[test]
    fn test_summary_success() {
        let mut summary = DemoSummary::default();
        assert!(summary.succeeded());
        summary.failed.push(Phase::Seed);
        assert!(!summary.succeeded());
    }
}
