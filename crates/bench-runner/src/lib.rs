//! Benchmark harness: runs one planner strategy over a suite of HTN
//! problems and appends one results row per run.

pub mod catalog;
pub mod config;
pub mod driver;
pub mod error;
pub mod metrics;
pub mod results;
pub mod suite;
pub mod verify;

#[cfg(test)]
mod testing;

pub use catalog::{resolve, strategies, StrategyConfig};
pub use config::HarnessConfig;
pub use driver::{best_partial_model, run_search, RunOutcome, SearchBudget};
pub use error::HarnessError;
pub use metrics::{FactCoverageStats, FactUniverse, NoveltyStats, RunMetrics};
pub use results::{append_row, ResultRow, RESULTS_HEADER};
pub use suite::{BenchmarkProblem, BenchmarkSuite};
pub use verify::{Verification, Verifier, PANDA_VERIFY_SUCCESS_OUTPUT};

use anyhow::{Context, Result};
use bench_core::ensure_dir;
use bench_planner::{Planner, PlannerFactory};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct RunFailure {
    pub problem: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub strategy_code: u32,
    pub strategy_label: String,
    pub results_path: PathBuf,
    pub attempted: usize,
    pub completed: usize,
    pub solved: usize,
    pub failures: Vec<RunFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StrategySummary {
    pub strategy: StrategyConfig,
    pub results_path: PathBuf,
    pub plan_file: PathBuf,
    pub verification_enabled: bool,
    pub problem_count: usize,
    pub domains: Vec<String>,
    pub planner_command: Vec<String>,
    pub search_timeout_secs: u64,
}

pub fn results_path(config: &HarnessConfig, strategy: &StrategyConfig) -> PathBuf {
    config.results_root.join(strategy.output_path())
}

pub fn plan_file(config: &HarnessConfig, strategy: &StrategyConfig) -> PathBuf {
    config.plan_dir.join(format!("{}.txt", strategy.code))
}

pub fn build_suite(config: &HarnessConfig, domains: &[String]) -> Result<BenchmarkSuite> {
    let mut suite = match &config.suite {
        Some(entries) => BenchmarkSuite::from_entries(&config.benchmark_root, entries),
        None => BenchmarkSuite::discover(&config.benchmark_root)?,
    };
    suite.retain_domains(domains);
    Ok(suite)
}

pub fn describe_strategy(
    config: &HarnessConfig,
    code: u32,
    domains: &[String],
) -> Result<StrategySummary> {
    let strategy = resolve(code)?;
    let suite = build_suite(config, domains)?;
    let mut suite_domains: Vec<String> = suite.problems.iter().map(|p| p.domain.clone()).collect();
    suite_domains.dedup();
    Ok(StrategySummary {
        results_path: results_path(config, &strategy),
        plan_file: plan_file(config, &strategy),
        verification_enabled: strategy.settings.supports_plan_verification()
            && verify::host_supports_verification(),
        problem_count: suite.len(),
        domains: suite_domains,
        planner_command: config.planner.command.clone(),
        search_timeout_secs: config.search_timeout_secs,
        strategy,
    })
}

pub fn run_problem<F: PlannerFactory>(
    factory: &F,
    config: &HarnessConfig,
    strategy: &StrategyConfig,
    problem: &BenchmarkProblem,
    verifier: &Verifier,
    cancel: &AtomicBool,
) -> Result<ResultRow, HarnessError> {
    let mut planner = factory.create(&problem.domain_file, &problem.problem_file, &strategy.settings)?;
    let outcome = run_search(
        &mut planner,
        SearchBudget::new(config.search_timeout()),
        cancel,
    )?;
    let metrics = metrics::collect(
        &mut planner,
        &strategy.settings,
        outcome.terminal_model.as_ref(),
    )?;
    let verified = verify_terminal_model(
        &mut planner,
        outcome.terminal_model.as_ref(),
        config,
        strategy,
        problem,
        verifier,
    );

    let row = ResultRow::new(problem.problem_name(), &outcome, &metrics, verified);
    append_row(&results_path(config, strategy), &row)?;
    Ok(row)
}

fn verify_terminal_model<P: Planner>(
    planner: &mut P,
    model: Option<&P::Model>,
    config: &HarnessConfig,
    strategy: &StrategyConfig,
    problem: &BenchmarkProblem,
    verifier: &Verifier,
) -> Verification {
    let Some(model) = model else {
        return Verification::NotApplicable;
    };
    if !strategy.settings.supports_plan_verification() || !verify::host_supports_verification() {
        return Verification::NotApplicable;
    }

    let plan_path = plan_file(config, strategy);
    if let Err(err) = ensure_dir(&config.plan_dir) {
        warn!(error = %format!("{:#}", err), "cannot prepare plan directory");
        return Verification::Rejected;
    }
    if let Err(err) = planner.write_plan(model, &plan_path) {
        warn!(plan = %plan_path.display(), error = %err, "planner failed to write plan");
        return Verification::Rejected;
    }
    verifier.verify(&problem.domain_file, &problem.problem_file, &plan_path)
}

/// Runs every suite problem under one strategy.
///
/// Planner failures end only the affected run; they are logged and listed
/// in the summary. Results I/O errors and cancellation stop the batch.
pub fn run_strategy<F: PlannerFactory>(
    factory: &F,
    config: &HarnessConfig,
    code: u32,
    domains: &[String],
    cancel: &AtomicBool,
) -> Result<BatchSummary> {
    let strategy = resolve(code)?;
    let suite = build_suite(config, domains).context("build benchmark suite")?;
    let verifier = Verifier::from_config(&config.verifier);
    let results = results_path(config, &strategy);
    info!(
        strategy = code,
        label = strategy.label,
        problems = suite.len(),
        results = %results.display(),
        "starting benchmark batch"
    );

    let started_at = Utc::now();
    let mut summary = BatchSummary {
        strategy_code: code,
        strategy_label: strategy.label.to_string(),
        results_path: results,
        attempted: 0,
        completed: 0,
        solved: 0,
        failures: Vec::new(),
        started_at,
        finished_at: started_at,
    };

    for problem in &suite.problems {
        if cancel.load(Ordering::Relaxed) {
            return Err(HarnessError::Cancelled.into());
        }
        let name = problem.problem_name();
        summary.attempted += 1;
        info!(problem = %name, "run started");
        match run_problem(factory, config, &strategy, problem, &verifier, cancel) {
            Ok(row) => {
                summary.completed += 1;
                if row.solved {
                    summary.solved += 1;
                }
                info!(
                    problem = %name,
                    solved = row.solved,
                    expansions = row.number_expansions,
                    verified = row.verified.as_str(),
                    "run finished"
                );
            }
            Err(err) if err.is_run_local() => {
                warn!(problem = %name, error = %err, "run failed");
                summary.failures.push(RunFailure {
                    problem: name,
                    error: err.to_string(),
                });
            }
            Err(err) => {
                return Err(anyhow::Error::new(err))
                    .with_context(|| format!("benchmark batch stopped at {}", name));
            }
        }
    }

    summary.finished_at = Utc::now();
    info!(
        attempted = summary.attempted,
        solved = summary.solved,
        failed = summary.failures.len(),
        "benchmark batch finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuiteDomainConfig;
    use crate::testing::{object, signature, StubFactory, StubModel, StubPlanner};
    use std::fs;
    use std::path::Path;

    fn scratch(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "bench_runner_{}_{}_{}",
            tag,
            std::process::id(),
            Utc::now().timestamp_micros()
        ))
    }

    fn config_in(root: &Path) -> HarnessConfig {
        HarnessConfig {
            benchmark_root: root.join("bench"),
            results_root: root.to_path_buf(),
            plan_dir: root.join("plans"),
            search_timeout_secs: 5,
            verifier: config::VerifierConfig {
                program: root.join("missing-verifier"),
                ..config::VerifierConfig::default()
            },
            suite: Some(vec![
                SuiteDomainConfig {
                    domain: "Rover".to_string(),
                    domain_file: None,
                    problems: vec![PathBuf::from("p01.hddl"), PathBuf::from("broken.hddl")],
                },
                SuiteDomainConfig {
                    domain: "Barman".to_string(),
                    domain_file: None,
                    problems: vec![PathBuf::from("p01.hddl")],
                },
            ]),
            ..HarnessConfig::default()
        }
    }

    fn scripted(problem_file: &Path) -> StubPlanner {
        let name = problem_file
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let mut planner = if name == "broken.hddl" {
            StubPlanner {
                parse_failure: Some(bench_planner::ParseStage::Problem),
                ..StubPlanner::default()
            }
        } else {
            StubPlanner::solving_on_step(2, StubModel::new(7, 3, 2))
        };
        planner.predicates = vec![signature("at", &["rover"])];
        planner.objects = vec![object("r1", "rover"), object("r2", "rover")];
        planner
    }

    #[test]
    fn batch_writes_rows_and_skips_failed_runs() {
        let root = scratch("batch");
        fs::create_dir_all(&root).expect("scratch root");
        let config = config_in(&root);
        let factory = StubFactory {
            build: Some(scripted),
        };
        let cancel = AtomicBool::new(false);

        let summary = run_strategy(&factory, &config, 4, &[], &cancel).expect("batch");
        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.solved, 2);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].problem, "Rover/broken.hddl");

        let written = fs::read_to_string(&summary.results_path).expect("results");
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], RESULTS_HEADER);
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Rover/p01.hddl,2,"));
        assert!(lines[2].starts_with("Barman/p01.hddl,2,"));
        // verifier binary is missing, so a written plan is rejected
        assert!(lines[1].ends_with(",False,True"));
        assert!(config.plan_dir.join("4.txt").is_file());
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn domain_filter_and_cancellation() {
        let root = scratch("cancel");
        fs::create_dir_all(&root).expect("scratch root");
        let config = config_in(&root);
        let factory = StubFactory {
            build: Some(scripted),
        };

        let cancel = AtomicBool::new(false);
        let summary =
            run_strategy(&factory, &config, 1, &["barman".to_string()], &cancel).expect("batch");
        assert_eq!(summary.attempted, 1);

        cancel.store(true, Ordering::Relaxed);
        let err = run_strategy(&factory, &config, 1, &[], &cancel).expect_err("cancelled");
        assert!(matches!(
            err.downcast_ref::<HarnessError>(),
            Some(HarnessError::Cancelled)
        ));
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn unknown_strategy_is_fatal_before_any_run() {
        let root = scratch("unknown");
        let config = config_in(&root);
        let cancel = AtomicBool::new(false);
        let err = run_strategy(&StubFactory::default(), &config, 99, &[], &cancel)
            .expect_err("unknown");
        assert!(matches!(
            err.downcast_ref::<HarnessError>(),
            Some(HarnessError::UnknownStrategy(99))
        ));
        assert!(!root.exists());
    }

    #[test]
    fn describe_reports_paths_and_suite() {
        let root = scratch("describe");
        let config = config_in(&root);
        let summary = describe_strategy(&config, 6, &[]).expect("describe");
        assert_eq!(summary.problem_count, 3);
        assert_eq!(summary.domains, vec!["Rover", "Barman"]);
        assert_eq!(summary.plan_file, root.join("plans").join("6.txt"));
        assert_eq!(
            summary.results_path,
            root.join(summary.strategy.output_path())
        );
    }
}
