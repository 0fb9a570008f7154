use anyhow::{anyhow, Result};
use bench_cli::{emit_json, init_tracing, json_error};
use bench_planner::BridgeFactory;
use bench_runner::{BatchSummary, HarnessConfig, HarnessError, StrategySummary};
use clap::Parser;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "htn-bench",
    version,
    about = "Run one HTN planner strategy over a benchmark suite"
)]
struct Cli {
    /// Strategy code from the catalog.
    #[arg(required_unless_present = "list")]
    strategy: Option<u32>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    benchmark_root: Option<PathBuf>,
    #[arg(long)]
    results_root: Option<PathBuf>,
    #[arg(long)]
    plan_dir: Option<PathBuf>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Only run these domains (repeatable, case-insensitive).
    #[arg(long = "domain")]
    domains: Vec<String>,
    #[arg(long)]
    describe: bool,
    #[arg(long)]
    list: bool,
    #[arg(long)]
    json: bool,
    /// Planner bridge command, after `--`.
    #[arg(last = true)]
    planner: Vec<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let json_mode = cli.json;
    match run(cli) {
        Ok(Some(payload)) => {
            emit_json(&payload);
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(err) => {
            let cancelled = matches!(
                err.downcast_ref::<HarnessError>(),
                Some(HarnessError::Cancelled)
            );
            if json_mode {
                let code = if cancelled { "cancelled" } else { "command_failed" };
                emit_json(&json_error(code, format!("{:#}", err), json!({})));
                std::process::exit(if cancelled { 130 } else { 1 });
            }
            if cancelled {
                eprintln!("interrupted");
                std::process::exit(130);
            }
            Err(err)
        }
    }
}

fn run(cli: Cli) -> Result<Option<Value>> {
    if cli.list {
        return list_strategies(cli.json);
    }
    let code = cli
        .strategy
        .ok_or_else(|| anyhow!("a strategy code is required"))?;
    let config = load_config(&cli)?;

    if cli.describe {
        let summary = bench_runner::describe_strategy(&config, code, &cli.domains)?;
        if cli.json {
            return Ok(Some(json!({
                "ok": true,
                "command": "describe",
                "summary": serde_json::to_value(&summary)?
            })));
        }
        print_strategy_summary(&summary);
        return Ok(None);
    }

    let factory = BridgeFactory::new(config.planner.command.clone())
        .map_err(|e| anyhow!("planner command: {} (set planner.command or pass it after --)", e))?;
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();
    ctrlc::set_handler(move || {
        if repeated_interrupt(&flag) {
            eprintln!("interrupted twice, exiting");
            std::process::exit(130);
        }
    })?;

    let summary = bench_runner::run_strategy(&factory, &config, code, &cli.domains, &cancel)?;
    if cli.json {
        return Ok(Some(json!({
            "ok": true,
            "command": "run",
            "batch": serde_json::to_value(&summary)?
        })));
    }
    print_batch_summary(&summary);
    Ok(None)
}

// First interrupt asks the batch to stop; a second one means it did not.
fn repeated_interrupt(flag: &AtomicBool) -> bool {
    flag.swap(true, Ordering::SeqCst)
}

fn load_config(cli: &Cli) -> Result<HarnessConfig> {
    let mut config = match &cli.config {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };
    if let Some(root) = &cli.benchmark_root {
        config.benchmark_root = root.clone();
    }
    if let Some(root) = &cli.results_root {
        config.results_root = root.clone();
    }
    if let Some(dir) = &cli.plan_dir {
        config.plan_dir = dir.clone();
    }
    if let Some(secs) = cli.timeout_secs {
        config.search_timeout_secs = secs;
    }
    if !cli.planner.is_empty() {
        config.planner.command = cli.planner.clone();
    }
    config.validate()?;
    Ok(config)
}

fn list_strategies(json_mode: bool) -> Result<Option<Value>> {
    if json_mode {
        return Ok(Some(json!({
            "ok": true,
            "command": "list",
            "strategies": serde_json::to_value(bench_runner::strategies())?
        })));
    }
    for strategy in bench_runner::strategies() {
        println!(
            "{:>2}  {:<60} {}",
            strategy.code, strategy.label, strategy.output_path
        );
    }
    Ok(None)
}

fn print_strategy_summary(summary: &StrategySummary) {
    let settings = &summary.strategy.settings;
    println!("strategy: {} ({})", summary.strategy.code, summary.strategy.label);
    println!("solver: {}", settings.solver.as_str());
    println!(
        "search_queue: {}",
        settings.search_queue.map(|q| q.as_str()).unwrap_or("default")
    );
    println!(
        "heuristic: {}",
        settings.heuristic.map(|h| h.as_str()).unwrap_or("default")
    );
    println!("model: {}", settings.model.as_str());
    println!("progress_tracker: {}", settings.progress_tracker.as_str());
    println!("results: {}", summary.results_path.display());
    println!("plan_file: {}", summary.plan_file.display());
    println!("verification: {}", summary.verification_enabled);
    println!("search_timeout_secs: {}", summary.search_timeout_secs);
    println!("problems: {}", summary.problem_count);
    println!("domains: {}", summary.domains.join(", "));
    if summary.planner_command.is_empty() {
        println!("planner_command: (not set)");
    } else {
        println!("planner_command: {}", summary.planner_command.join(" "));
    }
}

fn print_batch_summary(summary: &BatchSummary) {
    println!(
        "strategy: {} ({})",
        summary.strategy_code, summary.strategy_label
    );
    println!("results: {}", summary.results_path.display());
    println!("attempted: {}", summary.attempted);
    println!("completed: {}", summary.completed);
    println!("solved: {}", summary.solved);
    println!("failed: {}", summary.failures.len());
    for failure in &summary.failures {
        println!("  {}: {}", failure.problem, failure.error);
    }
    let elapsed = summary.finished_at - summary.started_at;
    println!("elapsed_secs: {}", elapsed.num_seconds());
}
