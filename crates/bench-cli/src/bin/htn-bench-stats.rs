use anyhow::Result;
use bench_cli::{emit_json, init_tracing, json_error};
use clap::Parser;
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "htn-bench-stats",
    version,
    about = "Prepend solved counts and IPC scores to benchmark results files"
)]
struct Cli {
    /// Results CSV files, updated in place.
    #[arg(required = true)]
    results: Vec<PathBuf>,
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut files = Vec::new();
    for path in &cli.results {
        match bench_analysis::summarize_file(path) {
            Ok(summary) => {
                if cli.json {
                    files.push(json!({
                        "path": path.display().to_string(),
                        "summary": serde_json::to_value(&summary)?
                    }));
                } else {
                    println!("{}", path.display());
                    print!("{}", summary.render());
                }
            }
            Err(err) if cli.json => {
                emit_json(&json_error(
                    "command_failed",
                    format!("{:#}", err),
                    json!({ "path": path.display().to_string() }),
                ));
                std::process::exit(1);
            }
            Err(err) => return Err(err),
        }
    }

    if cli.json {
        emit_json(&json!({
            "ok": true,
            "command": "stats",
            "files": files
        }));
    }
    Ok(())
}
