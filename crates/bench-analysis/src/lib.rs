//! Offline scoring of a results file: solved counts and IPC agile scores
//! per domain, written back as a summary block at the top of the file.

use anyhow::{anyhow, Context, Result};
use bench_core::atomic_write_bytes;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

pub const IPC_TIME_LIMIT_SECS: f64 = 1800.0;

pub const SUMMARY_BEGIN: &str = "# htn-bench summary begin";
pub const SUMMARY_END: &str = "# htn-bench summary end";

const PROBLEM_COLUMN: &str = "Problem";
const SOLVE_TIME_COLUMN: &str = "solve_time";

/// IPC agile score: 1 under a second, then decaying with the log of the
/// solve time until it reaches 0 at the time limit.
pub fn ipc_score(solve_time: f64) -> f64 {
    if solve_time < 1.0 {
        1.0
    } else {
        (1.0 - solve_time.ln() / IPC_TIME_LIMIT_SECS.ln()).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainScoreSummary {
    pub total_problems: usize,
    pub solved_problems: usize,
    pub percentage_solved: f64,
    pub domains: BTreeMap<String, Vec<f64>>,
    pub total_score: f64,
}

impl DomainScoreSummary {
    pub fn domain_score(&self, domain: &str) -> Option<f64> {
        self.domains.get(domain).map(|scores| scores.iter().sum())
    }

    pub fn render(&self) -> String {
        let mut out = format!(
            "Total_Problems: {},Solved_Problems: {}, Percentage_Solved: {:?}\n",
            self.total_problems, self.solved_problems, self.percentage_solved
        );
        for (domain, scores) in &self.domains {
            let sum: f64 = scores.iter().sum();
            out.push_str(&format!("{} ({}): {:?}\n", domain, scores.len(), sum));
        }
        out.push_str(&format!("Total Score: {:?}\n", self.total_score));
        out
    }
}

pub fn strip_summary(content: &str) -> &str {
    let Some(rest) = content.strip_prefix(SUMMARY_BEGIN) else {
        return content;
    };
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        offset += line.len();
        if line.trim_end() == SUMMARY_END {
            return &rest[offset..];
        }
    }
    content
}

/// Scores every row of a results CSV. A row is solved when its last field
/// reads `true` in any case; its domain is the `Problem` text before the
/// first `/`.
pub fn summarize_csv(body: &str) -> Result<DomainScoreSummary> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());
    let headers = reader.headers().context("read results header")?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| anyhow!("results header has no '{}' column", name))
    };
    let problem_idx = column(PROBLEM_COLUMN)?;
    let solve_time_idx = column(SOLVE_TIME_COLUMN)?;

    let mut total_problems = 0usize;
    let mut solved_problems = 0usize;
    let mut domains: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (idx, record) in reader.records().enumerate() {
        let row = idx + 2;
        let record = record.with_context(|| format!("read results row {}", row))?;
        let problem = record
            .get(problem_idx)
            .ok_or_else(|| anyhow!("row {} has no Problem field", row))?;
        let domain = problem.split('/').next().unwrap_or(problem).to_string();
        let solved = record
            .iter()
            .last()
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let score = if solved {
            solved_problems += 1;
            let raw = record
                .get(solve_time_idx)
                .ok_or_else(|| anyhow!("row {} has no solve_time field", row))?;
            let solve_time: f64 = raw
                .trim()
                .parse()
                .with_context(|| format!("row {}: bad solve_time '{}'", row, raw))?;
            ipc_score(solve_time)
        } else {
            0.0
        };
        domains.entry(domain).or_default().push(score);
        total_problems += 1;
    }

    let percentage_solved = if total_problems == 0 {
        0.0
    } else {
        solved_problems as f64 / total_problems as f64 * 100.0
    };
    let total_score = domains.values().flatten().sum();
    Ok(DomainScoreSummary {
        total_problems,
        solved_problems,
        percentage_solved,
        domains,
        total_score,
    })
}

pub fn summarize_file(path: &Path) -> Result<DomainScoreSummary> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read results {}", path.display()))?;
    let body = strip_summary(&content);
    let summary =
        summarize_csv(body).with_context(|| format!("summarize {}", path.display()))?;

    let mut out = String::with_capacity(content.len() + 256);
    out.push_str(SUMMARY_BEGIN);
    out.push('\n');
    out.push_str(&summary.render());
    out.push_str(SUMMARY_END);
    out.push('\n');
    out.push_str(body);
    atomic_write_bytes(path, out.as_bytes())?;
    debug!(
        path = %path.display(),
        problems = summary.total_problems,
        "summary written"
    );
    Ok(summary)
}
