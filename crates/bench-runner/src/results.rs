use crate::driver::RunOutcome;
use crate::error::HarnessError;
use crate::metrics::RunMetrics;
use crate::verify::Verification;
use serde::{Serialize, Serializer};
use std::fs::{self, OpenOptions};
use std::path::Path;

pub const RESULTS_HEADER: &str = "Problem,number_expansions,solve_time,setup_time,all_facts,actual_facts,percentage_facts,possible_pairs,actual_pairs,percentage_pairs,num_novel_states,num_not_novel_states,percentage_novel_states,num_unique_facts,num_novel_methods,num_not_novel_methods,num_novel_method_not_novel_state,num_novel_methods_novel_state,Verified,Solved";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reported<T>(pub Option<T>);

impl<T: Serialize> Serialize for Reported<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Some(value) => value.serialize(serializer),
            None => serializer.serialize_str("N/A"),
        }
    }
}

fn title_case_bool<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "True" } else { "False" })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    #[serde(rename = "Problem")]
    pub problem: String,
    pub number_expansions: u64,
    pub solve_time: f64,
    pub setup_time: f64,
    pub all_facts: u128,
    pub actual_facts: Reported<u64>,
    pub percentage_facts: Reported<f64>,
    pub possible_pairs: u128,
    pub actual_pairs: Reported<u128>,
    pub percentage_pairs: Reported<f64>,
    pub num_novel_states: Reported<u64>,
    pub num_not_novel_states: Reported<u64>,
    pub percentage_novel_states: Reported<f64>,
    pub num_unique_facts: Reported<u64>,
    pub num_novel_methods: Reported<u64>,
    pub num_not_novel_methods: Reported<u64>,
    pub num_novel_method_not_novel_state: Reported<u64>,
    pub num_novel_methods_novel_state: Reported<u64>,
    #[serde(rename = "Verified")]
    pub verified: Verification,
    #[serde(rename = "Solved", serialize_with = "title_case_bool")]
    pub solved: bool,
}

impl ResultRow {
    pub fn new<M>(
        problem: String,
        outcome: &RunOutcome<M>,
        metrics: &RunMetrics,
        verified: Verification,
    ) -> Self {
        let coverage = &metrics.coverage;
        let novelty = metrics.novelty.as_ref();
        Self {
            problem,
            number_expansions: outcome.expansions,
            solve_time: outcome.solve_time.as_secs_f64(),
            setup_time: outcome.setup_time.as_secs_f64(),
            all_facts: coverage.all_facts,
            actual_facts: Reported(coverage.actual_facts),
            percentage_facts: Reported(coverage.percentage_facts),
            possible_pairs: coverage.possible_pairs,
            actual_pairs: Reported(coverage.actual_pairs),
            percentage_pairs: Reported(coverage.percentage_pairs),
            num_novel_states: Reported(novelty.map(|n| n.novel_states)),
            num_not_novel_states: Reported(novelty.map(|n| n.not_novel_states)),
            percentage_novel_states: Reported(novelty.map(|n| n.percentage_novel_states)),
            num_unique_facts: Reported(novelty.map(|n| n.unique_facts)),
            num_novel_methods: Reported(novelty.map(|n| n.novel_methods)),
            num_not_novel_methods: Reported(novelty.map(|n| n.not_novel_methods)),
            num_novel_method_not_novel_state: Reported(
                novelty.and_then(|n| n.novel_method_not_novel_state),
            ),
            num_novel_methods_novel_state: Reported(
                novelty.and_then(|n| n.novel_method_novel_state),
            ),
            verified,
            solved: outcome.found_plan,
        }
    }
}

/// Appends `row` to the results file at `path`.
///
/// A new or empty file gets the header line first. A missing parent directory is
/// created, one level only; deeper missing ancestors are an error.
pub fn append_row(path: &Path, row: &ResultRow) -> Result<(), HarnessError> {
    let io_err = |source| HarnessError::ResultsIo {
        path: path.to_path_buf(),
        source,
    };

    let exists = path.exists();
    let fresh = !exists || fs::metadata(path).map_err(io_err)?.len() == 0;
    if !exists {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir(parent).map_err(io_err)?;
            }
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(fresh)
        .from_writer(file);
    writer.serialize(row)?;
    writer.flush().map_err(io_err)?;
    Ok(())
}
