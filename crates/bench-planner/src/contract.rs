//! The surface of the external planner the harness depends on.
//!
//! Everything the harness knows about a planner goes through [`Planner`].
//! Search, state representation and parsing stay on the planner's side; the
//! harness only drives the lifecycle and reads counts back.

use crate::variants::PlannerSettings;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStage {
    Domain,
    Problem,
}

impl fmt::Display for ParseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseStage::Domain => f.write_str("domain"),
            ParseStage::Problem => f.write_str("problem"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("failed to parse {stage} file: {message}")]
    Parse { stage: ParseStage, message: String },
    #[error("search step failed: {0}")]
    Search(String),
    #[error("planner reported an error: {0}")]
    Other(String),
    #[error("planner protocol error: {0}")]
    Protocol(String),
    #[error("planner io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("planner json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateSignature {
    pub name: String,
    #[serde(rename = "parameters")]
    pub parameter_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProblemObject {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NoveltyCounters {
    pub novel_states: u64,
    pub not_novel_states: u64,
    pub unique_facts: u64,
    pub novel_methods: u64,
    pub not_novel_methods: u64,
    #[serde(default)]
    pub novel_method_not_novel_state: Option<u64>,
    #[serde(default)]
    pub novel_method_novel_state: Option<u64>,
}

pub trait PlanModel {
    fn operations_taken(&self) -> u64;
    fn state_fact_count(&self) -> u64;
}

pub trait Planner {
    type Model: PlanModel;

    fn parse_domain(&mut self) -> Result<(), PlannerError>;
    fn parse_problem(&mut self) -> Result<(), PlannerError>;

    fn setup_search(&mut self) -> Result<(), PlannerError>;

    /// Runs one search step. `Some` carries a completed plan.
    fn search_step(&mut self) -> Result<Option<Self::Model>, PlannerError>;

    fn retained_models(&mut self) -> Result<Vec<Self::Model>, PlannerError>;

    fn predicates(&mut self) -> Result<Vec<PredicateSignature>, PlannerError>;
    fn objects(&mut self) -> Result<Vec<ProblemObject>, PlannerError>;
    fn satisfies_type(
        &mut self,
        param_type: &str,
        object: &ProblemObject,
    ) -> Result<bool, PlannerError>;

    /// Only meaningful for solvers whose capabilities declare novelty
    /// counters; callers check before asking.
    fn novelty_counters(&mut self) -> Result<NoveltyCounters, PlannerError>;

    fn write_plan(&mut self, model: &Self::Model, path: &Path) -> Result<(), PlannerError>;
}

pub trait PlannerFactory {
    type Planner: Planner;

    fn create(
        &self,
        domain_file: &Path,
        problem_file: &Path,
        settings: &PlannerSettings,
    ) -> Result<Self::Planner, PlannerError>;
}
