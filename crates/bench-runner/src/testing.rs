use bench_planner::{
    NoveltyCounters, ParseStage, PlanModel, Planner, PlannerError, PlannerFactory,
    PlannerSettings, PredicateSignature, ProblemObject,
};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubModel {
    pub id: u64,
    pub operations: u64,
    pub facts: u64,
}

impl StubModel {
    pub fn new(id: u64, operations: u64, facts: u64) -> Self {
        Self {
            id,
            operations,
            facts,
        }
    }
}

impl PlanModel for StubModel {
    fn operations_taken(&self) -> u64 {
        self.operations
    }

    fn state_fact_count(&self) -> u64 {
        self.facts
    }
}

/// Scripted planner. Step results are consumed front to back; once the
/// script runs out every step returns `None`.
#[derive(Debug, Default)]
pub struct StubPlanner {
    pub steps: VecDeque<Option<StubModel>>,
    pub retained: Vec<StubModel>,
    pub predicates: Vec<PredicateSignature>,
    pub objects: Vec<ProblemObject>,
    pub counters: NoveltyCounters,
    pub parse_failure: Option<ParseStage>,
    pub fail_on_step: Option<u64>,
    pub steps_taken: u64,
    pub setup_calls: u32,
    pub novelty_queries: u32,
    pub written_plans: Vec<PathBuf>,
}

impl StubPlanner {
    pub fn solving_on_step(step: u64, model: StubModel) -> Self {
        let mut steps: VecDeque<Option<StubModel>> = (1..step).map(|_| None).collect();
        steps.push_back(Some(model));
        Self {
            steps,
            ..Self::default()
        }
    }
}

pub fn signature(name: &str, params: &[&str]) -> PredicateSignature {
    PredicateSignature {
        name: name.to_string(),
        parameter_types: params.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn object(name: &str, type_name: &str) -> ProblemObject {
    ProblemObject {
        name: name.to_string(),
        type_name: type_name.to_string(),
    }
}

impl Planner for StubPlanner {
    type Model = StubModel;

    fn parse_domain(&mut self) -> Result<(), PlannerError> {
        match self.parse_failure {
            Some(ParseStage::Domain) => Err(PlannerError::Parse {
                stage: ParseStage::Domain,
                message: "unexpected token".to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn parse_problem(&mut self) -> Result<(), PlannerError> {
        match self.parse_failure {
            Some(ParseStage::Problem) => Err(PlannerError::Parse {
                stage: ParseStage::Problem,
                message: "unknown object".to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn setup_search(&mut self) -> Result<(), PlannerError> {
        self.setup_calls += 1;
        Ok(())
    }

    fn search_step(&mut self) -> Result<Option<StubModel>, PlannerError> {
        self.steps_taken += 1;
        if self.fail_on_step == Some(self.steps_taken) {
            return Err(PlannerError::Search("queue corrupted".to_string()));
        }
        Ok(self.steps.pop_front().flatten())
    }

    fn retained_models(&mut self) -> Result<Vec<StubModel>, PlannerError> {
        Ok(self.retained.clone())
    }

    fn predicates(&mut self) -> Result<Vec<PredicateSignature>, PlannerError> {
        Ok(self.predicates.clone())
    }

    fn objects(&mut self) -> Result<Vec<ProblemObject>, PlannerError> {
        Ok(self.objects.clone())
    }

    fn satisfies_type(
        &mut self,
        param_type: &str,
        object: &ProblemObject,
    ) -> Result<bool, PlannerError> {
        Ok(param_type == "object" || object.type_name == param_type)
    }

    fn novelty_counters(&mut self) -> Result<NoveltyCounters, PlannerError> {
        self.novelty_queries += 1;
        Ok(self.counters)
    }

    fn write_plan(&mut self, model: &StubModel, path: &Path) -> Result<(), PlannerError> {
        fs::write(path, format!("==>\n{} operations\n", model.operations))?;
        self.written_plans.push(path.to_path_buf());
        Ok(())
    }
}

#[derive(Default)]
pub struct StubFactory {
    pub build: Option<fn(&Path) -> StubPlanner>,
}

impl PlannerFactory for StubFactory {
    type Planner = StubPlanner;

    fn create(
        &self,
        _domain_file: &Path,
        problem_file: &Path,
        _settings: &PlannerSettings,
    ) -> Result<StubPlanner, PlannerError> {
        Ok(self
            .build
            .map(|build| build(problem_file))
            .unwrap_or_default())
    }
}
