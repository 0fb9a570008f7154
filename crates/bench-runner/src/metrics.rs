//! Post-search measurements: ground-fact coverage of the terminal state and
//! the solver's novelty counters.

use bench_planner::{PlanModel, Planner, PlannerError, PlannerSettings, ProblemObject};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Unordered pairs out of `n` items. Zero below two, saturating at `u128::MAX`.
pub fn choose_two(n: u128) -> u128 {
    if n < 2 {
        0
    } else if n % 2 == 0 {
        (n / 2).saturating_mul(n - 1)
    } else {
        n.saturating_mul((n - 1) / 2)
    }
}

pub fn percentage(part: u128, whole: u128) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroundFact {
    pub predicate: String,
    pub arguments: Vec<String>,
}

#[derive(Debug, Clone)]
struct GroundablePredicate {
    name: String,
    candidates: Vec<Vec<usize>>,
}

impl GroundablePredicate {
    fn grounding_count(&self) -> u128 {
        self.candidates
            .iter()
            .fold(1u128, |acc, c| acc.saturating_mul(c.len() as u128))
    }
}

#[derive(Debug, Clone, Default)]
pub struct FactUniverse {
    objects: Vec<ProblemObject>,
    predicates: Vec<GroundablePredicate>,
}

impl FactUniverse {
    pub fn build<P: Planner>(planner: &mut P) -> Result<Self, PlannerError> {
        let predicates = planner.predicates()?;
        let objects = planner.objects()?;

        let mut by_type: HashMap<String, Vec<usize>> = HashMap::new();
        let mut groundable = Vec::with_capacity(predicates.len());
        for predicate in predicates {
            let mut candidates = Vec::with_capacity(predicate.parameter_types.len());
            for param_type in &predicate.parameter_types {
                if !by_type.contains_key(param_type) {
                    let mut matching = Vec::new();
                    for (idx, object) in objects.iter().enumerate() {
                        if planner.satisfies_type(param_type, object)? {
                            matching.push(idx);
                        }
                    }
                    by_type.insert(param_type.clone(), matching);
                }
                candidates.push(by_type.get(param_type).cloned().unwrap_or_default());
            }
            groundable.push(GroundablePredicate {
                name: predicate.name,
                candidates,
            });
        }

        Ok(Self {
            objects,
            predicates: groundable,
        })
    }

    pub fn count(&self) -> u128 {
        self.predicates
            .iter()
            .fold(0u128, |acc, p| acc.saturating_add(p.grounding_count()))
    }

    pub fn groundings(&self) -> impl Iterator<Item = GroundFact> + '_ {
        self.predicates.iter().flat_map(move |predicate| Groundings {
            predicate,
            objects: &self.objects,
            cursor: if predicate.candidates.iter().any(|c| c.is_empty()) {
                None
            } else {
                Some(vec![0; predicate.candidates.len()])
            },
        })
    }
}

struct Groundings<'a> {
    predicate: &'a GroundablePredicate,
    objects: &'a [ProblemObject],
    cursor: Option<Vec<usize>>,
}

impl Iterator for Groundings<'_> {
    type Item = GroundFact;

    fn next(&mut self) -> Option<GroundFact> {
        let candidates = &self.predicate.candidates;
        let cursor = self.cursor.as_mut()?;
        let fact = GroundFact {
            predicate: self.predicate.name.clone(),
            arguments: cursor
                .iter()
                .zip(candidates)
                .map(|(pos, options)| self.objects[options[*pos]].name.clone())
                .collect(),
        };

        let mut exhausted = true;
        for slot in (0..cursor.len()).rev() {
            cursor[slot] += 1;
            if cursor[slot] < candidates[slot].len() {
                exhausted = false;
                break;
            }
            cursor[slot] = 0;
        }
        if exhausted {
            self.cursor = None;
        }
        Some(fact)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactCoverageStats {
    pub all_facts: u128,
    pub actual_facts: Option<u64>,
    pub percentage_facts: Option<f64>,
    pub possible_pairs: u128,
    pub actual_pairs: Option<u128>,
    pub percentage_pairs: Option<f64>,
}

impl FactCoverageStats {
    pub fn new(all_facts: u128, actual_facts: Option<u64>) -> Self {
        let possible_pairs = choose_two(all_facts);
        let actual_pairs = actual_facts.map(|n| choose_two(n as u128));
        Self {
            all_facts,
            actual_facts,
            percentage_facts: actual_facts.map(|n| percentage(n as u128, all_facts)),
            possible_pairs,
            actual_pairs,
            percentage_pairs: actual_pairs.map(|n| percentage(n, possible_pairs)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoveltyStats {
    pub novel_states: u64,
    pub not_novel_states: u64,
    pub percentage_novel_states: f64,
    pub unique_facts: u64,
    pub novel_methods: u64,
    pub not_novel_methods: u64,
    pub novel_method_not_novel_state: Option<u64>,
    pub novel_method_novel_state: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunMetrics {
    pub coverage: FactCoverageStats,
    pub novelty: Option<NoveltyStats>,
}

pub fn collect<P: Planner>(
    planner: &mut P,
    settings: &PlannerSettings,
    terminal_model: Option<&P::Model>,
) -> Result<RunMetrics, PlannerError> {
    let universe = FactUniverse::build(planner)?;
    let coverage = FactCoverageStats::new(
        universe.count(),
        terminal_model.map(|m| m.state_fact_count()),
    );
    debug!(all_facts = %coverage.all_facts, "fact universe counted");

    let capabilities = settings.solver.capabilities();
    let novelty = if capabilities.novelty_counters {
        let counters = planner.novelty_counters()?;
        let (novel_method_not_novel_state, novel_method_novel_state) =
            if capabilities.method_state_novelty {
                (
                    counters.novel_method_not_novel_state,
                    counters.novel_method_novel_state,
                )
            } else {
                (None, None)
            };
        Some(NoveltyStats {
            novel_states: counters.novel_states,
            not_novel_states: counters.not_novel_states,
            percentage_novel_states: percentage(
                counters.novel_states as u128,
                counters.novel_states as u128 + counters.not_novel_states as u128,
            ),
            unique_facts: counters.unique_facts,
            novel_methods: counters.novel_methods,
            not_novel_methods: counters.not_novel_methods,
            novel_method_not_novel_state,
            novel_method_novel_state,
        })
    } else {
        None
    };

    Ok(RunMetrics { coverage, novelty })
}
