//! Fixed table of benchmark strategies.
//!
//! Each code names one hand-picked combination of planner components and
//! the CSV file its results go to. Codes are stable across releases since
//! results files are compared by code.

use crate::error::HarnessError;
use bench_planner::{
    HeuristicVariant as H, ModelVariant, PlannerSettings, QueueVariant as Q, SolverVariant as S,
    TrackerVariant,
};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StrategyConfig {
    pub code: u32,
    pub label: &'static str,
    pub settings: PlannerSettings,
    pub output_path: &'static str,
}

impl StrategyConfig {
    pub fn output_path(&self) -> &Path {
        Path::new(self.output_path)
    }
}

const fn entry(
    code: u32,
    label: &'static str,
    solver: S,
    search_queue: Option<Q>,
    heuristic: Option<H>,
    output_path: &'static str,
) -> StrategyConfig {
    StrategyConfig {
        code,
        label,
        settings: PlannerSettings {
            solver,
            search_queue,
            heuristic,
            model: ModelVariant::PandaVerify,
            progress_tracker: TrackerVariant::PandaVerifyFormat,
        },
        output_path,
    }
}

static CATALOG: [StrategyConfig; 34] = [
    entry(
        1,
        "Hamming distance (seen states)",
        S::PartialOrderNoveltyLight,
        Some(Q::Gbfs),
        Some(H::HammingDistanceSeenStates),
        "results/Hamming-Distance-seen-states-results.csv",
    ),
    entry(
        2,
        "Seen states pruning",
        S::PartialOrderNoveltyLight,
        Some(Q::Gbfs),
        Some(H::SeenStatesPruning),
        "results/seen-state-breadth-first-results.csv",
    ),
    entry(
        3,
        "Tree distance (seen states)",
        S::PartialOrderNoveltyLight,
        Some(Q::Gbfs),
        Some(H::TreeDistanceSeenStates),
        "results/Tree-Distance-seen-states-results.csv",
    ),
    entry(
        4,
        "Novelty level 1, reset after task or method expansion",
        S::PartialOrderNovelty,
        Some(Q::NoveltyGbfs),
        None,
        "results/Novelty_Facts_Only_reset-newest-results.csv",
    ),
    entry(
        5,
        "Tree distance",
        S::PlannerDefault,
        Some(Q::Gbfs),
        Some(H::TreeDistance),
        "results/Tree-Distance-results.csv",
    ),
    entry(
        6,
        "Novelty level 1, reset, tree distance tie breaker",
        S::PartialOrderNovelty,
        Some(Q::NoveltyTreeDistanceGbfs),
        Some(H::TreeDistanceSeenStates),
        "results/Novelty_Facts_Only_reset-TreeDis-results.csv",
    ),
    entry(
        7,
        "Tree distance (seen states), newest first",
        S::PartialOrderNoveltyLight,
        Some(Q::GbfsNewestFirst),
        Some(H::TreeDistanceSeenStates),
        "results/Tree-Distance-seen-states-newest-first-results.csv",
    ),
    entry(
        8,
        "Hamming distance (seen states), newest first",
        S::PlannerDefault,
        Some(Q::GbfsNewestFirst),
        Some(H::HammingDistanceSeenStates),
        "results/Hamming-Distance-seen-states-newest-first-results.csv",
    ),
    entry(
        9,
        "Tree distance, hamming distance tie breaker",
        S::PlannerDefault,
        Some(Q::DualHammingDistance),
        Some(H::TreeDistanceSeenStates),
        "results/Tree-Distance-seen-states-Hamming-Distance-tie-breaker-results.csv",
    ),
    entry(
        10,
        "Novelty level 1, no reset",
        S::PartialOrderNoveltyNoReset,
        Some(Q::NoveltyGbfs),
        None,
        "results/Novelty_Facts_Only_No-Reset-results.csv",
    ),
    entry(
        11,
        "Novelty level 2, reset",
        S::PartialOrderNoveltyLevelTwo,
        Some(Q::NoveltyGbfs),
        None,
        "results/Novelty_level2_reset-results.csv",
    ),
    entry(
        12,
        "Novelty level 1, novel methods",
        S::PartialOrderNoveltyMethods,
        Some(Q::NoveltyGbfs),
        None,
        "results/Novelty_Facts_Methods-results.csv",
    ),
    entry(
        13,
        "Novelty level 1, reset, oldest first",
        S::PartialOrderNovelty,
        Some(Q::NoveltyGbfsOldestFirst),
        None,
        "results/Novelty_Facts_Only_reset-Oldest-First-results.csv",
    ),
    entry(
        14,
        "Landmarks",
        S::PlannerDefault,
        Some(Q::Gbfs),
        Some(H::Landmarks),
        "results/Landmarks-results.csv",
    ),
    entry(
        15,
        "Novelty level 1, reset, hamming distance tie breaker",
        S::PartialOrderNovelty,
        Some(Q::NoveltyTreeDistanceGbfs),
        Some(H::HammingDistanceSeenStates),
        "results/Novelty_Facts_Only_reset-HamDis-results.csv",
    ),
    entry(
        16,
        "Novelty level 2, no reset",
        S::PartialOrderNoveltyLevelTwoNoReset,
        Some(Q::NoveltyGbfs),
        None,
        "results/Novelty_level2_no_reset-results.csv",
    ),
    entry(
        17,
        "Novelty level 1, novel methods, oldest first",
        S::PartialOrderNoveltyMethods,
        Some(Q::NoveltyGbfsOldestFirst),
        None,
        "results/Novelty_Facts_Methods_oldest_first-results.csv",
    ),
    entry(
        18,
        "Novelty level 1, no reset, tree distance tie breaker",
        S::PartialOrderNoveltyNoReset,
        Some(Q::NoveltyTreeDistanceGbfs),
        Some(H::TreeDistanceSeenStates),
        "results/Novelty_Facts_Only_no_reset-TreeDis-results.csv",
    ),
    entry(
        19,
        "Novelty level 1, no reset, hamming distance tie breaker",
        S::PartialOrderNoveltyNoReset,
        Some(Q::NoveltyTreeDistanceGbfs),
        Some(H::HammingDistanceSeenStates),
        "results/Novelty_Facts_Only_no_reset-HamDis-results.csv",
    ),
    entry(
        20,
        "Novelty level 1, reset, landmarks tie breaker",
        S::PartialOrderNovelty,
        Some(Q::NoveltyTreeDistanceGbfs),
        Some(H::Landmarks),
        "results/Novelty_Facts_Only_reset-Landmarks-results.csv",
    ),
    entry(
        21,
        "Novelty level 1, no reset, landmarks tie breaker",
        S::PartialOrderNoveltyNoReset,
        Some(Q::NoveltyTreeDistanceGbfs),
        Some(H::Landmarks),
        "results/Novelty_Facts_Only_no_reset-Landmarks-results.csv",
    ),
    entry(
        22,
        "Landmarks, hamming distance tie breaker",
        S::PlannerDefault,
        Some(Q::DualHammingDistance),
        Some(H::Landmarks),
        "results/Landmarks-Hamming-Distance-tie-breaker-results.csv",
    ),
    entry(
        23,
        "Landmarks, tree distance tie breaker",
        S::PartialOrderNoveltyLight,
        Some(Q::DualTreeDistance),
        Some(H::Landmarks),
        "results/Landmarks-Tree-Distance-tie-breaker-results.csv",
    ),
    entry(
        24,
        "Landmarks, newest first",
        S::PartialOrderNoveltyLight,
        Some(Q::GbfsNewestFirst),
        Some(H::Landmarks),
        "results/Landmarks-newest-first-results.csv",
    ),
    entry(
        25,
        "Hamming distance, tree distance tie breaker",
        S::PartialOrderNoveltyLight,
        Some(Q::DualTreeDistance),
        Some(H::HammingDistanceSeenStates),
        "results/Hamming-Distance-seen-states-Tree-Distance-tie-breaker-results.csv",
    ),
    entry(
        26,
        "Tree distance, landmarks tie breaker",
        S::PlannerDefault,
        Some(Q::DualLandmarks),
        Some(H::TreeDistanceSeenStates),
        "results/Tree-Distance-seen-states-landmarks-tie-breaker-results.csv",
    ),
    entry(
        27,
        "Hamming distance, landmarks tie breaker",
        S::PlannerDefault,
        Some(Q::DualLandmarks),
        Some(H::HammingDistanceSeenStates),
        "results/Hamming-Distance-seen-states-landmarks-tie-breaker-results.csv",
    ),
    entry(
        28,
        "Novelty level 1, novel methods and tasks",
        S::PartialOrderNoveltyMethodsTasks,
        Some(Q::NoveltyGbfs),
        None,
        "results/Novelty_Facts_Methods_Tasks-results.csv",
    ),
    entry(
        29,
        "Novelty level 1, novel methods and tasks, oldest first",
        S::PartialOrderNoveltyMethodsTasks,
        Some(Q::NoveltyGbfsOldestFirst),
        None,
        "results/Novelty_Facts_Methods_Tasks_oldest_first-results.csv",
    ),
    entry(
        30,
        "Hamming distance, novelty tie breaker, reset, newest first",
        S::PartialOrderHammingNovelty,
        None,
        None,
        "results/Hamming-Novelty-Reset-Newest.csv",
    ),
    entry(
        31,
        "Hamming distance, novelty tie breaker, no reset, newest first",
        S::PartialOrderHammingNoveltyNoReset,
        None,
        None,
        "results/Hamming-Novelty-No-Reset-Newest.csv",
    ),
    entry(
        32,
        "Novelty level 1, novel methods, no reset",
        S::PartialOrderNoveltyMethodsNoReset,
        Some(Q::NoveltyGbfs),
        None,
        "results/Novelty_Facts_Methods_No_Reset-results.csv",
    ),
    entry(
        33,
        "Novel methods only, reset, newest first",
        S::PartialOrderNoveltyMethodsOnly,
        Some(Q::NoveltyGbfs),
        None,
        "results/Novelty_Methods_Only_Reset_Newest-results.csv",
    ),
    entry(
        34,
        "Landmarks without reachability",
        S::PartialOrderNoveltyLight,
        Some(Q::Gbfs),
        Some(H::LandmarksNoReachability),
        "results/Landmarks_No_Reachability-results.csv",
    ),
];

pub fn strategies() -> &'static [StrategyConfig] {
    &CATALOG
}

/// Looks up a strategy. There is no fallback: an unknown code would
/// silently mislabel benchmark results.
pub fn resolve(code: u32) -> Result<StrategyConfig, HarnessError> {
    CATALOG
        .iter()
        .find(|s| s.code == code)
        .copied()
        .ok_or(HarnessError::UnknownStrategy(code))
}
