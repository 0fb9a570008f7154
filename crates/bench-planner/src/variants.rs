use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolverCapabilities {
    pub novelty_counters: bool,
    pub method_state_novelty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverVariant {
    PlannerDefault,
    PartialOrderNovelty,
    PartialOrderNoveltyLight,
    PartialOrderNoveltyNoReset,
    PartialOrderNoveltyLevelTwo,
    PartialOrderNoveltyLevelTwoNoReset,
    PartialOrderNoveltyMethods,
    PartialOrderNoveltyMethodsOnly,
    PartialOrderNoveltyMethodsNoReset,
    PartialOrderNoveltyMethodsTasks,
    PartialOrderHammingNovelty,
    PartialOrderHammingNoveltyNoReset,
}

impl SolverVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            SolverVariant::PlannerDefault => "planner_default",
            SolverVariant::PartialOrderNovelty => "partial_order_novelty",
            SolverVariant::PartialOrderNoveltyLight => "partial_order_novelty_light",
            SolverVariant::PartialOrderNoveltyNoReset => "partial_order_novelty_no_reset",
            SolverVariant::PartialOrderNoveltyLevelTwo => "partial_order_novelty_level_two",
            SolverVariant::PartialOrderNoveltyLevelTwoNoReset => {
                "partial_order_novelty_level_two_no_reset"
            }
            SolverVariant::PartialOrderNoveltyMethods => "partial_order_novelty_methods",
            SolverVariant::PartialOrderNoveltyMethodsOnly => "partial_order_novelty_methods_only",
            SolverVariant::PartialOrderNoveltyMethodsNoReset => {
                "partial_order_novelty_methods_no_reset"
            }
            SolverVariant::PartialOrderNoveltyMethodsTasks => "partial_order_novelty_methods_tasks",
            SolverVariant::PartialOrderHammingNovelty => "partial_order_hamming_novelty",
            SolverVariant::PartialOrderHammingNoveltyNoReset => {
                "partial_order_hamming_novelty_no_reset"
            }
        }
    }

    pub fn capabilities(self) -> SolverCapabilities {
        match self {
            SolverVariant::PlannerDefault | SolverVariant::PartialOrderNoveltyLight => {
                SolverCapabilities::default()
            }
            SolverVariant::PartialOrderNoveltyMethodsNoReset
            | SolverVariant::PartialOrderHammingNoveltyNoReset => SolverCapabilities {
                novelty_counters: true,
                method_state_novelty: true,
            },
            SolverVariant::PartialOrderNovelty
            | SolverVariant::PartialOrderNoveltyNoReset
            | SolverVariant::PartialOrderNoveltyLevelTwo
            | SolverVariant::PartialOrderNoveltyLevelTwoNoReset
            | SolverVariant::PartialOrderNoveltyMethods
            | SolverVariant::PartialOrderNoveltyMethodsOnly
            | SolverVariant::PartialOrderNoveltyMethodsTasks
            | SolverVariant::PartialOrderHammingNovelty => SolverCapabilities {
                novelty_counters: true,
                method_state_novelty: false,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueVariant {
    Gbfs,
    GbfsNewestFirst,
    NoveltyGbfs,
    NoveltyGbfsOldestFirst,
    NoveltyTreeDistanceGbfs,
    DualHammingDistance,
    DualTreeDistance,
    DualLandmarks,
}

impl QueueVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            QueueVariant::Gbfs => "gbfs",
            QueueVariant::GbfsNewestFirst => "gbfs_newest_first",
            QueueVariant::NoveltyGbfs => "novelty_gbfs",
            QueueVariant::NoveltyGbfsOldestFirst => "novelty_gbfs_oldest_first",
            QueueVariant::NoveltyTreeDistanceGbfs => "novelty_tree_distance_gbfs",
            QueueVariant::DualHammingDistance => "dual_hamming_distance",
            QueueVariant::DualTreeDistance => "dual_tree_distance",
            QueueVariant::DualLandmarks => "dual_landmarks",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicVariant {
    HammingDistanceSeenStates,
    SeenStatesPruning,
    TreeDistanceSeenStates,
    TreeDistance,
    Landmarks,
    LandmarksNoReachability,
}

impl HeuristicVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            HeuristicVariant::HammingDistanceSeenStates => "hamming_distance_seen_states",
            HeuristicVariant::SeenStatesPruning => "seen_states_pruning",
            HeuristicVariant::TreeDistanceSeenStates => "tree_distance_seen_states",
            HeuristicVariant::TreeDistance => "tree_distance",
            HeuristicVariant::Landmarks => "landmarks",
            HeuristicVariant::LandmarksNoReachability => "landmarks_no_reachability",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelVariant {
    PlannerDefault,
    PandaVerify,
}

impl ModelVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelVariant::PlannerDefault => "planner_default",
            ModelVariant::PandaVerify => "panda_verify",
        }
    }

    pub fn serializes_plans(self) -> bool {
        matches!(self, ModelVariant::PandaVerify)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerVariant {
    PlannerDefault,
    PandaVerifyFormat,
}

impl TrackerVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            TrackerVariant::PlannerDefault => "planner_default",
            TrackerVariant::PandaVerifyFormat => "panda_verify_format",
        }
    }

    pub fn emits_panda_format(self) -> bool {
        matches!(self, TrackerVariant::PandaVerifyFormat)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PlannerSettings {
    pub solver: SolverVariant,
    pub search_queue: Option<QueueVariant>,
    pub heuristic: Option<HeuristicVariant>,
    pub model: ModelVariant,
    pub progress_tracker: TrackerVariant,
}

impl PlannerSettings {
    /// True when plans produced under these settings can be checked by the
    /// external PANDA verifier.
    pub fn supports_plan_verification(&self) -> bool {
        self.model.serializes_plans() && self.progress_tracker.emits_panda_format()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_state_capability_implies_novelty_counters() {
        let all = [
            SolverVariant::PlannerDefault,
            SolverVariant::PartialOrderNovelty,
            SolverVariant::PartialOrderNoveltyLight,
            SolverVariant::PartialOrderNoveltyNoReset,
            SolverVariant::PartialOrderNoveltyLevelTwo,
            SolverVariant::PartialOrderNoveltyLevelTwoNoReset,
            SolverVariant::PartialOrderNoveltyMethods,
            SolverVariant::PartialOrderNoveltyMethodsOnly,
            SolverVariant::PartialOrderNoveltyMethodsNoReset,
            SolverVariant::PartialOrderNoveltyMethodsTasks,
            SolverVariant::PartialOrderHammingNovelty,
            SolverVariant::PartialOrderHammingNoveltyNoReset,
        ];
        for solver in all {
            let caps = solver.capabilities();
            if caps.method_state_novelty {
                assert!(caps.novelty_counters, "{} inconsistent", solver.as_str());
            }
        }
        assert!(!SolverVariant::PartialOrderNoveltyLight
            .capabilities()
            .novelty_counters);
        assert!(SolverVariant::PartialOrderNoveltyMethodsNoReset
            .capabilities()
            .method_state_novelty);
    }

    #[test]
    fn verification_needs_panda_model_and_tracker() {
        let mut settings = PlannerSettings {
            solver: SolverVariant::PartialOrderNovelty,
            search_queue: Some(QueueVariant::NoveltyGbfs),
            heuristic: None,
            model: ModelVariant::PandaVerify,
            progress_tracker: TrackerVariant::PandaVerifyFormat,
        };
        assert!(settings.supports_plan_verification());
        settings.progress_tracker = TrackerVariant::PlannerDefault;
        assert!(!settings.supports_plan_verification());
        settings.progress_tracker = TrackerVariant::PandaVerifyFormat;
        settings.model = ModelVariant::PlannerDefault;
        assert!(!settings.supports_plan_verification());
    }

    #[test]
    fn settings_serialize_with_wire_names() {
        let settings = PlannerSettings {
            solver: SolverVariant::PartialOrderHammingNovelty,
            search_queue: None,
            heuristic: Some(HeuristicVariant::LandmarksNoReachability),
            model: ModelVariant::PandaVerify,
            progress_tracker: TrackerVariant::PandaVerifyFormat,
        };
        let value = serde_json::to_value(settings).expect("serialize");
        assert_eq!(value["solver"], settings.solver.as_str());
        assert_eq!(value["heuristic"], "landmarks_no_reachability");
        assert!(value["search_queue"].is_null());
    }
}
