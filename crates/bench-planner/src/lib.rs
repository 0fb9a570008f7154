//! Integration contract between the benchmark harness and the external HTN
//! planner, plus a process bridge implementing it.

mod bridge;
mod contract;
mod variants;

pub use bridge::{decode_response, BridgeFactory, BridgeModel, BridgePlanner};
pub use contract::{
    NoveltyCounters, ParseStage, PlanModel, Planner, PlannerError, PlannerFactory,
    PredicateSignature, ProblemObject,
};
pub use variants::{
    HeuristicVariant, ModelVariant, PlannerSettings, QueueVariant, SolverCapabilities,
    SolverVariant, TrackerVariant,
};
