/// Shared application state handed to every endpoint
use crate::grades::{PlannerConfig, StrategyPlanner};
use crate::store::GradebookStore;

pub struct AppState {
    pub planner: StrategyPlanner,
    pub store: GradebookStore,
}

impl AppState {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            planner: StrategyPlanner::new(config),
            store: GradebookStore::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}
