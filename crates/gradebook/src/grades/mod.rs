/// Grade computation and planning engine
///
/// Everything in here is a pure function of the snapshot it's handed; nothing is
/// cached or mutated between calls.
mod aggregator;
mod config;
mod error;
mod history;
mod rollup;
mod strategy;
mod types;

pub use aggregator::{compute_course_grade, GradeAggregator};
pub use config::{DefaultBias, PlannerConfig, DEFAULT_FINAL_EXAM_KEYWORDS, MIN_PASS_GRADE};
pub use error::GradeError;
pub use history::{analyze_history, personal_bias, HistoryStats, PerTier, TierStats};
pub use rollup::{
    classify_course, degree_gpa, hybrid_semester_gpa, semester_gpa, split_courses, year_gpa,
    GpaCalculator,
};
pub use strategy::{plan_strategy, StrategyPlanner};
pub use types::*;

/// Rounds a value for display. Internal math always keeps full precision.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(88.666_666, 1), 88.7);
        assert_eq!(round_to(82.0, 2), 82.0);
        assert_eq!(round_to(79.994, 2), 79.99);
        assert_eq!(round_to(79.5, 0), 80.0);
    }
}
