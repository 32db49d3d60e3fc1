//! Smart strategy planning.
//!
//! Given where the student stands and the GPA they want to finish with, works out
//! the average needed across the remaining courses and spreads it over those
//! courses. Each course starts from the required average shifted by the student's
//! personal bias for its difficulty tier, then a re-balancing pass nudges single
//! courses one point at a time until the plan lands on the target.
//!
//! Re-balancing order is a heuristic: when points are missing, easy courses are
//! raised first; when there are points to spare, hard courses are lowered first.

use super::aggregator::GradeAggregator;
use super::config::PlannerConfig;
use super::history::{analyze_history, personal_bias};
use super::rollup::{split_courses, GpaCalculator};
use super::round_to;
use super::types::*;
use std::cmp::Reverse;
use tracing::debug;

/// Plans target grades for future courses.
#[derive(Debug, Clone, Default)]
pub struct StrategyPlanner {
    config: PlannerConfig,
    calculator: GpaCalculator,
}

impl StrategyPlanner {
    /// Creates a new planner with the given configuration
    pub fn new(config: PlannerConfig) -> Self {
        let calculator = GpaCalculator::new(GradeAggregator::from_config(&config));
        Self { config, calculator }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn calculator(&self) -> &GpaCalculator {
        &self.calculator
    }

    /// Checks a request before any planning happens.
    fn validate(&self, input: &StrategyInput) -> Result<f64, String> {
        let min_pass = self.config.min_pass_grade;

        if !input.target_gpa.is_finite() || !(0.0..=100.0).contains(&input.target_gpa) {
            return Err("Target GPA must be between 0 and 100".to_string());
        }
        if !input.max_realistic_grade.is_finite()
            || !(0.0..=100.0).contains(&input.max_realistic_grade)
        {
            return Err("Maximum realistic grade must be between 0 and 100".to_string());
        }
        if input.max_realistic_grade < min_pass {
            return Err(format!(
                "Maximum realistic grade ({}) is below the passing grade ({})",
                input.max_realistic_grade, min_pass
            ));
        }
        if let Some(current) = input.current_gpa {
            if !current.is_finite() || !(0.0..=100.0).contains(&current) {
                return Err("Current GPA must be between 0 and 100".to_string());
            }
        }
        if !input.total_credits_so_far.is_finite() || input.total_credits_so_far < 0.0 {
            return Err("Credits so far must be non-negative".to_string());
        }
        if input.future_courses.is_empty() {
            return Err("There are no future courses to plan".to_string());
        }
        if let Some(course) = input
            .future_courses
            .iter()
            .find(|c| !c.credits.is_finite() || c.credits <= 0.0)
        {
            return Err(format!(
                "Future course '{}' has non-positive credits ({})",
                course.name, course.credits
            ));
        }

        let future_credits: f64 = input.future_courses.iter().map(|c| c.credits).sum();
        if !future_credits.is_finite() || future_credits <= 0.0 {
            return Err("Future courses carry no credits".to_string());
        }

        Ok(future_credits)
    }

    /// Recommends a grade for every future course so the final GPA hits the target.
    ///
    /// Unreachable or already-met targets yield `success: false` together with a
    /// best-effort set of recommendations.
    pub fn plan_strategy(&self, input: &StrategyInput) -> StrategyResult {
        let future_credits = match self.validate(input) {
            Ok(credits) => credits,
            Err(message) => {
                debug!("Rejected strategy request: {}", message);
                return StrategyResult::invalid(message);
            }
        };

        let min_pass = self.config.min_pass_grade;
        let max_grade = input.max_realistic_grade;

        let total_credits = input.total_credits_so_far + future_credits;
        let required_total_points = input.target_gpa * total_credits;
        let current_points = input.current_gpa.unwrap_or(0.0) * input.total_credits_so_far;
        let needed_future_points = required_total_points - current_points;
        let required_future_average = needed_future_points / future_credits;

        let achieved = |grades: &[f64]| {
            (current_points + planned_points(&input.future_courses, grades)) / total_credits
        };

        let uniform = |grade: f64| -> (Vec<f64>, Vec<Recommendation>) {
            let grades = vec![grade; input.future_courses.len()];
            let recommendations = input
                .future_courses
                .iter()
                .map(|c| Recommendation::for_course(c, grade))
                .collect();
            (grades, recommendations)
        };

        if needed_future_points > max_grade * future_credits {
            debug!(
                "Target out of reach: needs {:.2} on average, ceiling is {}",
                required_future_average, max_grade
            );
            let (grades, recommendations) = uniform(max_grade);
            return StrategyResult {
                success: false,
                outcome: StrategyOutcome::TargetOutOfReach,
                message: format!(
                    "Reaching {} requires an average of {} across future courses, above your maximum realistic grade of {}",
                    round_to(input.target_gpa, 2),
                    round_to(required_future_average, 1),
                    max_grade
                ),
                required_future_average: Some(required_future_average),
                achieved_gpa: Some(achieved(&grades)),
                recommendations,
            };
        }

        if required_future_average < min_pass {
            debug!(
                "Target already met: needs {:.2} on average, passing is {}",
                required_future_average, min_pass
            );
            let (grades, recommendations) = uniform(min_pass);
            return StrategyResult {
                success: false,
                outcome: StrategyOutcome::TargetAlreadyMet,
                message: format!(
                    "You are already above the target of {}; passing every remaining course is enough",
                    round_to(input.target_gpa, 2)
                ),
                required_future_average: Some(required_future_average),
                achieved_gpa: Some(achieved(&grades)),
                recommendations,
            };
        }

        let stats = analyze_history(self.calculator.aggregator(), &input.completed_courses);
        let mut grades: Vec<f64> = input
            .future_courses
            .iter()
            .map(|course| {
                let bias = personal_bias(&self.config, course.difficulty, &stats);
                (required_future_average + bias)
                    .clamp(min_pass, max_grade)
                    .round()
                    .clamp(min_pass, max_grade)
            })
            .collect();

        let residual = self.rebalance(&input.future_courses, &mut grades, needed_future_points, max_grade);
        let achieved_gpa = achieved(&grades);

        debug!(
            "Planned {} courses, residual gap {:.2} credit-points",
            grades.len(),
            residual
        );

        let recommendations = input
            .future_courses
            .iter()
            .zip(&grades)
            .map(|(course, grade)| Recommendation::for_course(course, *grade))
            .collect();

        StrategyResult {
            success: true,
            outcome: StrategyOutcome::Planned,
            message: format!(
                "Required average across future courses: {}. Following this plan gives a GPA of {}",
                round_to(required_future_average, 1),
                round_to(achieved_gpa, 2)
            ),
            required_future_average: Some(required_future_average),
            achieved_gpa: Some(achieved_gpa),
            recommendations,
        }
    }

    /// Nudges single courses by one point until the plan is within tolerance.
    ///
    /// A course only moves when the step shrinks the gap; a step worth more than
    /// twice the gap would overshoot. Stops early when no course can absorb or
    /// release more points. Returns the remaining gap in credit-points.
    fn rebalance(
        &self,
        courses: &[FutureCourse],
        grades: &mut [f64],
        needed_points: f64,
        max_grade: f64,
    ) -> f64 {
        let min_pass = self.config.min_pass_grade;

        let mut raise_order: Vec<usize> = (0..courses.len()).collect();
        let mut lower_order = raise_order.clone();
        raise_order.sort_by_key(|&i| courses[i].difficulty);
        lower_order.sort_by_key(|&i| Reverse(courses[i].difficulty));

        let mut gap = needed_points - planned_points(courses, grades);
        let mut iterations = 0;

        while gap.abs() > self.config.balance_tolerance
            && iterations < self.config.max_balance_iterations
        {
            iterations += 1;

            let adjustment = if gap > 0.0 {
                raise_order.iter().find_map(|&i| {
                    let step = (gap / courses[i].credits).ceil().min(1.0);
                    let narrows = step * courses[i].credits < 2.0 * gap.abs();
                    (narrows && grades[i] + step <= max_grade).then_some((i, step))
                })
            } else {
                lower_order.iter().find_map(|&i| {
                    let step = (-gap / courses[i].credits).ceil().min(1.0);
                    let narrows = step * courses[i].credits < 2.0 * gap.abs();
                    (narrows && grades[i] - step >= min_pass).then_some((i, -step))
                })
            };

            let Some((i, delta)) = adjustment else {
                debug!(
                    "No course can absorb a gap of {:.2} after {} iterations",
                    gap, iterations
                );
                break;
            };

            grades[i] = (grades[i] + delta).clamp(min_pass, max_grade);
            gap = needed_points - planned_points(courses, grades);
        }

        gap
    }

    /// Plans directly from a gradebook snapshot.
    ///
    /// Current GPA and credits so far include the legacy blocks; partially graded
    /// courses are neither history nor planned.
    pub fn plan_for_snapshot(
        &self,
        snapshot: &GradebookSnapshot,
        target_gpa: f64,
        max_realistic_grade: f64,
    ) -> StrategyResult {
        let (completed, future) = split_courses(&snapshot.semesters);

        let input = StrategyInput {
            current_gpa: self.calculator.degree_gpa(&snapshot.semesters, snapshot.legacy),
            total_credits_so_far: self.calculator.credits_so_far(snapshot),
            target_gpa,
            future_courses: future.iter().map(FutureCourse::from).collect(),
            completed_courses: completed,
            max_realistic_grade,
        };

        self.plan_strategy(&input)
    }
}

fn planned_points(courses: &[FutureCourse], grades: &[f64]) -> f64 {
    grades
        .iter()
        .zip(courses)
        .map(|(grade, course)| grade * course.credits)
        .sum()
}

/// Plans with the default configuration.
pub fn plan_strategy(input: &StrategyInput) -> StrategyResult {
    StrategyPlanner::default().plan_strategy(input)
}
