//! Course grade resolution under the Magen (waiver) rule.
//!
//! A course grade is the weighted average of its components ("plan A"). When the
//! course has Magen components and a final exam can be identified, the Magen
//! components may instead be dropped and their combined weight moved onto the
//! final exam ("plan B"). The student gets whichever plan is higher.

use super::config::PlannerConfig;
use super::types::{CourseGrade, GradeComponent};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static DEFAULT_AGGREGATOR: LazyLock<GradeAggregator> =
    LazyLock::new(|| GradeAggregator::from_config(&PlannerConfig::default()));

/// Resolves course grades, detecting the final exam by flag or by name.
#[derive(Debug, Clone)]
pub struct GradeAggregator {
    /// `None` when no keywords are configured, which disables name detection
    final_exam_pattern: Option<Regex>,
}

impl GradeAggregator {
    /// Builds an aggregator that matches the given final exam keywords.
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        let alternatives: Vec<String> = keywords
            .iter()
            .map(|k| k.as_ref().trim())
            .filter(|k| !k.is_empty())
            .map(regex::escape)
            .collect();

        let final_exam_pattern = if alternatives.is_empty() {
            None
        } else {
            // Escaped literals joined by `|` always form a valid pattern
            Regex::new(&format!("(?i)(?:{})", alternatives.join("|"))).ok()
        };

        Self { final_exam_pattern }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(&config.final_exam_keywords)
    }

    /// Returns true if the component name looks like a final exam.
    pub fn is_final_exam_name(&self, name: &str) -> bool {
        self.final_exam_pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(name))
    }

    /// Picks the component that absorbs dropped Magen weight.
    ///
    /// An explicitly flagged component wins; otherwise the first one whose name
    /// matches a final exam keyword.
    fn find_final_exam(&self, candidates: &[(&GradeComponent, f64)]) -> Option<usize> {
        candidates
            .iter()
            .position(|(c, _)| c.is_final)
            .or_else(|| {
                candidates
                    .iter()
                    .position(|(c, _)| self.is_final_exam_name(&c.name))
            })
    }

    /// Computes a course's final grade from its components.
    ///
    /// Returns a `None` grade if there are no components or any of them is ungraded.
    pub fn compute(&self, components: &[GradeComponent]) -> CourseGrade {
        if components.is_empty() {
            return CourseGrade::default();
        }

        let Some(scored) = components
            .iter()
            .map(|c| c.score.map(|score| (c, score)))
            .collect::<Option<Vec<_>>>()
        else {
            return CourseGrade::default();
        };

        let plan_a = weighted_mean(scored.iter().map(|(c, score)| (*score, c.weight))).unwrap_or(0.0);

        let (waivers, regular): (Vec<_>, Vec<_>) = scored.into_iter().partition(|(c, _)| c.is_magen);

        if waivers.is_empty() {
            return CourseGrade {
                grade: Some(plan_a),
                waiver_dropped: false,
            };
        }

        let Some(final_idx) = self.find_final_exam(&regular) else {
            debug!("Magen component present but no final exam found, keeping plan A");
            return CourseGrade {
                grade: Some(plan_a),
                waiver_dropped: false,
            };
        };

        let waiver_weight: f64 = waivers.iter().map(|(c, _)| c.weight).sum();
        let plan_b = weighted_mean(regular.iter().enumerate().map(|(i, (c, score))| {
            let weight = if i == final_idx {
                c.weight + waiver_weight
            } else {
                c.weight
            };
            (*score, weight)
        }))
        .unwrap_or(0.0);

        CourseGrade {
            grade: Some(plan_a.max(plan_b)),
            waiver_dropped: plan_b > plan_a,
        }
    }
}

impl Default for GradeAggregator {
    fn default() -> Self {
        DEFAULT_AGGREGATOR.clone()
    }
}

/// Computes a course grade with the default final exam keywords.
pub fn compute_course_grade(components: &[GradeComponent]) -> CourseGrade {
    DEFAULT_AGGREGATOR.compute(components)
}

/// Weighted mean of `(value, weight)` pairs.
///
/// Returns `None` when the total weight is not positive, so callers never see NaN.
pub(crate) fn weighted_mean<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (points, total) = pairs
        .into_iter()
        .fold((0.0, 0.0), |(points, total), (value, weight)| {
            (points + value * weight, total + weight)
        });

    if total > 0.0 {
        Some(points / total)
    } else {
        None
    }
}
