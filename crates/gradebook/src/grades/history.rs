//! Historical performance per difficulty tier, used to personalize planning.

use super::aggregator::{weighted_mean, GradeAggregator};
use super::config::PlannerConfig;
use super::types::{Course, Difficulty};
use serde::{Deserialize, Serialize};

/// Credit-weighted average over the completed courses of one tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierStats {
    pub avg: f64,
    pub count: usize,
}

/// Per-tier statistics. A tier is `None` when the student has no graded course in it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerTier {
    pub easy: Option<TierStats>,
    pub medium: Option<TierStats>,
    pub hard: Option<TierStats>,
}

impl PerTier {
    pub fn get(&self, tier: Difficulty) -> Option<TierStats> {
        match tier {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    fn set(&mut self, tier: Difficulty, stats: Option<TierStats>) {
        match tier {
            Difficulty::Easy => self.easy = stats,
            Difficulty::Medium => self.medium = stats,
            Difficulty::Hard => self.hard = stats,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub per_tier: PerTier,
    /// Zero when there is no history at all
    pub overall_avg: f64,
}

impl HistoryStats {
    pub fn is_empty(&self) -> bool {
        Difficulty::ALL.iter().all(|t| self.per_tier.get(*t).is_none())
    }
}

/// Computes per-tier and overall averages over completed courses.
///
/// Courses whose grade can't be resolved are skipped.
pub fn analyze_history(aggregator: &GradeAggregator, completed: &[Course]) -> HistoryStats {
    let graded: Vec<(Difficulty, f64, f64)> = completed
        .iter()
        .filter_map(|course| {
            aggregator
                .compute(&course.components)
                .grade
                .map(|grade| (course.difficulty, grade, course.credits))
        })
        .collect();

    let Some(overall_avg) = weighted_mean(graded.iter().map(|(_, grade, credits)| (*grade, *credits)))
    else {
        return HistoryStats::default();
    };

    let mut per_tier = PerTier::default();
    for tier in Difficulty::ALL {
        let in_tier: Vec<(f64, f64)> = graded
            .iter()
            .filter(|(difficulty, _, _)| *difficulty == tier)
            .map(|(_, grade, credits)| (*grade, *credits))
            .collect();

        let stats = weighted_mean(in_tier.iter().copied()).map(|avg| TierStats {
            avg,
            count: in_tier.len(),
        });
        per_tier.set(tier, stats);
    }

    HistoryStats {
        per_tier,
        overall_avg,
    }
}

/// How many points above or below the required average to aim for in a tier.
///
/// Falls back to the configured default when the tier has no history.
pub fn personal_bias(config: &PlannerConfig, tier: Difficulty, stats: &HistoryStats) -> f64 {
    match stats.per_tier.get(tier) {
        Some(tier_stats) => {
            (tier_stats.avg - stats.overall_avg).clamp(-config.bias_limit, config.bias_limit)
        }
        None => config.default_bias.for_tier(tier),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grades::rollup::tests::course;

    const EPS: f64 = 1e-9;

    fn tiered(id: &str, credits: f64, score: Option<f64>, difficulty: Difficulty) -> Course {
        Course {
            difficulty,
            ..course(id, credits, score)
        }
    }

    #[test]
    fn test_no_history() {
        let stats = analyze_history(&GradeAggregator::default(), &[]);
        assert!(stats.is_empty());
        assert_eq!(stats.overall_avg, 0.0);

        let config = PlannerConfig::default();
        assert_eq!(personal_bias(&config, Difficulty::Easy, &stats), 2.0);
        assert_eq!(personal_bias(&config, Difficulty::Medium, &stats), 0.0);
        assert_eq!(personal_bias(&config, Difficulty::Hard, &stats), -2.0);
    }

    #[test]
    fn test_tier_averages() {
        let completed = vec![
            tiered("e1", 2.0, Some(95.0), Difficulty::Easy),
            tiered("e2", 2.0, Some(85.0), Difficulty::Easy),
            tiered("h1", 4.0, Some(70.0), Difficulty::Hard),
            // Ungraded courses are ignored
            tiered("m1", 3.0, None, Difficulty::Medium),
        ];

        let stats = analyze_history(&GradeAggregator::default(), &completed);
        let easy = stats.per_tier.easy.unwrap();
        assert!((easy.avg - 90.0).abs() < EPS);
        assert_eq!(easy.count, 2);
        assert_eq!(stats.per_tier.medium, None);
        assert_eq!(stats.per_tier.hard.unwrap().count, 1);
        // (95*2 + 85*2 + 70*4) / 8
        assert!((stats.overall_avg - 80.0).abs() < EPS);

        let config = PlannerConfig::default();
        assert!((personal_bias(&config, Difficulty::Easy, &stats) - 10.0).abs() < EPS);
        assert!((personal_bias(&config, Difficulty::Hard, &stats) + 10.0).abs() < EPS);
        // No medium history, so the default applies
        assert_eq!(personal_bias(&config, Difficulty::Medium, &stats), 0.0);
    }

    #[test]
    fn test_bias_is_clamped() {
        let completed = vec![
            tiered("e", 1.0, Some(100.0), Difficulty::Easy),
            tiered("h", 9.0, Some(50.0), Difficulty::Hard),
        ];
        let stats = analyze_history(&GradeAggregator::default(), &completed);
        // overall = 55, easy = 100 -> +45 clamped to +10
        let config = PlannerConfig::default();
        assert_eq!(personal_bias(&config, Difficulty::Easy, &stats), 10.0);
        assert!((personal_bias(&config, Difficulty::Hard, &stats) + 5.0).abs() < EPS);
    }
}
