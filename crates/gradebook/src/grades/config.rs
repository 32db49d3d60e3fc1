/// Tunable constants for grade resolution and strategy planning
use super::error::GradeError;
use super::types::Difficulty;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Lowest grade that counts as passing
pub const MIN_PASS_GRADE: f64 = 60.0;

/// Component names containing any of these (case-insensitive) count as the final exam
pub const DEFAULT_FINAL_EXAM_KEYWORDS: [&str; 4] = ["מבחן", "בחינה", "exam", "final"];

/// Bias applied to a difficulty tier when the student has no history in it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultBias {
    pub easy: f64,
    pub medium: f64,
    pub hard: f64,
}

impl DefaultBias {
    pub fn for_tier(&self, tier: Difficulty) -> f64 {
        match tier {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }
}

impl Default for DefaultBias {
    fn default() -> Self {
        Self {
            easy: 2.0,
            medium: 0.0,
            hard: -2.0,
        }
    }
}

/// Planner configuration, loadable from a JSON file.
///
/// Every field falls back to its default, so a file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub min_pass_grade: f64,
    pub default_bias: DefaultBias,
    /// Personal bias is clamped to `[-bias_limit, bias_limit]`
    pub bias_limit: f64,
    /// Credit-points the re-balanced plan may miss the target by
    pub balance_tolerance: f64,
    pub max_balance_iterations: u32,
    pub final_exam_keywords: Vec<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            min_pass_grade: MIN_PASS_GRADE,
            default_bias: DefaultBias::default(),
            bias_limit: 10.0,
            balance_tolerance: 0.5,
            max_balance_iterations: 100,
            final_exam_keywords: DEFAULT_FINAL_EXAM_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

impl PlannerConfig {
    /// Loads the planner config from a JSON file
    ///
    /// # Arguments
    /// * `path` - Path to the JSON file
    ///
    /// # Returns
    /// * `Ok(PlannerConfig)` - Parsed and validated config
    /// * `Err` - If the file can't be read, parsed, or holds contradictory values
    pub fn load_from_file(path: &Path) -> Result<Self, GradeError> {
        let content = fs::read_to_string(path)?;
        let config: PlannerConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the config if a path is given and exists, otherwise returns defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, GradeError> {
        match path {
            Some(p) if p.exists() => Self::load_from_file(p),
            _ => Ok(Self::default()),
        }
    }

    /// Rejects settings the planner can't work with.
    pub fn validate(&self) -> Result<(), GradeError> {
        let fail = |message: &str| {
            Err(GradeError::Config {
                message: message.to_string(),
            })
        };

        if !(0.0..=100.0).contains(&self.min_pass_grade) {
            return fail("min_pass_grade must be within 0-100");
        }
        if !self.bias_limit.is_finite() || self.bias_limit < 0.0 {
            return fail("bias_limit must be non-negative");
        }
        if !self.balance_tolerance.is_finite() || self.balance_tolerance < 0.0 {
            return fail("balance_tolerance must be non-negative");
        }
        if self.max_balance_iterations == 0 {
            return fail("max_balance_iterations must be at least 1");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"min_pass_grade": 55, "default_bias": {{"easy": 3, "medium": 0, "hard": -4}}}}"#).unwrap();

        let config = PlannerConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.min_pass_grade, 55.0);
        assert_eq!(config.default_bias.for_tier(Difficulty::Hard), -4.0);
        assert_eq!(config.bias_limit, 10.0);
        assert_eq!(config.max_balance_iterations, 100);
        assert_eq!(config.final_exam_keywords.len(), 4);
    }

    #[test]
    fn test_contradictory_config_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_balance_iterations": 0}}"#).unwrap();

        assert!(matches!(
            PlannerConfig::load_from_file(file.path()),
            Err(GradeError::Config { .. })
        ));
    }

    #[test]
    fn test_missing_path_falls_back_to_defaults() {
        let config =
            PlannerConfig::load_or_default(Some(Path::new("/nonexistent/planner.json"))).unwrap();
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(PlannerConfig::load_or_default(None).unwrap(), PlannerConfig::default());
    }
}
