/// Types for gradebook snapshots and computed results
use super::error::GradeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single weighted contributor to a course grade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeComponent {
    pub id: String,
    #[serde(default)]
    pub course_id: String,
    pub name: String,
    pub weight: f64,
    /// `None` while the component is ungraded
    #[serde(default)]
    pub score: Option<f64>,
    /// Marks a waivable "protective" exam (Magen)
    #[serde(default)]
    pub is_magen: bool,
    /// Explicit final exam marker; takes precedence over name detection
    #[serde(default)]
    pub is_final: bool,
}

impl GradeComponent {
    /// Checks the component's numeric ranges.
    pub fn validate(&self) -> Result<(), GradeError> {
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(GradeError::InvalidWeight {
                component: self.name.clone(),
                weight: self.weight,
            });
        }

        if let Some(score) = self.score {
            if !score.is_finite() || !(0.0..=100.0).contains(&score) {
                return Err(GradeError::ScoreOutOfRange {
                    component: self.name.clone(),
                    score,
                });
            }
        }

        Ok(())
    }
}

/// Difficulty tier used by the strategy planner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(GradeError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// Academic term of a semester. Only used for display ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    A,
    B,
    Summer,
    Yearly,
}

impl Term {
    pub const fn as_str(self) -> &'static str {
        match self {
            Term::A => "A",
            Term::B => "B",
            Term::Summer => "Summer",
            Term::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Term {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Term::A),
            "B" | "b" => Ok(Term::B),
            s if s.eq_ignore_ascii_case("summer") => Ok(Term::Summer),
            s if s.eq_ignore_ascii_case("yearly") => Ok(Term::Yearly),
            _ => Err(GradeError::UnknownTerm(s.to_string())),
        }
    }
}

/// A gradeable course and its components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    #[serde(default)]
    pub semester_id: String,
    pub name: String,
    pub credits: f64,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// The student's own aspiration; never used as planner input
    #[serde(default)]
    pub target_grade: Option<f64>,
    #[serde(default)]
    pub is_binary: bool,
    #[serde(default)]
    pub components: Vec<GradeComponent>,
}

impl Course {
    pub fn validate(&self) -> Result<(), GradeError> {
        if !self.credits.is_finite() || self.credits <= 0.0 {
            return Err(GradeError::InvalidCredits {
                course: self.name.clone(),
                credits: self.credits,
            });
        }

        for component in &self.components {
            component.validate()?;
        }

        Ok(())
    }
}

/// A time bucket of courses for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Semester {
    pub id: String,
    pub user_id: String,
    pub academic_year: u32,
    pub term: Term,
    #[serde(default)]
    pub legacy_credits: f64,
    #[serde(default)]
    pub legacy_gpa: f64,
    /// Whether this semester's displayed GPA blends in its legacy block
    #[serde(default)]
    pub is_legacy_visible: bool,
    #[serde(default)]
    pub courses: Vec<Course>,
}

impl Semester {
    pub fn legacy_block(&self) -> LegacyBlock {
        LegacyBlock {
            credits: self.legacy_credits,
            gpa: self.legacy_gpa,
        }
    }

    pub fn validate(&self) -> Result<(), GradeError> {
        if self.academic_year == 0 {
            return Err(GradeError::InvalidAcademicYear(self.academic_year));
        }

        self.legacy_block().validate()?;

        for course in &self.courses {
            course.validate()?;
        }

        Ok(())
    }
}

/// Credits/GPA earned before the student started using the gradebook.
///
/// Blended into roll-ups as a synthetic fully graded course.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyBlock {
    #[serde(default)]
    pub credits: f64,
    #[serde(default)]
    pub gpa: f64,
}

impl LegacyBlock {
    pub fn new(credits: f64, gpa: f64) -> Self {
        Self { credits, gpa }
    }

    /// A block contributes only when it carries credits.
    pub fn is_active(&self) -> bool {
        self.credits > 0.0
    }

    pub fn validate(&self) -> Result<(), GradeError> {
        if !self.credits.is_finite() || self.credits < 0.0 {
            return Err(GradeError::InvalidLegacyCredits(self.credits));
        }
        if !self.gpa.is_finite() || !(0.0..=100.0).contains(&self.gpa) {
            return Err(GradeError::LegacyGpaOutOfRange(self.gpa));
        }
        Ok(())
    }
}

/// Everything the engine needs about one user, as handed over by persistence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradebookSnapshot {
    #[serde(default)]
    pub legacy: LegacyBlock,
    #[serde(default)]
    pub semesters: Vec<Semester>,
}

impl GradebookSnapshot {
    pub fn validate(&self) -> Result<(), GradeError> {
        self.legacy.validate()?;
        for semester in &self.semesters {
            semester.validate()?;
        }
        Ok(())
    }

    /// Iterates over every course in every semester.
    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.semesters.iter().flat_map(|s| s.courses.iter())
    }
}

/// Result of resolving a course grade under the Magen rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseGrade {
    pub grade: Option<f64>,
    /// True when dropping the Magen component strictly raised the grade
    pub waiver_dropped: bool,
}

/// Where a course stands with respect to grading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseStatus {
    /// Has at least one component and every component is scored
    Completed,
    /// No component is scored yet
    Future,
    /// Some, but not all, components are scored
    Partial,
}

/// Per-course grade breakdown for display
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseGradeReport {
    pub course_id: String,
    pub course_name: String,
    pub credits: f64,
    pub status: CourseStatus,
    pub grade: Option<f64>,
    pub waiver_dropped: bool,
}

/// Aggregated numbers for one semester
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterSummary {
    pub semester_id: String,
    pub academic_year: u32,
    pub term: Term,
    pub course_count: usize,
    pub graded_course_count: usize,
    pub total_credits: f64,
    pub graded_credits: f64,
    /// Coursework-only GPA
    pub gpa: Option<f64>,
    /// GPA with the semester's legacy block folded in when it is visible
    pub display_gpa: Option<f64>,
    pub courses: Vec<CourseGradeReport>,
}

/// GPA for one academic year
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearGpa {
    pub academic_year: u32,
    pub gpa: Option<f64>,
}

/// Aggregated degree progress data for UI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DegreeSummary {
    pub degree_gpa: Option<f64>,
    pub total_credits: f64,
    pub completed_credits: f64,
    pub years: Vec<YearGpa>,
    pub semesters: Vec<SemesterSummary>,
}

/// A course that still has no grades, as seen by the planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FutureCourse {
    pub id: String,
    pub name: String,
    pub credits: f64,
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl From<&Course> for FutureCourse {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id.clone(),
            name: course.name.clone(),
            credits: course.credits,
            difficulty: course.difficulty,
        }
    }
}

/// Input to the strategy planner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyInput {
    #[serde(rename = "currentGPA", default)]
    pub current_gpa: Option<f64>,
    #[serde(default)]
    pub total_credits_so_far: f64,
    #[serde(rename = "targetGPA")]
    pub target_gpa: f64,
    pub future_courses: Vec<FutureCourse>,
    #[serde(default)]
    pub completed_courses: Vec<Course>,
    pub max_realistic_grade: f64,
}

/// How the planner resolved a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyOutcome {
    /// Recommendations hit the target
    Planned,
    /// Request was rejected before planning
    InvalidInput,
    /// Target needs more than the ceiling on every future course
    TargetOutOfReach,
    /// Passing every future course already meets the target
    TargetAlreadyMet,
}

/// Suggested grade for a single future course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub course_id: String,
    pub course_name: String,
    pub credits: f64,
    pub difficulty: Difficulty,
    pub suggested_grade: f64,
}

impl Recommendation {
    pub fn for_course(course: &FutureCourse, suggested_grade: f64) -> Self {
        Self {
            course_id: course.id.clone(),
            course_name: course.name.clone(),
            credits: course.credits,
            difficulty: course.difficulty,
            suggested_grade,
        }
    }
}

/// Planner response. `success` is false for every outcome but `Planned`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyResult {
    pub success: bool,
    pub outcome: StrategyOutcome,
    pub message: String,
    #[serde(default)]
    pub required_future_average: Option<f64>,
    #[serde(rename = "achievedGPA", default)]
    pub achieved_gpa: Option<f64>,
    pub recommendations: Vec<Recommendation>,
}

impl StrategyResult {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            success: false,
            outcome: StrategyOutcome::InvalidInput,
            message: message.into(),
            required_future_average: None,
            achieved_gpa: None,
            recommendations: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parsing() {
        assert_eq!("Easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!(" hard ".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!(matches!(
            "brutal".parse::<Difficulty>(),
            Err(GradeError::UnknownDifficulty(_))
        ));
    }

    #[test]
    fn test_term_parsing() {
        assert_eq!("summer".parse::<Term>().unwrap(), Term::Summer);
        assert_eq!("A".parse::<Term>().unwrap(), Term::A);
        assert!("C".parse::<Term>().is_err());
        assert!(Term::A < Term::B && Term::B < Term::Summer && Term::Summer < Term::Yearly);
    }

    #[test]
    fn test_course_deserializes_with_defaults() {
        let json = r#"{
            "id": "c1",
            "name": "Calculus",
            "credits": 5,
            "components": [
                {"id": "g1", "name": "Final exam", "weight": 70, "score": 88},
                {"id": "g2", "name": "Magen", "weight": 30, "score": null, "isMagen": true}
            ]
        }"#;

        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.difficulty, Difficulty::Medium);
        assert_eq!(course.components.len(), 2);
        assert!(course.components[1].is_magen);
        assert!(!course.components[0].is_final);
        assert_eq!(course.components[1].score, None);
    }

    #[test]
    fn test_strategy_input_field_names() {
        let json = r#"{
            "currentGPA": 85,
            "totalCreditsSoFar": 60,
            "targetGPA": 90,
            "futureCourses": [{"id": "f1", "name": "Algebra", "credits": 3, "difficulty": "hard"}],
            "maxRealisticGrade": 97
        }"#;

        let input: StrategyInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.current_gpa, Some(85.0));
        assert_eq!(input.future_courses[0].difficulty, Difficulty::Hard);
        assert!(input.completed_courses.is_empty());
    }

    #[test]
    fn test_validation_rejects_bad_ranges() {
        let component = GradeComponent {
            id: "g".into(),
            course_id: "c".into(),
            name: "Quiz".into(),
            weight: -1.0,
            score: Some(50.0),
            is_magen: false,
            is_final: false,
        };
        assert!(matches!(
            component.validate(),
            Err(GradeError::InvalidWeight { .. })
        ));

        let component = GradeComponent {
            weight: 10.0,
            score: Some(101.0),
            ..component
        };
        assert!(matches!(
            component.validate(),
            Err(GradeError::ScoreOutOfRange { .. })
        ));

        assert!(LegacyBlock::new(-3.0, 80.0).validate().is_err());
        assert!(LegacyBlock::new(3.0, 180.0).validate().is_err());
        assert!(LegacyBlock::new(0.0, 0.0).validate().is_ok());
    }
}
