/// Credit-weighted GPA roll-ups over courses, semesters and whole degrees
use super::aggregator::{weighted_mean, GradeAggregator};
use super::types::*;
use std::collections::BTreeSet;

/// Aggregates course grades into semester, year and degree GPAs.
///
/// Ungraded courses are left out of both numerator and denominator. A result is
/// `None` whenever no graded credits remain.
#[derive(Debug, Clone, Default)]
pub struct GpaCalculator {
    aggregator: GradeAggregator,
}

impl GpaCalculator {
    pub fn new(aggregator: GradeAggregator) -> Self {
        Self { aggregator }
    }

    pub fn aggregator(&self) -> &GradeAggregator {
        &self.aggregator
    }

    /// Returns the `(grade, credits)` pairs of the courses that have a grade.
    fn graded<'a, I>(&'a self, courses: I) -> impl Iterator<Item = (f64, f64)> + 'a
    where
        I: IntoIterator<Item = &'a Course>,
        I::IntoIter: 'a,
    {
        courses.into_iter().filter_map(move |course| {
            self.aggregator
                .compute(&course.components)
                .grade
                .map(|grade| (grade, course.credits))
        })
    }

    /// GPA of a set of courses (coursework only).
    pub fn semester_gpa(&self, courses: &[Course]) -> Option<f64> {
        weighted_mean(self.graded(courses))
    }

    /// GPA of a set of courses with a legacy block folded in as one more graded course.
    pub fn hybrid_semester_gpa(&self, courses: &[Course], legacy: LegacyBlock) -> Option<f64> {
        let legacy_pair = legacy.is_active().then_some((legacy.gpa, legacy.credits));
        weighted_mean(legacy_pair.into_iter().chain(self.graded(courses)))
    }

    /// Degree GPA across all semesters.
    ///
    /// Blends the global legacy block and every semester's own legacy block.
    pub fn degree_gpa(&self, semesters: &[Semester], global_legacy: LegacyBlock) -> Option<f64> {
        let legacy_pairs = std::iter::once(global_legacy)
            .chain(semesters.iter().map(Semester::legacy_block))
            .filter(LegacyBlock::is_active)
            .map(|block| (block.gpa, block.credits));

        let course_pairs = self.graded(semesters.iter().flat_map(|s| s.courses.iter()));

        weighted_mean(legacy_pairs.chain(course_pairs))
    }

    /// Coursework-only GPA of all semesters in the given academic year.
    pub fn year_gpa(&self, semesters: &[Semester], year: u32) -> Option<f64> {
        weighted_mean(
            self.graded(
                semesters
                    .iter()
                    .filter(|s| s.academic_year == year)
                    .flat_map(|s| s.courses.iter()),
            ),
        )
    }

    /// Builds the per-course breakdown of a course.
    pub fn course_report(&self, course: &Course) -> CourseGradeReport {
        let result = self.aggregator.compute(&course.components);
        CourseGradeReport {
            course_id: course.id.clone(),
            course_name: course.name.clone(),
            credits: course.credits,
            status: classify_course(course),
            grade: result.grade,
            waiver_dropped: result.waiver_dropped,
        }
    }

    /// Summarizes a single semester.
    pub fn semester_summary(&self, semester: &Semester) -> SemesterSummary {
        let courses: Vec<CourseGradeReport> = semester
            .courses
            .iter()
            .map(|c| self.course_report(c))
            .collect();

        let graded: Vec<&CourseGradeReport> = courses.iter().filter(|c| c.grade.is_some()).collect();

        let gpa = self.semester_gpa(&semester.courses);
        let display_gpa = if semester.is_legacy_visible {
            self.hybrid_semester_gpa(&semester.courses, semester.legacy_block())
        } else {
            gpa
        };

        SemesterSummary {
            semester_id: semester.id.clone(),
            academic_year: semester.academic_year,
            term: semester.term,
            course_count: courses.len(),
            graded_course_count: graded.len(),
            total_credits: courses.iter().map(|c| c.credits).sum(),
            graded_credits: graded.iter().map(|c| c.credits).sum(),
            gpa,
            display_gpa,
            courses,
        }
    }

    /// Computes degree-level progress for a snapshot.
    pub fn degree_summary(&self, snapshot: &GradebookSnapshot) -> DegreeSummary {
        let mut semesters: Vec<SemesterSummary> = snapshot
            .semesters
            .iter()
            .map(|s| self.semester_summary(s))
            .collect();
        semesters.sort_by_key(|s| (s.academic_year, s.term));

        let years: BTreeSet<u32> = snapshot.semesters.iter().map(|s| s.academic_year).collect();
        let years = years
            .into_iter()
            .map(|academic_year| YearGpa {
                academic_year,
                gpa: self.year_gpa(&snapshot.semesters, academic_year),
            })
            .collect();

        DegreeSummary {
            degree_gpa: self.degree_gpa(&snapshot.semesters, snapshot.legacy),
            total_credits: semesters.iter().map(|s| s.total_credits).sum(),
            completed_credits: semesters.iter().map(|s| s.graded_credits).sum(),
            years,
            semesters,
        }
    }

    /// Credits already behind the student: completed courses plus all legacy blocks.
    pub fn credits_so_far(&self, snapshot: &GradebookSnapshot) -> f64 {
        let legacy: f64 = std::iter::once(snapshot.legacy)
            .chain(snapshot.semesters.iter().map(Semester::legacy_block))
            .filter(LegacyBlock::is_active)
            .map(|block| block.credits)
            .sum();

        let completed: f64 = snapshot
            .courses()
            .filter(|c| classify_course(c) == CourseStatus::Completed)
            .map(|c| c.credits)
            .sum();

        legacy + completed
    }
}

/// Places a course in the completed / future / partial split.
pub fn classify_course(course: &Course) -> CourseStatus {
    let scored = course
        .components
        .iter()
        .filter(|c| c.score.is_some())
        .count();

    if scored == 0 {
        CourseStatus::Future
    } else if scored == course.components.len() {
        CourseStatus::Completed
    } else {
        CourseStatus::Partial
    }
}

/// Splits all courses into `(completed, future)`. Partially graded courses land in neither.
pub fn split_courses(semesters: &[Semester]) -> (Vec<Course>, Vec<Course>) {
    let mut completed = Vec::new();
    let mut future = Vec::new();

    for course in semesters.iter().flat_map(|s| s.courses.iter()) {
        match classify_course(course) {
            CourseStatus::Completed => completed.push(course.clone()),
            CourseStatus::Future => future.push(course.clone()),
            CourseStatus::Partial => {}
        }
    }

    (completed, future)
}

/// Coursework GPA with the default aggregator.
pub fn semester_gpa(courses: &[Course]) -> Option<f64> {
    GpaCalculator::default().semester_gpa(courses)
}

pub fn hybrid_semester_gpa(courses: &[Course], legacy_credits: f64, legacy_gpa: f64) -> Option<f64> {
    GpaCalculator::default().hybrid_semester_gpa(courses, LegacyBlock::new(legacy_credits, legacy_gpa))
}

pub fn degree_gpa(semesters: &[Semester], global_legacy_credits: f64, global_legacy_gpa: f64) -> Option<f64> {
    GpaCalculator::default().degree_gpa(
        semesters,
        LegacyBlock::new(global_legacy_credits, global_legacy_gpa),
    )
}

pub fn year_gpa(semesters: &[Semester], year: u32) -> Option<f64> {
    GpaCalculator::default().year_gpa(semesters, year)
}
