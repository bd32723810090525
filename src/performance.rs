use std::fmt;

use crate::attendance::calculate_attendance_stats;
use crate::store::RecordStore;

const ATTENDANCE_WEIGHT: f64 = 0.7;
const ACADEMIC_WEIGHT: f64 = 0.3;

/// Half-up rounding to one decimal place: `floor(10x + 0.5) / 10`.
pub fn round_one_decimal(x: f64) -> f64 {
    ((10.0 * x) + 0.5).floor() / 10.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    APlus,
    A,
    AMinus,
    BPlus,
    B,
    BMinus,
    CPlus,
    C,
    CMinus,
    D,
    F,
}

/// Lower bounds checked highest first; anything below the last one is an F.
const GRADE_THRESHOLDS: [(f64, Grade); 10] = [
    (90.0, Grade::APlus),
    (85.0, Grade::A),
    (80.0, Grade::AMinus),
    (75.0, Grade::BPlus),
    (70.0, Grade::B),
    (65.0, Grade::BMinus),
    (60.0, Grade::CPlus),
    (55.0, Grade::C),
    (50.0, Grade::CMinus),
    (45.0, Grade::D),
];

impl Grade {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::AMinus => "A-",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::BMinus => "B-",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::CMinus => "C-",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn grade_from_score(score: f64) -> Grade {
    GRADE_THRESHOLDS
        .iter()
        .find(|(floor, _)| score >= *floor)
        .map_or(Grade::F, |(_, grade)| *grade)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcademicPerformance {
    pub overall_score: f64,
    pub attendance_score: f64,
    pub academic_score: f64,
    pub grade: Grade,
}

/// Mean percentage over the student's enrolled courses. Names that match no
/// course contribute 0.
pub fn calculate_course_average(store: &RecordStore, student_id: &str) -> f64 {
    let Some(student) = store.student(student_id) else {
        return 0.0;
    };
    if student.courses.is_empty() {
        return 0.0;
    }

    let sum: f64 = student
        .courses
        .iter()
        .map(|name| store.course_by_name(name).map_or(0.0, |course| course.percentage))
        .sum();

    round_one_decimal(sum / student.courses.len() as f64)
}

pub fn calculate_academic_performance(
    store: &RecordStore,
    student_id: &str,
) -> AcademicPerformance {
    let attendance = calculate_attendance_stats(store, student_id);
    let course_average = calculate_course_average(store, student_id);

    let overall = attendance.percentage * ATTENDANCE_WEIGHT + course_average * ACADEMIC_WEIGHT;

    AcademicPerformance {
        overall_score: round_one_decimal(overall),
        attendance_score: attendance.percentage,
        academic_score: course_average,
        grade: grade_from_score(overall),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttendanceSummary, Course, Student};
    use crate::seed::SeedData;

    fn course(name: &str, percentage: f64) -> Course {
        Course {
            id: name.to_lowercase(),
            name: name.to_string(),
            percentage,
            ..Course::default()
        }
    }

    fn student(id: &str, courses: &[&str]) -> Student {
        Student {
            id: id.to_string(),
            courses: courses.iter().map(|name| name.to_string()).collect(),
            ..Student::default()
        }
    }

    fn store_with(students: Vec<Student>, courses: Vec<Course>) -> RecordStore {
        RecordStore::from_seed(SeedData {
            students,
            courses,
            attendance: Vec::new(),
        })
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_one_decimal(0.0), 0.0);
        assert_eq!(round_one_decimal(66.666), 66.7);
        assert_eq!(round_one_decimal(3.54), 3.5);
        assert_eq!(round_one_decimal(87.25), 87.3);
    }

    #[test]
    fn grade_table_boundaries() {
        assert_eq!(grade_from_score(87.0), Grade::A);
        assert_eq!(grade_from_score(89.99), Grade::A);
        assert_eq!(grade_from_score(90.0), Grade::APlus);
        assert_eq!(grade_from_score(75.0), Grade::BPlus);
        assert_eq!(grade_from_score(45.0), Grade::D);
        assert_eq!(grade_from_score(44.9), Grade::F);
        assert_eq!(grade_from_score(0.0), Grade::F);
    }

    #[test]
    fn grade_displays_as_letter() {
        assert_eq!(Grade::BMinus.to_string(), "B-");
        assert_eq!(Grade::APlus.to_string(), "A+");
    }

    #[test]
    fn course_average_is_mean_of_enrolled_courses() {
        let store = store_with(
            vec![student("1", &["Mathematics", "Physics"]), student("2", &[])],
            vec![course("Mathematics", 80.0), course("Physics", 90.0)],
        );

        assert_eq!(calculate_course_average(&store, "1"), 85.0);
        assert_eq!(calculate_course_average(&store, "2"), 0.0);
        assert_eq!(calculate_course_average(&store, "missing"), 0.0);
    }

    #[test]
    fn unresolved_course_counts_as_zero() {
        let store = store_with(
            vec![student("1", &["Mathematics", "Astronomy", "physics"])],
            vec![course("Mathematics", 90.0), course("Physics", 90.0)],
        );

        assert_eq!(calculate_course_average(&store, "1"), 30.0);
    }

    #[test]
    fn duplicate_course_names_use_first_match() {
        let store = store_with(
            vec![student("1", &["Art"])],
            vec![course("Art", 70.0), course("Art", 100.0)],
        );

        assert_eq!(calculate_course_average(&store, "1"), 70.0);
    }

    #[test]
    fn performance_weights_attendance_and_courses() {
        let mut enrolled = student("1", &["Mathematics", "Physics"]);
        enrolled.attendance = Some(AttendanceSummary {
            total: Some(40),
            present: Some(30),
            percentage: Some(75.0),
            ..AttendanceSummary::default()
        });
        let store = store_with(
            vec![enrolled],
            vec![course("Mathematics", 80.0), course("Physics", 90.0)],
        );

        let performance = calculate_academic_performance(&store, "1");
        assert_eq!(performance.attendance_score, 75.0);
        assert_eq!(performance.academic_score, 85.0);
        // 75 * 0.7 + 85 * 0.3
        assert_eq!(performance.overall_score, 78.0);
        assert_eq!(performance.grade, Grade::BPlus);
    }

    #[test]
    fn unknown_student_scores_f() {
        let store = store_with(Vec::new(), Vec::new());
        let performance = calculate_academic_performance(&store, "nobody");

        assert_eq!(performance.overall_score, 0.0);
        assert_eq!(performance.grade, Grade::F);
    }
}
