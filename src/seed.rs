use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    Assignment, AttendanceRecord, AttendanceStatus, AttendanceSummary, Course, CourseAttendance,
    Gender, Student,
};
use crate::store::RecordStore;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid seed json in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid attendance csv {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// The three collections a store starts from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default, rename = "attendanceData")]
    pub attendance: Vec<AttendanceRecord>,
}

pub fn load_seed(path: &Path) -> Result<SeedData, SeedError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let seed: SeedData = serde_json::from_str(&raw).map_err(|source| SeedError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        "loaded {} students, {} courses, {} attendance records from {}",
        seed.students.len(),
        seed.courses.len(),
        seed.attendance.len(),
        path.display()
    );
    Ok(seed)
}

/// Appends attendance rows from a CSV file with the header
/// `student_id,course,date,time,status`. Every row is parsed before any is
/// stored, so a bad row leaves the store untouched.
pub fn import_attendance_csv(store: &mut RecordStore, path: &Path) -> Result<usize, SeedError> {
    #[derive(Deserialize)]
    struct CsvRow {
        student_id: String,
        course: String,
        date: NaiveDate,
        time: String,
        status: String,
    }

    let csv_error = |source| SeedError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_error)?;

    let mut records = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        let row = result.map_err(csv_error)?;
        records.push(AttendanceRecord {
            id: String::new(),
            student_id: row.student_id,
            course: row.course,
            date: row.date,
            time: row.time,
            status: row.status.as_str().into(),
        });
    }

    let imported = records.len();
    for record in records {
        store.add_attendance(record);
    }
    info!("imported {imported} attendance records from {}", path.display());
    Ok(imported)
}

fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap_or_default()
}

impl SeedData {
    /// Small built-in dataset used when no seed file is configured.
    pub fn demo() -> Self {
        let courses = vec![
            (
                "1",
                "Mathematics",
                "MATH101",
                "Dr. Helen Carter",
                4,
                "Algebra, functions and an introduction to calculus.",
                "A",
                92.0,
                vec![("Quadratics Quiz", "A", 94.0), ("Functions Test", "A-", 88.0)],
            ),
            (
                "2",
                "Physics",
                "PHY101",
                "Prof. Samuel Okafor",
                3,
                "Mechanics, energy and waves.",
                "B+",
                78.0,
                vec![("Kinematics Lab", "B+", 79.0), ("Energy Test", "B", 74.0)],
            ),
            (
                "3",
                "Chemistry",
                "CHEM101",
                "Dr. Priya Raman",
                3,
                "Atomic structure, bonding and reactions.",
                "A-",
                85.0,
                vec![("Periodic Table Quiz", "A", 90.0)],
            ),
            (
                "4",
                "English Literature",
                "ENG102",
                "Ms. Laura Bennett",
                2,
                "Reading and essay writing on modern fiction.",
                "B",
                72.0,
                Vec::new(),
            ),
        ];

        let courses = courses
            .into_iter()
            .map(
                |(id, name, code, instructor, credits, description, grade, percentage, work)| {
                    Course {
                        id: id.to_string(),
                        name: name.to_string(),
                        code: code.to_string(),
                        instructor: instructor.to_string(),
                        credits,
                        description: description.to_string(),
                        grade: grade.to_string(),
                        percentage,
                        attendance: CourseAttendance {
                            total: 40,
                            present: 35,
                            percentage: 87.5,
                        },
                        assignments: work
                            .into_iter()
                            .map(|(name, grade, percentage)| Assignment {
                                name: name.to_string(),
                                grade: grade.to_string(),
                                percentage,
                            })
                            .collect(),
                    }
                },
            )
            .collect();

        let students = vec![
            (
                "1",
                "Avery Lee",
                "avery.lee@school.edu",
                Gender::Female,
                "Morgan Lee",
                vec!["Mathematics", "Physics", "Chemistry"],
                None,
            ),
            (
                "2",
                "Jules Moreno",
                "jules.moreno@school.edu",
                Gender::Male,
                "Rosa Moreno",
                vec!["Mathematics", "English Literature"],
                None,
            ),
            (
                "3",
                "Kiara Patel",
                "kiara.patel@school.edu",
                Gender::Female,
                "Anil Patel",
                vec!["Chemistry", "Physics"],
                Some(AttendanceSummary {
                    total: Some(40),
                    present: Some(35),
                    percentage: Some(87.5),
                    ..AttendanceSummary::default()
                }),
            ),
            (
                "4",
                "Noah Fischer",
                "noah.fischer@school.edu",
                Gender::Male,
                "Greta Fischer",
                vec!["English Literature", "Art History"],
                Some(AttendanceSummary {
                    total: Some(30),
                    present: Some(17),
                    leave: Some(3),
                    ..AttendanceSummary::default()
                }),
            ),
        ];

        let students = students
            .into_iter()
            .map(|(id, name, email, gender, parent, enrolled, attendance)| Student {
                id: id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                phone: format!("+1 555 010{id}"),
                address: format!("{id} College Avenue"),
                date_of_birth: "2008-04-12".to_string(),
                blood_group: "O+".to_string(),
                gender: Some(gender),
                parent_name: parent.to_string(),
                parent_contact: format!("+1 555 020{id}"),
                profile_image: None,
                courses: enrolled.into_iter().map(str::to_string).collect(),
                attendance,
            })
            .collect();

        let attendance = vec![
            ("1", "1", "Mathematics", day(1, 15), "Morning", AttendanceStatus::Present),
            ("2", "1", "Physics", day(1, 15), "Afternoon", AttendanceStatus::Present),
            ("3", "1", "Chemistry", day(1, 16), "Morning", AttendanceStatus::Leave),
            ("4", "1", "Mathematics", day(1, 17), "Morning", AttendanceStatus::Present),
            ("5", "1", "Physics", day(1, 18), "Afternoon", AttendanceStatus::Absent),
            ("6", "2", "Mathematics", day(1, 15), "Morning", AttendanceStatus::Absent),
            ("7", "2", "English Literature", day(1, 16), "Evening", AttendanceStatus::Present),
            ("8", "2", "Mathematics", day(1, 17), "Morning", AttendanceStatus::Absent),
            ("9", "2", "English Literature", day(1, 18), "Evening", AttendanceStatus::Leave),
        ];

        let attendance = attendance
            .into_iter()
            .map(|(id, student_id, course, date, time, status)| AttendanceRecord {
                id: id.to_string(),
                student_id: student_id.to_string(),
                course: course.to_string(),
                date,
                time: time.to_string(),
                status,
            })
            .collect();

        Self {
            students,
            courses,
            attendance,
        }
    }
}
