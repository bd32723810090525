use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::attendance::attendance_percentage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Case-insensitive; anything else is no recorded gender.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => None,
        }
    }
}

/// Attendance mark on a single record. Any value other than the three known
/// statuses is kept as `Unrecognized`: it still counts towards a total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Leave,
    Unrecognized,
}

impl Default for AttendanceStatus {
    fn default() -> Self {
        Self::Unrecognized
    }
}

impl AttendanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Leave => "leave",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl<'de> Deserialize<'de> for AttendanceStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(s) => s.as_str().into(),
            _ => Self::Unrecognized,
        })
    }
}

impl From<&str> for AttendanceStatus {
    fn from(value: &str) -> Self {
        match value {
            "present" => Self::Present,
            "absent" => Self::Absent,
            "leave" => Self::Leave,
            _ => Self::Unrecognized,
        }
    }
}

impl From<AttendanceStatus> for String {
    fn from(value: AttendanceStatus) -> Self {
        value.as_str().to_string()
    }
}

/// Pre-aggregated attendance carried on a student when no per-day records
/// exist. Every field may be missing on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub total: Option<u32>,
    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub present: Option<u32>,
    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub leave: Option<u32>,
    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub absent: Option<u32>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub percentage: Option<f64>,
}

impl AttendanceSummary {
    pub fn total(&self) -> u32 {
        self.total.unwrap_or(0)
    }

    pub fn present(&self) -> u32 {
        self.present.unwrap_or(0)
    }

    pub fn leave(&self) -> u32 {
        self.leave.unwrap_or(0)
    }

    /// Explicit absent count, otherwise whatever is left of the total once
    /// present and leave days are taken out (never below zero).
    pub fn absent(&self) -> u32 {
        self.absent.unwrap_or_else(|| {
            self.total()
                .saturating_sub(self.present())
                .saturating_sub(self.leave())
        })
    }

    /// Explicit percentage, otherwise present over present plus absent.
    pub fn percentage(&self) -> f64 {
        self.percentage
            .unwrap_or_else(|| attendance_percentage(self.present(), self.absent()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date_of_birth: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub blood_group: String,
    #[serde(
        default,
        deserialize_with = "lenient_gender",
        skip_serializing_if = "Option::is_none"
    )]
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub parent_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub parent_contact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub courses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendance: Option<AttendanceSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseAttendance {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub total: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub present: u32,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub grade: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub instructor: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub credits: u32,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub grade: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub percentage: f64,
    #[serde(default)]
    pub attendance: CourseAttendance,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "id_string")]
    pub student_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub course: String,
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "lenient_string")]
    pub time: String,
    #[serde(default)]
    pub status: AttendanceStatus,
}

fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn coerce_count(value: &Value) -> Option<u32> {
    // Fractions truncate and negatives are rejected.
    coerce_number(value)
        .filter(|n| *n >= 0.0)
        .map(|n| n.trunc().min(f64::from(u32::MAX)) as u32)
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_number(&value).unwrap_or(0.0))
}

fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_number(&value))
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_count(&value).unwrap_or(0))
}

fn lenient_opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_count(&value))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Course names; non-string entries are dropped and `null` is no courses.
fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_gender<'de, D>(deserializer: D) -> Result<Option<Gender>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(Gender::parse))
}

/// Identifiers arrive as strings or bare numbers; both compare as strings.
pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_status_is_unrecognized() {
        let record: AttendanceRecord = serde_json::from_value(json!({
            "id": "a1",
            "studentId": 7,
            "course": "Physics",
            "date": "2024-03-04",
            "time": "Morning",
            "status": "late"
        }))
        .unwrap();

        assert_eq!(record.status, AttendanceStatus::Unrecognized);
        assert_eq!(record.student_id, "7");
    }

    #[test]
    fn malformed_numbers_coerce_to_zero() {
        let course: Course = serde_json::from_value(json!({
            "id": 3,
            "name": "Chemistry",
            "credits": "4",
            "percentage": "not a number"
        }))
        .unwrap();

        assert_eq!(course.id, "3");
        assert_eq!(course.credits, 4);
        assert_eq!(course.percentage, 0.0);
        assert!(course.assignments.is_empty());
    }

    #[test]
    fn summary_defaults_absent_from_remaining_days() {
        let summary = AttendanceSummary {
            total: Some(40),
            present: Some(30),
            leave: Some(4),
            ..AttendanceSummary::default()
        };

        assert_eq!(summary.absent(), 6);
        assert!((summary.percentage() - 83.333).abs() < 0.01);
    }

    #[test]
    fn summary_absent_never_negative() {
        let summary = AttendanceSummary {
            total: Some(10),
            present: Some(12),
            ..AttendanceSummary::default()
        };

        assert_eq!(summary.absent(), 0);
        assert_eq!(summary.percentage(), 100.0);
    }

    #[test]
    fn student_reads_camel_case_fields() {
        let student: Student = serde_json::from_value(json!({
            "id": "1",
            "name": "Avery Lee",
            "dateOfBirth": "2008-05-14",
            "parentName": "Morgan Lee",
            "gender": "female",
            "courses": ["Mathematics"],
            "attendance": { "total": 40, "present": "35", "percentage": null }
        }))
        .unwrap();

        assert_eq!(student.date_of_birth, "2008-05-14");
        assert_eq!(student.parent_name, "Morgan Lee");
        assert_eq!(student.gender, Some(Gender::Female));
        let summary = student.attendance.unwrap();
        assert_eq!(summary.present, Some(35));
        assert_eq!(summary.percentage, None);
    }

    #[test]
    fn non_string_status_is_unrecognized() {
        for status in [json!(null), json!(3), json!(["present"])] {
            let record: AttendanceRecord = serde_json::from_value(json!({
                "id": "a1",
                "studentId": "1",
                "course": "Physics",
                "date": "2024-03-04",
                "time": "Morning",
                "status": status
            }))
            .unwrap();
            assert_eq!(record.status, AttendanceStatus::Unrecognized);
        }
    }

    #[test]
    fn status_matching_is_case_sensitive() {
        assert_eq!(AttendanceStatus::from("Present"), AttendanceStatus::Unrecognized);
        assert_eq!(AttendanceStatus::from("present"), AttendanceStatus::Present);
    }

    #[test]
    fn null_text_fields_become_empty() {
        let student: Student = serde_json::from_value(json!({
            "id": "1",
            "name": "Avery Lee",
            "phone": null,
            "email": null,
            "address": null,
            "parentName": null,
            "courses": null
        }))
        .unwrap();

        assert_eq!(student.phone, "");
        assert_eq!(student.email, "");
        assert_eq!(student.parent_name, "");
        assert!(student.courses.is_empty());

        let course: Course = serde_json::from_value(json!({
            "id": "2",
            "name": "Physics",
            "instructor": null,
            "assignments": [{ "name": null, "grade": "B", "percentage": "81" }]
        }))
        .unwrap();
        assert_eq!(course.instructor, "");
        assert_eq!(course.assignments[0].name, "");
        assert_eq!(course.assignments[0].percentage, 81.0);
    }

    #[test]
    fn gender_is_case_insensitive_and_optional() {
        let parse = |gender: Value| -> Option<Gender> {
            serde_json::from_value::<Student>(json!({ "id": "1", "gender": gender }))
                .unwrap()
                .gender
        };

        assert_eq!(parse(json!("Male")), Some(Gender::Male));
        assert_eq!(parse(json!("FEMALE")), Some(Gender::Female));
        assert_eq!(parse(json!("other")), None);
        assert_eq!(parse(json!(null)), None);
        assert_eq!(parse(json!(1)), None);
    }
}
