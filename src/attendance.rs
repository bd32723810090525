use log::debug;

use crate::models::{AttendanceRecord, AttendanceStatus};
use crate::performance::round_one_decimal;
use crate::store::RecordStore;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AttendanceStats {
    pub total: u32,
    pub present: u32,
    pub absent: u32,
    pub leave: u32,
    pub percentage: f64,
}

/// Colour band used when showing an attendance percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceBand {
    Good,
    Warning,
    Poor,
}

impl AttendanceBand {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            Self::Good
        } else if percentage >= 60.0 {
            Self::Warning
        } else {
            Self::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Poor => "poor",
        }
    }
}

/// Present days over present plus absent days, as a percentage. Leave is an
/// excused absence and stays out of the denominator.
pub fn attendance_percentage(present: u32, absent: u32) -> f64 {
    let effective = f64::from(present) + f64::from(absent);
    if effective == 0.0 {
        0.0
    } else {
        f64::from(present) / effective * 100.0
    }
}

pub fn calculate_attendance_stats(store: &RecordStore, student_id: &str) -> AttendanceStats {
    let records: Vec<&AttendanceRecord> = store
        .attendance()
        .iter()
        .filter(|record| record.student_id == student_id)
        .collect();

    if records.is_empty() {
        if let Some(summary) = store
            .student(student_id)
            .and_then(|student| student.attendance.as_ref())
        {
            debug!("student {student_id} has no attendance records, using summary");
            return AttendanceStats {
                total: summary.total(),
                present: summary.present(),
                absent: summary.absent(),
                leave: summary.leave(),
                percentage: round_one_decimal(summary.percentage()),
            };
        }
    }

    let count = |status: AttendanceStatus| -> u32 {
        let n = records.iter().filter(|record| record.status == status).count();
        u32::try_from(n).unwrap_or(u32::MAX)
    };
    let present = count(AttendanceStatus::Present);
    let absent = count(AttendanceStatus::Absent);

    AttendanceStats {
        total: u32::try_from(records.len()).unwrap_or(u32::MAX),
        present,
        absent,
        leave: count(AttendanceStatus::Leave),
        percentage: round_one_decimal(attendance_percentage(present, absent)),
    }
}

/// A student's attendance records, newest first.
pub fn attendance_history<'a>(
    store: &'a RecordStore,
    student_id: &str,
) -> Vec<&'a AttendanceRecord> {
    let mut history: Vec<&AttendanceRecord> = store
        .attendance()
        .iter()
        .filter(|record| record.student_id == student_id)
        .collect();
    history.sort_by(|a, b| b.date.cmp(&a.date));
    history
}
