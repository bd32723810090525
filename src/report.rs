use std::fmt::Write;

use crate::attendance::{calculate_attendance_stats, AttendanceBand};
use crate::performance::calculate_academic_performance;
use crate::roster::{catalog_summary, roster_summary};
use crate::store::RecordStore;

pub fn build_report(store: &RecordStore) -> String {
    let roster = roster_summary(store);
    let catalog = catalog_summary(store);

    let mut output = String::new();

    let _ = writeln!(output, "# School Standing Report");
    let _ = writeln!(output);
    let _ = writeln!(output, "## Roster");
    let _ = writeln!(
        output,
        "- {} students ({} male, {} female)",
        roster.total, roster.male, roster.female
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Course Catalog");
    if catalog.course_count == 0 {
        let _ = writeln!(output, "No courses recorded.");
    } else {
        let _ = writeln!(
            output,
            "- {} courses, {} credits, average {:.1}%",
            catalog.course_count, catalog.total_credits, catalog.average_percentage
        );
        for course in store.courses() {
            let _ = writeln!(
                output,
                "- {} ({}) taught by {}: {} at {:.1}%",
                course.name, course.code, course.instructor, course.grade, course.percentage
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Student Standing");
    let mut watchlist = Vec::new();

    if store.students().is_empty() {
        let _ = writeln!(output, "No students recorded.");
    } else {
        for student in store.students() {
            let stats = calculate_attendance_stats(store, &student.id);
            let performance = calculate_academic_performance(store, &student.id);
            let _ = writeln!(
                output,
                "- {} ({}): attendance {:.1}% ({}/{} days, {} leave), course average {:.1}%, overall {:.1} ({})",
                student.name,
                student.id,
                stats.percentage,
                stats.present,
                stats.total,
                stats.leave,
                performance.academic_score,
                performance.overall_score,
                performance.grade
            );

            let band = AttendanceBand::from_percentage(stats.percentage);
            if band != AttendanceBand::Good {
                watchlist.push((student, stats, band));
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Attendance Watchlist");
    if watchlist.is_empty() {
        let _ = writeln!(output, "Every student is at or above 80% attendance.");
    } else {
        watchlist.sort_by(|a, b| a.1.percentage.total_cmp(&b.1.percentage));
        for (student, stats, band) in watchlist {
            let _ = writeln!(
                output,
                "- {} ({}) at {:.1}%: {} absent, {}",
                student.name,
                student.id,
                stats.percentage,
                stats.absent,
                band.label()
            );
        }
    }

    let mut recent = store.attendance().to_vec();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Attendance");

    if recent.is_empty() {
        let _ = writeln!(output, "No attendance recorded.");
    } else {
        for record in recent.iter().take(5) {
            let name = store
                .student(&record.student_id)
                .map_or(record.student_id.as_str(), |student| student.name.as_str());
            let _ = writeln!(
                output,
                "- {} ({}) {} {}: {}",
                name,
                record.course,
                record.date,
                record.time,
                record.status.as_str()
            );
        }
    }

    output
}
