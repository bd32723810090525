//! In-memory school records with derived attendance and academic statistics.

pub mod attendance;
pub mod dispatch;
pub mod models;
pub mod performance;
pub mod report;
pub mod roster;
pub mod seed;
pub mod store;

pub use attendance::{calculate_attendance_stats, AttendanceStats};
pub use dispatch::{apply, Mutation, MutationOutcome};
pub use performance::{
    calculate_academic_performance, calculate_course_average, grade_from_score,
    AcademicPerformance, Grade,
};
pub use seed::{SeedData, SeedError};
pub use store::{RecordStore, SharedStore};
