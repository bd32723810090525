//! Write intents issued by a host and applied to a [`RecordStore`].
//!
//! Intents are plain data so they can be queued or read from a file. They are
//! tagged the way the host spells them: `{"type": "ADD_STUDENT", "payload": {...}}`.

use serde::{Deserialize, Serialize};

use crate::models::{id_string, AttendanceRecord, Course, Student};
use crate::store::RecordStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mutation {
    AddStudent(Student),
    UpdateStudent(Student),
    DeleteStudent(#[serde(deserialize_with = "id_string")] String),
    AddCourse(Course),
    UpdateCourse(Course),
    DeleteCourse(#[serde(deserialize_with = "id_string")] String),
    AddAttendance(AttendanceRecord),
    UpdateAttendance(AttendanceRecord),
    DeleteAttendance(#[serde(deserialize_with = "id_string")] String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum MutationOutcome {
    /// New record stored under this identifier.
    Added { id: String },
    Updated { found: bool },
    Deleted { found: bool },
}

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddStudent(_) => "ADD_STUDENT",
            Self::UpdateStudent(_) => "UPDATE_STUDENT",
            Self::DeleteStudent(_) => "DELETE_STUDENT",
            Self::AddCourse(_) => "ADD_COURSE",
            Self::UpdateCourse(_) => "UPDATE_COURSE",
            Self::DeleteCourse(_) => "DELETE_COURSE",
            Self::AddAttendance(_) => "ADD_ATTENDANCE",
            Self::UpdateAttendance(_) => "UPDATE_ATTENDANCE",
            Self::DeleteAttendance(_) => "DELETE_ATTENDANCE",
        }
    }
}

pub fn apply(store: &mut RecordStore, mutation: Mutation) -> MutationOutcome {
    match mutation {
        Mutation::AddStudent(student) => MutationOutcome::Added {
            id: store.add_student(student).id,
        },
        Mutation::UpdateStudent(student) => MutationOutcome::Updated {
            found: store.update_student(student),
        },
        Mutation::DeleteStudent(id) => MutationOutcome::Deleted {
            found: store.delete_student(&id),
        },
        Mutation::AddCourse(course) => MutationOutcome::Added {
            id: store.add_course(course).id,
        },
        Mutation::UpdateCourse(course) => MutationOutcome::Updated {
            found: store.update_course(course),
        },
        Mutation::DeleteCourse(id) => MutationOutcome::Deleted {
            found: store.delete_course(&id),
        },
        Mutation::AddAttendance(record) => MutationOutcome::Added {
            id: store.add_attendance(record).id,
        },
        Mutation::UpdateAttendance(record) => MutationOutcome::Updated {
            found: store.update_attendance(record),
        },
        Mutation::DeleteAttendance(id) => MutationOutcome::Deleted {
            found: store.delete_attendance(&id),
        },
    }
}

pub fn apply_all(
    store: &mut RecordStore,
    mutations: impl IntoIterator<Item = Mutation>,
) -> Vec<MutationOutcome> {
    mutations
        .into_iter()
        .map(|mutation| apply(store, mutation))
        .collect()
}
