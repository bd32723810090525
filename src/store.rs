use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use log::debug;

use crate::models::{AttendanceRecord, Course, Student};
use crate::seed::SeedData;

/// Issues timestamp-derived identifiers that strictly increase, even when two
/// entities are created within the same millisecond.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn next_id(&mut self) -> String {
        self.next_from(Utc::now().timestamp_millis())
    }

    pub fn next_from(&mut self, now_millis: i64) -> String {
        self.last = now_millis.max(self.last + 1);
        self.last.to_string()
    }
}

/// In-memory owner of the three record collections.
#[derive(Debug, Default)]
pub struct RecordStore {
    students: Vec<Student>,
    courses: Vec<Course>,
    attendance: Vec<AttendanceRecord>,
    ids: IdGenerator,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: SeedData) -> Self {
        Self {
            students: seed.students,
            courses: seed.courses,
            attendance: seed.attendance,
            ids: IdGenerator::default(),
        }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn attendance(&self) -> &[AttendanceRecord] {
        &self.attendance
    }

    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|student| student.id == id)
    }

    /// First course with exactly this name.
    pub fn course_by_name(&self, name: &str) -> Option<&Course> {
        self.courses.iter().find(|course| course.name == name)
    }

    pub fn add_student(&mut self, mut student: Student) -> Student {
        student.id = fresh_id(&mut self.ids, |id| {
            self.students.iter().any(|existing| existing.id == id)
        });
        debug!("added student {} ({})", student.id, student.name);
        self.students.push(student.clone());
        student
    }

    /// Replaces the student sharing `student.id`. Returns whether one matched.
    pub fn update_student(&mut self, student: Student) -> bool {
        let found = replace_matching(&mut self.students, student, |s| &s.id);
        log_missing("update", "student", found);
        found
    }

    pub fn delete_student(&mut self, id: &str) -> bool {
        let found = remove_matching(&mut self.students, id, |s| &s.id);
        log_missing("delete", "student", found);
        found
    }

    pub fn add_course(&mut self, mut course: Course) -> Course {
        course.id = fresh_id(&mut self.ids, |id| {
            self.courses.iter().any(|existing| existing.id == id)
        });
        debug!("added course {} ({})", course.id, course.name);
        self.courses.push(course.clone());
        course
    }

    pub fn update_course(&mut self, course: Course) -> bool {
        let found = replace_matching(&mut self.courses, course, |c| &c.id);
        log_missing("update", "course", found);
        found
    }

    pub fn delete_course(&mut self, id: &str) -> bool {
        let found = remove_matching(&mut self.courses, id, |c| &c.id);
        log_missing("delete", "course", found);
        found
    }

    pub fn add_attendance(&mut self, mut record: AttendanceRecord) -> AttendanceRecord {
        record.id = fresh_id(&mut self.ids, |id| {
            self.attendance.iter().any(|existing| existing.id == id)
        });
        debug!(
            "added attendance {} for student {} on {}",
            record.id, record.student_id, record.date
        );
        self.attendance.push(record.clone());
        record
    }

    pub fn update_attendance(&mut self, record: AttendanceRecord) -> bool {
        let found = replace_matching(&mut self.attendance, record, |r| &r.id);
        log_missing("update", "attendance record", found);
        found
    }

    pub fn delete_attendance(&mut self, id: &str) -> bool {
        let found = remove_matching(&mut self.attendance, id, |r| &r.id);
        log_missing("delete", "attendance record", found);
        found
    }
}

fn fresh_id(ids: &mut IdGenerator, taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = ids.next_id();
        if !taken(&id) {
            return id;
        }
    }
}

fn replace_matching<T: Clone>(
    items: &mut [T],
    replacement: T,
    id_of: impl Fn(&T) -> &String,
) -> bool {
    let target = id_of(&replacement).clone();
    let mut found = false;
    for item in items.iter_mut() {
        if *id_of(item) == target {
            *item = replacement.clone();
            found = true;
        }
    }
    found
}

fn remove_matching<T>(items: &mut Vec<T>, id: &str, id_of: impl Fn(&T) -> &String) -> bool {
    let before = items.len();
    items.retain(|item| id_of(item) != id);
    items.len() != before
}

fn log_missing(action: &str, kind: &str, found: bool) {
    if !found {
        debug!("{action} ignored: no {kind} with that id");
    }
}

/// Thread-safe handle for hosts that share one store. Mutations hold the
/// write lock for the whole read-modify-write; queries share the read lock
/// and always see a complete snapshot.
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<RwLock<RecordStore>>,
}

impl SharedStore {
    pub fn new(store: RecordStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&RecordStore) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut RecordStore) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}
