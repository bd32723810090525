use crate::models::{Gender, Student};
use crate::performance::round_one_decimal;
use crate::store::RecordStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RosterSummary {
    pub total: usize,
    pub male: usize,
    pub female: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CatalogSummary {
    pub course_count: usize,
    pub total_credits: u32,
    pub average_percentage: f64,
}

/// Case-insensitive substring match on name, email or id. A blank query
/// matches every student.
pub fn search_students<'a>(store: &'a RecordStore, query: &str) -> Vec<&'a Student> {
    let query = query.trim().to_lowercase();
    store
        .students()
        .iter()
        .filter(|student| {
            query.is_empty()
                || student.name.to_lowercase().contains(&query)
                || student.email.to_lowercase().contains(&query)
                || student.id.to_lowercase().contains(&query)
        })
        .collect()
}

pub fn roster_summary(store: &RecordStore) -> RosterSummary {
    let students = store.students();
    let count = |gender: Gender| students.iter().filter(|s| s.gender == Some(gender)).count();
    RosterSummary {
        total: students.len(),
        male: count(Gender::Male),
        female: count(Gender::Female),
    }
}

pub fn catalog_summary(store: &RecordStore) -> CatalogSummary {
    let courses = store.courses();
    if courses.is_empty() {
        return CatalogSummary::default();
    }

    let total_percentage: f64 = courses.iter().map(|course| course.percentage).sum();
    CatalogSummary {
        course_count: courses.len(),
        total_credits: courses.iter().map(|course| course.credits).sum(),
        average_percentage: round_one_decimal(total_percentage / courses.len() as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::SeedData;

    #[test]
    fn search_matches_name_email_and_id() {
        let store = RecordStore::from_seed(SeedData::demo());

        let by_name: Vec<&str> = search_students(&store, "  PATEL ")
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(by_name, vec!["3"]);

        assert_eq!(search_students(&store, "jules.moreno@").len(), 1);
        assert_eq!(search_students(&store, "4")[0].name, "Noah Fischer");
        assert!(search_students(&store, "nobody").is_empty());
    }

    #[test]
    fn blank_search_returns_everyone_in_order() {
        let store = RecordStore::from_seed(SeedData::demo());
        let ids: Vec<&str> = search_students(&store, "")
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn roster_counts_by_gender() {
        let store = RecordStore::from_seed(SeedData::demo());
        assert_eq!(
            roster_summary(&store),
            RosterSummary {
                total: 4,
                male: 2,
                female: 2,
            }
        );
    }

    #[test]
    fn catalog_totals_credits_and_averages() {
        let store = RecordStore::from_seed(SeedData::demo());
        let summary = catalog_summary(&store);

        assert_eq!(summary.course_count, 4);
        assert_eq!(summary.total_credits, 12);
        // (92 + 78 + 85 + 72) / 4 = 81.75
        assert_eq!(summary.average_percentage, 81.8);
    }

    #[test]
    fn empty_catalog_is_zeroed() {
        assert_eq!(catalog_summary(&RecordStore::new()), CatalogSummary::default());
    }
}
