//! Roster list view model.
//!
//! Pure derivation of the dashboard's visible slice: a case-insensitive
//! prefix filter across the searchable fields, then a fixed-size page of
//! the filtered set. The current page clamps into range as the underlying
//! set shrinks or grows, and resets to 1 whenever the search term changes.

use crate::students::models::Student;

/// Fixed page size of the dashboard list
pub const PAGE_SIZE: usize = 10;

/// View state over a fetched student list
#[derive(Debug)]
pub struct RosterView {
    students: Vec<Student>,
    search: String,
    page: usize, // 1-based, clamped on read
}

impl RosterView {
    pub fn new() -> Self {
        Self {
            students: Vec::new(),
            search: String::new(),
            page: 1,
        }
    }

    /// Replace the underlying student list (e.g. after a refetch)
    pub fn set_students(&mut self, students: Vec<Student>) {
        self.students = students;
    }

    /// Update the search term; any change resets to page 1
    pub fn set_search(&mut self, term: &str) {
        if term != self.search {
            self.search = term.to_string();
            self.page = 1;
        }
    }

    /// Request a page; out-of-range values clamp into `[1, total_pages]`
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages());
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Filtered view: prefix match against full name, student id, email,
    /// and grade; empty term yields the full set in original order
    pub fn filtered(&self) -> Vec<&Student> {
        let q = self.search.trim().to_lowercase();
        if q.is_empty() {
            return self.students.iter().collect();
        }

        self.students
            .iter()
            .filter(|s| {
                s.full_name.to_lowercase().starts_with(&q)
                    || s.student_id.to_lowercase().starts_with(&q)
                    || s.email.to_lowercase().starts_with(&q)
                    || s.grade.to_lowercase().starts_with(&q)
            })
            .collect()
    }

    pub fn total_count(&self) -> usize {
        self.filtered().len()
    }

    pub fn total_pages(&self) -> usize {
        self.total_count().div_ceil(PAGE_SIZE).max(1)
    }

    /// The effective page after clamping
    pub fn current_page(&self) -> usize {
        self.page.clamp(1, self.total_pages())
    }

    /// The visible slice for the current page
    pub fn page_items(&self) -> Vec<&Student> {
        let filtered = self.filtered();
        let start = (self.current_page() - 1) * PAGE_SIZE;
        filtered.into_iter().skip(start).take(PAGE_SIZE).collect()
    }
}

impl Default for RosterView {
    fn default() -> Self {
        Self::new()
    }
}
