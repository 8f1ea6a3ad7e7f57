//! One row of department data.

use std::fmt;

/// A university department row: `id, university, department, score`.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentRecord {
    pub id: i32,
    pub university: String,
    pub department: String,
    pub score: f32,
}

impl fmt::Display for DepartmentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, University: {}, Department: {}, Score: {:.2}",
            self.id, self.university, self.department, self.score
        )
    }
}
