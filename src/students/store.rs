//! Student Storage
//! Mission: persist student records with SQLite, one owner per row

use crate::students::models::Student;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use uuid::Uuid;

/// Student storage with SQLite backend
pub struct StudentStore {
    db_path: String,
}

impl StudentStore {
    /// Create a new student store and initialize the schema
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS students (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                full_name TEXT NOT NULL,
                student_id TEXT NOT NULL,
                email TEXT NOT NULL,
                grade TEXT NOT NULL DEFAULT '',
                enrollment_date TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_students_user_id ON students(user_id)",
            [],
        )?;

        Ok(())
    }

    /// Insert a new student record
    pub fn insert(&self, student: &Student) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "INSERT INTO students
                (id, user_id, full_name, student_id, email, grade, enrollment_date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                student.id.to_string(),
                student.user_id.to_string(),
                student.full_name,
                student.student_id,
                student.email,
                student.grade,
                student.enrollment_date.map(|d| d.to_string()),
                student.created_at,
                student.updated_at,
            ],
        )
        .context("Failed to insert student")?;

        Ok(())
    }

    /// List a user's students, newest first
    pub fn list(&self, user_id: &Uuid) -> Result<Vec<Student>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, user_id, full_name, student_id, email, grade, enrollment_date, created_at, updated_at
             FROM students WHERE user_id = ?1
             ORDER BY created_at DESC, rowid DESC",
        )?;

        let students = stmt
            .query_map(params![user_id.to_string()], row_to_student)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(students)
    }

    /// Get one of a user's students; foreign rows are invisible
    pub fn get(&self, user_id: &Uuid, id: &Uuid) -> Result<Option<Student>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, user_id, full_name, student_id, email, grade, enrollment_date, created_at, updated_at
             FROM students WHERE id = ?1 AND user_id = ?2",
        )?;

        let result = stmt.query_row(
            params![id.to_string(), user_id.to_string()],
            row_to_student,
        );

        match result {
            Ok(student) => Ok(Some(student)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist an updated student; returns false when the row is gone
    pub fn update(&self, student: &Student) -> Result<bool> {
        let conn = Connection::open(&self.db_path)?;

        let rows_affected = conn.execute(
            "UPDATE students
             SET full_name = ?1, student_id = ?2, email = ?3, grade = ?4,
                 enrollment_date = ?5, updated_at = ?6
             WHERE id = ?7 AND user_id = ?8",
            params![
                student.full_name,
                student.student_id,
                student.email,
                student.grade,
                student.enrollment_date.map(|d| d.to_string()),
                student.updated_at,
                student.id.to_string(),
                student.user_id.to_string(),
            ],
        )?;

        Ok(rows_affected > 0)
    }

    /// Delete one of a user's students; returns false when the row is gone
    pub fn delete(&self, user_id: &Uuid, id: &Uuid) -> Result<bool> {
        let conn = Connection::open(&self.db_path)?;

        let rows_affected = conn.execute(
            "DELETE FROM students WHERE id = ?1 AND user_id = ?2",
            params![id.to_string(), user_id.to_string()],
        )?;

        Ok(rows_affected > 0)
    }
}

fn row_to_student(row: &rusqlite::Row<'_>) -> rusqlite::Result<Student> {
    let parse_uuid = |idx: usize, raw: String| {
        Uuid::parse_str(&raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
    };

    let id = parse_uuid(0, row.get::<_, String>(0)?)?;
    let user_id = parse_uuid(1, row.get::<_, String>(1)?)?;

    let enrollment_date = match row.get::<_, Option<String>>(6)? {
        Some(raw) => Some(NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
        })?),
        None => None,
    };

    Ok(Student {
        id,
        user_id,
        full_name: row.get(2)?,
        student_id: row.get(3)?,
        email: row.get(4)?,
        grade: row.get(5)?,
        enrollment_date,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
