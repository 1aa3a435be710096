//! Student API Endpoints
//! Mission: CRUD over the roster, scoped to the authenticated owner
//!
//! A student belonging to a different user is indistinguishable from one
//! that does not exist (404, never 403).

use crate::auth::models::CurrentUser;
use crate::error::ApiError;
use crate::students::{
    models::{
        parse_enrollment_date, validate_required, CreateStudentRequest, MessageResponse, Student,
        UpdateStudentRequest,
    },
    store::StudentStore,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Shared student state
#[derive(Clone)]
pub struct StudentState {
    pub store: Arc<StudentStore>,
}

impl StudentState {
    pub fn new(store: Arc<StudentStore>) -> Self {
        Self { store }
    }
}

/// List students - GET /api/students
pub async fn list_students(
    State(state): State<StudentState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Student>>, ApiError> {
    let students = state.store.list(&user.id).map_err(ApiError::internal)?;
    Ok(Json(students))
}

/// Get one student - GET /api/students/:id
pub async fn get_student(
    State(state): State<StudentState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<Student>, ApiError> {
    let id = parse_student_id(&id)?;
    let student = state
        .store
        .get(&user.id, &id)
        .map_err(ApiError::internal)?
        .ok_or(ApiError::NotFound("Student not found"))?;

    Ok(Json(student))
}

/// Create a student - POST /api/students
pub async fn create_student(
    State(state): State<StudentState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<Student>), ApiError> {
    let full_name = payload.full_name.unwrap_or_default().trim().to_string();
    let student_id = payload.student_id.unwrap_or_default().trim().to_string();
    let email = payload.email.unwrap_or_default().trim().to_lowercase();
    validate_required(&full_name, &student_id, &email)?;

    let grade = payload.grade.unwrap_or_default().trim().to_string();
    let enrollment_date = match payload.enrollment_date.as_deref() {
        Some(raw) if !raw.is_empty() => Some(parse_enrollment_date(raw)?),
        _ => None,
    };

    let now = Utc::now().to_rfc3339();
    let student = Student {
        id: Uuid::new_v4(),
        user_id: user.id,
        full_name,
        student_id,
        email,
        grade,
        enrollment_date,
        created_at: now.clone(),
        updated_at: now,
    };

    state.store.insert(&student).map_err(ApiError::internal)?;

    info!("Student created: {} (owner {})", student.id, user.id);

    Ok((StatusCode::CREATED, Json(student)))
}

/// Partially update a student - PUT /api/students/:id
///
/// Only supplied non-null fields are overwritten; validation is re-applied
/// against the merged document.
pub async fn update_student(
    State(state): State<StudentState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStudentRequest>,
) -> Result<Json<Student>, ApiError> {
    let id = parse_student_id(&id)?;
    let mut student = state
        .store
        .get(&user.id, &id)
        .map_err(ApiError::internal)?
        .ok_or(ApiError::NotFound("Student not found"))?;

    if let Some(full_name) = payload.full_name {
        student.full_name = full_name.trim().to_string();
    }
    if let Some(student_id) = payload.student_id {
        student.student_id = student_id.trim().to_string();
    }
    if let Some(email) = payload.email {
        student.email = email.trim().to_lowercase();
    }
    if let Some(grade) = payload.grade {
        student.grade = grade.trim().to_string();
    }
    if let Some(raw) = payload.enrollment_date {
        student.enrollment_date = if raw.is_empty() {
            None
        } else {
            Some(parse_enrollment_date(&raw)?)
        };
    }

    validate_required(&student.full_name, &student.student_id, &student.email)?;

    student.updated_at = Utc::now().to_rfc3339();
    let updated = state.store.update(&student).map_err(ApiError::internal)?;
    if !updated {
        return Err(ApiError::NotFound("Student not found"));
    }

    Ok(Json(student))
}

/// Delete a student - DELETE /api/students/:id
pub async fn delete_student(
    State(state): State<StudentState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_student_id(&id)?;
    let deleted = state
        .store
        .delete(&user.id, &id)
        .map_err(ApiError::internal)?;

    if !deleted {
        return Err(ApiError::NotFound("Student not found"));
    }

    info!("Student deleted: {} (owner {})", id, user.id);

    Ok(Json(MessageResponse {
        message: "Student deleted".to_string(),
    }))
}

/// A path id that isn't a UUID cannot name an existing student
fn parse_student_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Student not found"))
}
