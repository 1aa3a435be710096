//! Student Models
//! Mission: student record data structures and input validation

use crate::error::ApiError;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A student record, owned by exactly one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub student_id: String,
    pub email: String,
    pub grade: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub enrollment_date: Option<NaiveDate>,
    pub created_at: String,
    pub updated_at: String,
}

/// Student creation request body
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_date: Option<String>,
}

/// Partial student update; absent and null fields are left unchanged.
/// Clearing `grade` or `enrollmentDate` requires sending an empty string.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_date: Option<String>,
}

/// Plain `{message}` response body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Validate the required student fields (applied to the merged document on update)
pub fn validate_required(full_name: &str, student_id: &str, email: &str) -> Result<(), ApiError> {
    if full_name.trim().is_empty() || student_id.trim().is_empty() || email.trim().is_empty() {
        return Err(ApiError::Validation(
            "fullName, studentId and email are required",
        ));
    }
    Ok(())
}

/// Parse an enrollment date, accepting `YYYY-MM-DD` or a full RFC 3339 timestamp
pub fn parse_enrollment_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| ApiError::Validation("Invalid enrollment date"))
}
