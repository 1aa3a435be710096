//! Dashboard API client.
//!
//! Typed reqwest wrapper over the roster API. The bearer token is read from
//! the injected session store on every call; a 401 on an authenticated call
//! clears the session and surfaces `ClientError::SessionExpired`, the
//! library analogue of the dashboard redirecting to the login page.

use crate::auth::models::{
    AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest, UserResponse, UserSummary,
};
use crate::dashboard::session::{Session, SessionStore};
use crate::students::models::{
    CreateStudentRequest, MessageResponse, Student, UpdateStudentRequest,
};
use reqwest::{RequestBuilder, Response, StatusCode};
use std::sync::Arc;

/// Dashboard client errors
#[derive(Debug)]
pub enum ClientError {
    /// An authenticated call came back 401; the session has been cleared
    SessionExpired,
    /// The server rejected the request with its `{message}` body
    Api { status: u16, message: String },
    /// Network or decoding failure
    Transport(reqwest::Error),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::SessionExpired => write!(f, "Session expired"),
            ClientError::Api { status, message } => write!(f, "API error {}: {}", status, message),
            ClientError::Transport(e) => write!(f, "Transport error: {}", e),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e)
    }
}

/// Client for the roster API
pub struct DashboardClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl DashboardClient {
    pub fn new(base_url: impl Into<String>, session: Arc<dyn SessionStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            session,
        }
    }

    /// The current session, if any
    pub fn session(&self) -> Option<Session> {
        self.session.get()
    }

    /// Register a new account and start a session
    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserSummary, ClientError> {
        let body = RegisterRequest {
            full_name: Some(full_name.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        };

        let resp = self
            .send(self.http.post(self.url("/api/register")).json(&body))
            .await?;
        let auth: AuthResponse = resp.json().await?;

        self.session.set(Session {
            token: auth.token,
            user: auth.user.clone(),
        });
        Ok(auth.user)
    }

    /// Log in and start a session
    pub async fn login(&self, email: &str, password: &str) -> Result<UserSummary, ClientError> {
        let body = LoginRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        };

        let resp = self
            .send(self.http.post(self.url("/api/login")).json(&body))
            .await?;
        let auth: AuthResponse = resp.json().await?;

        self.session.set(Session {
            token: auth.token,
            user: auth.user.clone(),
        });
        Ok(auth.user)
    }

    /// Drop the local session; the token simply stops being presented
    pub fn logout(&self) {
        self.session.clear();
    }

    /// Fetch the caller's profile
    pub async fn me(&self) -> Result<UserSummary, ClientError> {
        let resp = self.send(self.http.get(self.url("/api/me"))).await?;
        let body: UserResponse = resp.json().await?;
        Ok(body.user)
    }

    /// Update the caller's profile and refresh the cached user
    pub async fn update_profile(
        &self,
        update: &UpdateProfileRequest,
    ) -> Result<UserSummary, ClientError> {
        let resp = self
            .send(self.http.put(self.url("/api/profile")).json(update))
            .await?;
        let body: UserResponse = resp.json().await?;

        if let Some(mut session) = self.session.get() {
            session.user = body.user.clone();
            self.session.set(session);
        }
        Ok(body.user)
    }

    /// Fetch the full roster, newest first
    pub async fn list_students(&self) -> Result<Vec<Student>, ClientError> {
        let resp = self.send(self.http.get(self.url("/api/students"))).await?;
        Ok(resp.json().await?)
    }

    /// Fetch a single student
    pub async fn get_student(&self, id: &str) -> Result<Student, ClientError> {
        let resp = self
            .send(self.http.get(self.url(&format!("/api/students/{}", id))))
            .await?;
        Ok(resp.json().await?)
    }

    /// Create a student
    pub async fn create_student(
        &self,
        student: &CreateStudentRequest,
    ) -> Result<Student, ClientError> {
        let resp = self
            .send(self.http.post(self.url("/api/students")).json(student))
            .await?;
        Ok(resp.json().await?)
    }

    /// Partially update a student
    pub async fn update_student(
        &self,
        id: &str,
        update: &UpdateStudentRequest,
    ) -> Result<Student, ClientError> {
        let resp = self
            .send(
                self.http
                    .put(self.url(&format!("/api/students/{}", id)))
                    .json(update),
            )
            .await?;
        Ok(resp.json().await?)
    }

    /// Delete a student
    pub async fn delete_student(&self, id: &str) -> Result<String, ClientError> {
        let resp = self
            .send(self.http.delete(self.url(&format!("/api/students/{}", id))))
            .await?;
        let body: MessageResponse = resp.json().await?;
        Ok(body.message)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the session token (if any), send, and map failures.
    ///
    /// A 401 on a call that carried a token invalidates the session; a 401
    /// without one (e.g. a bad login) is an ordinary API error.
    async fn send(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        let token = self.session.get().map(|s| s.token);
        let authenticated = token.is_some();
        let builder = match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        let resp = builder.send().await?;
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED && authenticated {
            self.session.clear();
            return Err(ClientError::SessionExpired);
        }

        if !status.is_success() {
            let message = resp
                .json::<MessageResponse>()
                .await
                .map(|m| m.message)
                .unwrap_or_else(|_| "Request failed".to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp)
    }
}
