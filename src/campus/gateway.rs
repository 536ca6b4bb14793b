// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP client for the campus information system.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::credential::CampusLogin;
use super::error::UpstreamError;
use super::manager::{CallOutcome, CampusAuthenticator, UpstreamCredentialManager};
use super::models::{
    CampusEmployee, CampusLecturer, CampusStudent, CampusStudentDetail, EmployeeList, Envelope,
    LecturerList, LoginResponse, StudentComplete, StudentList,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const STUDENTS_PATH: &str = "library-api/mahasiswa";
const STUDENT_BY_NIM_PATH: &str = "library-api/get-student-by-nim";
const EMPLOYEES_PATH: &str = "library-api/pegawai";
const LECTURERS_PATH: &str = "library-api/dosen";

/// Build the shared HTTP client with a bounded timeout.
pub fn http_client(timeout: Duration) -> Result<Client, UpstreamError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| UpstreamError::Unavailable(format!("failed to build HTTP client: {e}")))
}

/// Logs in with the fixed service account.
#[derive(Clone)]
pub struct HttpCampusAuthenticator {
    http: Client,
    auth_url: String,
    username: Option<String>,
    password: Option<String>,
}

impl HttpCampusAuthenticator {
    pub fn new(
        http: Client,
        auth_url: impl Into<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        Self {
            http,
            auth_url: auth_url.into(),
            username,
            password,
        }
    }
}

#[async_trait]
impl CampusAuthenticator for HttpCampusAuthenticator {
    async fn login(&self) -> Result<CampusLogin, UpstreamError> {
        let (Some(username), Some(password)) = (&self.username, &self.password) else {
            return Err(UpstreamError::Auth(
                "campus service account is not configured".to_string(),
            ));
        };

        info!(account = %username, "Authenticating with campus API");

        let response = self
            .http
            .post(&self.auth_url)
            .form(&[("username", username.as_str()), ("password", password.as_str())])
            .send()
            .await
            .map_err(|e| UpstreamError::Auth(format!("login request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(UpstreamError::Auth(format!(
                "login returned status {}",
                response.status()
            )));
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Auth(format!("invalid login response: {e}")))?;

        if !body.result {
            return Err(UpstreamError::Auth(format!(
                "authentication failed: {}",
                body.error
            )));
        }
        if body.token.trim().is_empty() {
            return Err(UpstreamError::Auth("empty token received".to_string()));
        }

        if let Some(user) = &body.user {
            debug!(user_id = user.user_id, username = %user.username, role = %user.role, "Campus login accepted");
        }

        Ok(CampusLogin {
            token: body.token,
            refresh_token: Some(body.refresh_token).filter(|t| !t.is_empty()),
        })
    }
}

/// Directory lookups against the campus API.
///
/// Every call goes through the credential manager, which injects the
/// service bearer token and handles the retry after a 401.
#[derive(Clone)]
pub struct CampusGateway {
    http: Client,
    base_url: String,
    credentials: Arc<UpstreamCredentialManager>,
}

impl CampusGateway {
    pub fn new(http: Client, base_url: impl Into<String>, credentials: Arc<UpstreamCredentialManager>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn credentials(&self) -> &Arc<UpstreamCredentialManager> {
        &self.credentials
    }

    /// Student directory entry by campus user id.
    pub async fn student_by_user_id(&self, user_id: u64) -> Result<CampusStudent, UpstreamError> {
        let envelope: Envelope<StudentList> = self
            .get_json(STUDENTS_PATH, &[("userid", user_id.to_string())])
            .await?;
        expect_result(&envelope, "Ok")?;

        envelope
            .data
            .and_then(|data| data.students.into_iter().next())
            .ok_or_else(|| UpstreamError::NotFound(format!("Student with user id {user_id}")))
    }

    /// Detailed student profile by NIM.
    pub async fn student_detail_by_nim(&self, nim: &str) -> Result<CampusStudentDetail, UpstreamError> {
        let envelope: Envelope<CampusStudentDetail> = self
            .get_json(STUDENT_BY_NIM_PATH, &[("nim", nim.to_string())])
            .await?;
        expect_result(&envelope, "OK")?;

        envelope
            .data
            .filter(|detail| !detail.nim.is_empty())
            .ok_or_else(|| UpstreamError::NotFound(format!("Student with NIM {nim}")))
    }

    /// Directory entry plus detailed profile.
    pub async fn student_complete(&self, user_id: u64) -> Result<StudentComplete, UpstreamError> {
        let basic_info = self.student_by_user_id(user_id).await?;
        let details = self.student_detail_by_nim(&basic_info.nim).await?;
        Ok(StudentComplete {
            basic_info,
            details,
        })
    }

    /// Employee entry by campus user id (teaching assistants).
    pub async fn employee_by_user_id(&self, user_id: u64) -> Result<CampusEmployee, UpstreamError> {
        let envelope: Envelope<EmployeeList> = self
            .get_json(EMPLOYEES_PATH, &[("userid", user_id.to_string())])
            .await?;
        expect_result(&envelope, "Ok")?;

        envelope
            .data
            .and_then(|data| data.employees.into_iter().next())
            .ok_or_else(|| UpstreamError::NotFound(format!("Employee with user id {user_id}")))
    }

    /// Lecturer entry by campus user id.
    pub async fn lecturer_by_user_id(&self, user_id: u64) -> Result<CampusLecturer, UpstreamError> {
        let envelope: Envelope<LecturerList> = self
            .get_json(LECTURERS_PATH, &[("userid", user_id.to_string())])
            .await?;
        expect_result(&envelope, "Ok")?;

        envelope
            .data
            .and_then(|data| data.lecturers.into_iter().next())
            .ok_or_else(|| UpstreamError::NotFound(format!("Lecturer with user id {user_id}")))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let url = format!("{}/{}", self.base_url, path);

        self.credentials
            .call(|token| {
                let request = self.http.get(&url).query(query).bearer_auth(token);
                async move {
                    let response = request.send().await?;
                    let status = response.status();
                    debug!(path, %status, "Campus API response");

                    if status == StatusCode::UNAUTHORIZED {
                        return Ok(CallOutcome::Rejected);
                    }
                    if !status.is_success() {
                        return Err(UpstreamError::Status(status.as_u16()));
                    }

                    response
                        .json::<T>()
                        .await
                        .map(CallOutcome::Done)
                        .map_err(|e| UpstreamError::InvalidResponse(format!("GET {path}: {e}")))
                }
            })
            .await
    }
}

fn expect_result<T>(envelope: &Envelope<T>, expected: &str) -> Result<(), UpstreamError> {
    if envelope.is_ok(expected) {
        Ok(())
    } else {
        Err(UpstreamError::InvalidResponse(format!(
            "unexpected result flag {:?}",
            envelope.result
        )))
    }
}


#[cfg(test)]
mod tests {
    use super::test_server::{spawn, CampusCounters};
    use super::*;
    use std::sync::atomic::Ordering;

    async fn gateway(password: &str) -> (CampusGateway, Arc<CampusCounters>) {
        let counters = Arc::new(CampusCounters::default());
        let base = spawn(counters.clone()).await;
        let http = http_client(Duration::from_secs(5)).unwrap();
        let authenticator = HttpCampusAuthenticator::new(
            http.clone(),
            format!("{base}/jwt-api/do-auth"),
            Some("service".to_string()),
            Some(password.to_string()),
        );
        let manager = Arc::new(UpstreamCredentialManager::new(Arc::new(authenticator)));
        (CampusGateway::new(http, format!("{base}/"), manager), counters)
    }

    #[tokio::test]
    async fn login_posts_service_account_form() {
        let (gateway, counters) = gateway("service-secret").await;
        gateway.credentials().bearer().await.unwrap();

        let form = counters.last_form.lock().unwrap().clone();
        assert_eq!(form.get("username").map(String::as_str), Some("service"));
        assert_eq!(form.get("password").map(String::as_str), Some("service-secret"));
    }

    #[tokio::test]
    async fn rejected_login_is_auth_error() {
        let (gateway, counters) = gateway("wrong").await;
        let result = gateway.student_by_user_id(9001).await;
        assert!(matches!(result, Err(UpstreamError::Auth(ref msg)) if msg.contains("Invalid username")));
        assert_eq!(counters.lookups(), 0);
    }

    #[tokio::test]
    async fn missing_service_account_is_auth_error() {
        let authenticator = HttpCampusAuthenticator::new(
            http_client(DEFAULT_TIMEOUT).unwrap(),
            "http://127.0.0.1:9/do-auth",
            None,
            None,
        );
        assert!(matches!(authenticator.login().await, Err(UpstreamError::Auth(_))));
    }

    #[tokio::test]
    async fn lookups_reuse_one_credential() {
        let (gateway, counters) = gateway("service-secret").await;

        let student = gateway.student_by_user_id(9001).await.unwrap();
        assert_eq!(student.nim, "11S20001");
        let employee = gateway.employee_by_user_id(501).await.unwrap();
        assert_eq!(employee.position.as_deref(), Some("Asisten"));
        let lecturer = gateway.lecturer_by_user_id(700).await.unwrap();
        assert_eq!(lecturer.academic_rank, "Lektor");

        assert_eq!(counters.logins(), 1);
        assert_eq!(counters.lookups(), 3);
    }

    #[tokio::test]
    async fn student_complete_combines_both_lookups() {
        let (gateway, _) = gateway("service-secret").await;
        let complete = gateway.student_complete(9001).await.unwrap();
        assert_eq!(complete.basic_info.user_id, 9001);
        assert_eq!(complete.details.academic_advisor.as_deref(), Some("Pak Budi"));
    }

    #[tokio::test]
    async fn empty_results_are_not_found() {
        let (gateway, _) = gateway("service-secret").await;
        assert!(gateway.student_by_user_id(1).await.unwrap_err().is_not_found());
        assert!(gateway.student_detail_by_nim("00000000").await.unwrap_err().is_not_found());
        assert!(gateway.employee_by_user_id(1).await.unwrap_err().is_not_found());
        assert!(gateway.lecturer_by_user_id(1).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn unauthorized_response_refreshes_and_retries_once() {
        let (gateway, counters) = gateway("service-secret").await;
        gateway.credentials().bearer().await.unwrap();
        counters.reject_next.store(1, Ordering::SeqCst);

        let student = gateway.student_by_user_id(9001).await.unwrap();
        assert_eq!(student.user_id, 9001);
        assert_eq!(counters.logins(), 2);
        assert_eq!(counters.lookups(), 2);
    }

    #[tokio::test]
    async fn repeated_unauthorized_surfaces_after_one_retry() {
        let (gateway, counters) = gateway("service-secret").await;
        counters.reject_next.store(5, Ordering::SeqCst);

        let result = gateway.student_by_user_id(9001).await;
        assert!(matches!(result, Err(UpstreamError::Unauthorized)));
        assert_eq!(counters.logins(), 2);
        assert_eq!(counters.lookups(), 2);
    }

    #[tokio::test]
    async fn unreachable_campus_is_unavailable() {
        let (gateway, _) = gateway("service-secret").await;
        gateway.credentials().bearer().await.unwrap();
        let broken = CampusGateway::new(
            http_client(Duration::from_secs(2)).unwrap(),
            "http://127.0.0.1:9",
            gateway.credentials().clone(),
        );
        assert!(matches!(
            broken.student_by_user_id(9001).await,
            Err(UpstreamError::Unavailable(_))
        ));
    }
}
