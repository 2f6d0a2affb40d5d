use crate::{
    API_PREFIX, LoginRequest, Paginated, SignupAck, SignupRequest, Task, TaskFilters, TaskPayload,
    TokenResponse,
};
use serde::{Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Request-response relationship and metadata for one API endpoint.
pub trait ApiRequest {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The JSON body type; `()` for bodyless requests.
    type Body: Serialize;
    /// The HTTP method.
    const METHOD: HttpMethod;

    /// Path relative to the base URL, including any query string.
    fn path(&self) -> String;

    fn body(&self) -> Option<&Self::Body> {
        None
    }

    /// Decode a successful response body.
    fn decode(body: &str) -> Result<Self::Response, serde_json::Error> {
        serde_json::from_str(body)
    }
}

fn task_path(id: &str) -> String {
    format!("{}/tasks/{}", API_PREFIX, urlencoding::encode(id))
}

// =========================================================
// Auth
// =========================================================

impl ApiRequest for LoginRequest {
    type Response = TokenResponse;
    type Body = LoginRequest;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("{}/auth/login", API_PREFIX)
    }

    fn body(&self) -> Option<&Self::Body> {
        Some(self)
    }
}

impl ApiRequest for SignupRequest {
    type Response = SignupAck;
    type Body = SignupRequest;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("{}/auth/signup", API_PREFIX)
    }

    fn body(&self) -> Option<&Self::Body> {
        Some(self)
    }

    // 后端可能返回新用户或简单的确认信息，两者都视为成功
    fn decode(body: &str) -> Result<Self::Response, serde_json::Error> {
        if body.trim().is_empty() {
            return Ok(SignupAck::default());
        }
        serde_json::from_str(body)
    }
}

// =========================================================
// Tasks
// =========================================================

/// List tasks matching a filter descriptor
#[derive(Debug, Clone)]
pub struct ListTasksRequest<'a> {
    pub filters: &'a TaskFilters,
}

impl ApiRequest for ListTasksRequest<'_> {
    type Response = Paginated<Task>;
    type Body = ();
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        let query = self.filters.query_string();
        if query.is_empty() {
            format!("{}/tasks", API_PREFIX)
        } else {
            format!("{}/tasks?{}", API_PREFIX, query)
        }
    }
}

#[derive(Debug, Clone)]
pub struct GetTaskRequest<'a> {
    pub id: &'a str,
}

impl ApiRequest for GetTaskRequest<'_> {
    type Response = Task;
    type Body = ();
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        task_path(self.id)
    }
}

#[derive(Debug, Clone)]
pub struct CreateTaskRequest<'a> {
    pub payload: &'a TaskPayload,
}

impl ApiRequest for CreateTaskRequest<'_> {
    type Response = Task;
    type Body = TaskPayload;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("{}/tasks", API_PREFIX)
    }

    fn body(&self) -> Option<&Self::Body> {
        Some(self.payload)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateTaskRequest<'a> {
    pub id: &'a str,
    pub payload: &'a TaskPayload,
}

impl ApiRequest for UpdateTaskRequest<'_> {
    type Response = Task;
    type Body = TaskPayload;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        task_path(self.id)
    }

    fn body(&self) -> Option<&Self::Body> {
        Some(self.payload)
    }
}

/// Delete a task. Any response body is ignored.
#[derive(Debug, Clone)]
pub struct DeleteTaskRequest<'a> {
    pub id: &'a str,
}

impl ApiRequest for DeleteTaskRequest<'_> {
    type Response = ();
    type Body = ();
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        task_path(self.id)
    }

    fn decode(_body: &str) -> Result<Self::Response, serde_json::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TaskStatus;

    #[test]
    fn list_path_includes_only_present_filters() {
        let filters = TaskFilters {
            status: Some(TaskStatus::Todo),
            page: Some(1),
            limit: Some(10),
            ..Default::default()
        };
        assert_eq!(
            ListTasksRequest { filters: &filters }.path(),
            "/api/v1/tasks?status=todo&page=1&limit=10"
        );
        assert_eq!(
            ListTasksRequest {
                filters: &TaskFilters::default()
            }
            .path(),
            "/api/v1/tasks"
        );
    }

    #[test]
    fn single_resource_paths_encode_id() {
        assert_eq!(GetTaskRequest { id: "42" }.path(), "/api/v1/tasks/42");
        assert_eq!(DeleteTaskRequest { id: "a/b" }.path(), "/api/v1/tasks/a%2Fb");
    }

    #[test]
    fn delete_ignores_body_and_signup_accepts_empty() {
        assert!(DeleteTaskRequest::decode(r#"{"message":"Task deleted"}"#).is_ok());
        assert!(DeleteTaskRequest::decode("").is_ok());
        assert_eq!(SignupRequest::decode("").unwrap(), SignupAck::default());
        assert_eq!(
            SignupRequest::decode(r#"{"message":"Signup successful"}"#)
                .unwrap()
                .message
                .as_deref(),
            Some("Signup successful")
        );
    }
}
