//! 资源 API：认证与任务
//!
//! 这一层只负责把操作映射到端点，错误原样向上传递。

use taskdeck_shared::protocol::{
    CreateTaskRequest, DeleteTaskRequest, GetTaskRequest, ListTasksRequest, UpdateTaskRequest,
};
use taskdeck_shared::{
    LoginRequest, Paginated, SignupAck, SignupRequest, Task, TaskFilters, TaskPayload,
    TokenResponse,
};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::web::http::HttpClient;
use crate::web::location::Navigator;
use crate::web::storage::KeyValueStore;

impl<C, S, N> ApiClient<C, S, N>
where
    C: HttpClient,
    S: KeyValueStore,
    N: Navigator,
{
    pub fn auth(&self) -> AuthApi<'_, C, S, N> {
        AuthApi { client: self }
    }

    pub fn tasks(&self) -> TaskApi<'_, C, S, N> {
        TaskApi { client: self }
    }
}

pub struct AuthApi<'a, C, S, N> {
    client: &'a ApiClient<C, S, N>,
}

impl<C, S, N> AuthApi<'_, C, S, N>
where
    C: HttpClient,
    S: KeyValueStore,
    N: Navigator,
{
    pub async fn login(&self, credentials: &LoginRequest) -> Result<TokenResponse, ApiError> {
        self.client.send(credentials).await
    }

    pub async fn signup(&self, data: &SignupRequest) -> Result<SignupAck, ApiError> {
        self.client.send(data).await
    }
}

pub struct TaskApi<'a, C, S, N> {
    client: &'a ApiClient<C, S, N>,
}

impl<C, S, N> TaskApi<'_, C, S, N>
where
    C: HttpClient,
    S: KeyValueStore,
    N: Navigator,
{
    /// 获取一页任务
    ///
    /// 返回的页会再按筛选条件过滤一次，后端忽略查询参数时视图依然一致。
    pub async fn list(&self, filters: &TaskFilters) -> Result<Paginated<Task>, ApiError> {
        let mut page = self.client.send(&ListTasksRequest { filters }).await?;
        let before = page.data.len();
        page.data.retain(|task| filters.matches(task));
        if page.data.len() != before {
            log_info!(
                "[Tasks] Dropped {} task(s) not matching the active filters",
                before - page.data.len()
            );
        }
        Ok(page)
    }

    pub async fn get(&self, id: &str) -> Result<Task, ApiError> {
        self.client.send(&GetTaskRequest { id }).await
    }

    pub async fn create(&self, payload: &TaskPayload) -> Result<Task, ApiError> {
        self.client.send(&CreateTaskRequest { payload }).await
    }

    pub async fn update(&self, id: &str, payload: &TaskPayload) -> Result<Task, ApiError> {
        self.client.send(&UpdateTaskRequest { id, payload }).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.send(&DeleteTaskRequest { id }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockHttpClient, client_with, filters_for_status, page_json, task};
    use taskdeck_shared::protocol::HttpMethod;
    use taskdeck_shared::{TaskPriority, TaskStatus};

    #[tokio::test]
    async fn list_encodes_filters_in_order() {
        let http = MockHttpClient::new();
        http.respond(
            HttpMethod::Get,
            "/api/v1/tasks?status=todo&page=1&limit=10",
            200,
            &page_json(&[]),
        );
        let (client, _, _) = client_with(http.clone());

        let page = client
            .tasks()
            .list(&filters_for_status(TaskStatus::Todo))
            .await
            .unwrap();

        assert!(page.data.is_empty());
        assert!(
            http.last_request()
                .unwrap()
                .url
                .ends_with("/api/v1/tasks?status=todo&page=1&limit=10")
        );
    }

    #[tokio::test]
    async fn list_by_status_returns_only_that_status() {
        let http = MockHttpClient::new();
        // 后端没有按条件过滤
        http.respond(
            HttpMethod::Get,
            "/api/v1/tasks?status=done&page=1&limit=10",
            200,
            &page_json(&[
                task("1", "write report", TaskStatus::Done),
                task("2", "review", TaskStatus::Todo),
                task("3", "deploy", TaskStatus::InProgress),
                task("4", "ship", TaskStatus::Done),
            ]),
        );
        let (client, _, _) = client_with(http);

        let page = client
            .tasks()
            .list(&filters_for_status(TaskStatus::Done))
            .await
            .unwrap();

        let ids: Vec<_> = page.data.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
        assert!(page.data.iter().all(|t| t.status == TaskStatus::Done));
    }

    #[tokio::test]
    async fn search_is_percent_encoded() {
        let http = MockHttpClient::new();
        let filters = TaskFilters::first_page(10)
            .with_search("fix bug & ship")
            .with_priority(Some(TaskPriority::High));
        http.respond(
            HttpMethod::Get,
            "/api/v1/tasks?search=fix%20bug%20%26%20ship&priority=high&page=1&limit=10",
            200,
            &page_json(&[]),
        );
        let (client, _, _) = client_with(http);

        assert!(client.tasks().list(&filters).await.is_ok());
    }

    #[tokio::test]
    async fn create_and_update_send_camel_case_payload() {
        let http = MockHttpClient::new();
        let created = r#"{"id": 12, "title": "Plan", "status": "todo", "priority": "high", "dueDate": "2025-03-01"}"#;
        http.respond(HttpMethod::Post, "/api/v1/tasks", 201, created);
        http.respond(HttpMethod::Put, "/api/v1/tasks/12", 200, created);
        let (client, _, _) = client_with(http.clone());
        let payload = TaskPayload {
            title: "Plan".into(),
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::High,
            due_date: Some("2025-03-01".into()),
        };

        let task = client.tasks().create(&payload).await.unwrap();
        assert_eq!(task.id, "12");
        let body = http.last_request().and_then(|r| r.body).unwrap();
        assert!(body.contains(r#""dueDate":"2025-03-01""#));
        assert!(!body.contains("description"));

        let task = client.tasks().update("12", &payload).await.unwrap();
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(http.last_request().unwrap().method, HttpMethod::Put);
    }

    #[tokio::test]
    async fn delete_ignores_response_body() {
        let http = MockHttpClient::new();
        http.respond(HttpMethod::Delete, "/api/v1/tasks/3", 200, "garbage");
        let (client, _, _) = client_with(http);

        assert_eq!(client.tasks().delete("3").await, Ok(()));
    }

    #[tokio::test]
    async fn errors_propagate_unchanged() {
        let http = MockHttpClient::new();
        http.respond(
            HttpMethod::Get,
            "/api/v1/tasks/5",
            500,
            r#"{"message": "boom"}"#,
        );
        let (client, _, _) = client_with(http);

        assert_eq!(
            client.tasks().get("5").await,
            Err(ApiError::Status {
                status: 500,
                message: Some("boom".into())
            })
        );
    }
}
