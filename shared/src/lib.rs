use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod date;
pub mod protocol;
pub mod serde_helper;
pub mod stats;
pub mod validation;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const API_PREFIX: &str = "/api/v1";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";

// =========================================================
// 用户 (User)
// =========================================================

/// 当前登录用户
///
/// 登录接口不返回用户信息，因此登录后的 `id` 为空，`name` 取自邮箱前缀。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_helper::option_string_or_number"
    )]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
}

impl User {
    /// 由登录邮箱派生用户记录
    pub fn from_login_email(email: &str) -> Self {
        let email = email.trim();
        let name = email.split('@').next().unwrap_or(email).to_string();
        Self {
            id: None,
            name,
            email: email.to_string(),
        }
    }
}

// =========================================================
// 任务 (Task)
// =========================================================

/// 任务状态（封闭枚举）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

/// 任务优先级（封闭枚举）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
        }
    }
}

/// 枚举解析失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value: {}", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

impl FromStr for TaskStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

impl FromStr for TaskPriority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskPriority::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(deserialize_with = "serde_helper::string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// 创建 / 更新任务的请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl From<&Task> for TaskPayload {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            due_date: task.due_date.clone(),
        }
    }
}

// =========================================================
// 查询描述符 (Filter Descriptor)
// =========================================================

/// 任务列表查询条件，同时作为查询缓存的 key
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl TaskFilters {
    /// 第一页，指定每页条数
    pub fn first_page(limit: u32) -> Self {
        Self {
            page: Some(1),
            limit: Some(limit),
            ..Default::default()
        }
    }

    /// 只限定条数（仪表盘统计用）
    pub fn sample(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }

    // 修改筛选条件时回到第一页

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.trim().is_empty() {
            None
        } else {
            Some(search)
        };
        self.page = Some(1);
        self
    }

    pub fn with_status(mut self, status: Option<TaskStatus>) -> Self {
        self.status = status;
        self.page = Some(1);
        self
    }

    pub fn with_priority(mut self, priority: Option<TaskPriority>) -> Self {
        self.priority = priority;
        self.page = Some(1);
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page.max(1));
        self
    }

    pub fn current_page(&self) -> u32 {
        self.page.filter(|p| *p > 0).unwrap_or(1)
    }

    /// 非空字段按 search, status, priority, page, limit 的顺序输出
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.as_str().to_string()));
        }
        if let Some(page) = self.page.filter(|p| *p > 0) {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }

    /// 编码后的查询串（不含 `?`），无条件时为空串
    pub fn query_string(&self) -> String {
        self.query_pairs()
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// 判断任务是否满足 status / priority / search 条件（不涉及分页）
    pub fn matches(&self, task: &Task) -> bool {
        if self.status.is_some_and(|s| s != task.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != task.priority) {
            return false;
        }
        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                task.title.to_lowercase().contains(&needle)
                    || task
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            }
        }
    }
}

// =========================================================
// 分页响应 (Pagination)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total_pages: u32,
}

impl<T> Paginated<T> {
    pub fn total_pages(&self) -> u32 {
        self.total_pages.max(1)
    }

    pub fn has_next(&self, page: u32) -> bool {
        page < self.total_pages()
    }

    pub fn has_prev(&self, page: u32) -> bool {
        page > 1
    }

    /// 请求的页码越过末页时返回应退回的页码
    pub fn overflow_target(&self, page: u32) -> Option<u32> {
        (page > self.total_pages()).then(|| self.total_pages())
    }
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            page: 1,
            limit: 0,
            total_pages: 1,
        }
    }
}

// =========================================================
// 认证 (Auth)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// 登录响应，`access_token` 可能缺失
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupAck {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, title: &str, status: TaskStatus, priority: TaskPriority) -> Task {
        Task {
            id: id.into(),
            title: title.into(),
            description: None,
            status,
            priority,
            due_date: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_user_name_from_email_local_part() {
        let user = User::from_login_email("ann@x.com");
        assert_eq!(user.name, "ann");
        assert_eq!(user.email, "ann@x.com");
        assert_eq!(user.id, None);
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            serde_json::json!({ "name": "ann", "email": "ann@x.com" })
        );
    }

    #[test]
    fn test_task_wire_format() {
        let raw = r#"{
            "id": 7,
            "title": "Write docs",
            "status": "in-progress",
            "priority": "high",
            "dueDate": "2025-03-01",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-02T00:00:00Z"
        }"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.id, "7");
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.due_date.as_deref(), Some("2025-03-01"));
        assert_eq!(task.description, None);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let raw = r#"{"id": "1", "title": "t", "status": "blocked"}"#;
        assert!(serde_json::from_str::<Task>(raw).is_err());
        assert!("blocked".parse::<TaskStatus>().is_err());
        assert_eq!("in-progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
    }

    #[test]
    fn test_payload_omits_empty_optionals() {
        let payload = TaskPayload {
            title: "t".into(),
            description: None,
            status: TaskStatus::Done,
            priority: TaskPriority::Low,
            due_date: None,
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({ "title": "t", "status": "done", "priority": "low" })
        );
    }

    #[test]
    fn test_query_string_order_and_omission() {
        let filters = TaskFilters {
            status: Some(TaskStatus::Todo),
            page: Some(1),
            limit: Some(10),
            ..Default::default()
        };
        assert_eq!(filters.query_string(), "status=todo&page=1&limit=10");

        let filters = TaskFilters {
            search: Some("   ".into()),
            page: Some(0),
            ..Default::default()
        };
        assert_eq!(filters.query_string(), "");

        let filters = TaskFilters::first_page(5).with_search("buy milk & eggs");
        assert_eq!(filters.query_string(), "search=buy%20milk%20%26%20eggs&page=1&limit=5");
    }

    #[test]
    fn test_filter_changes_reset_page() {
        let filters = TaskFilters::first_page(10).with_page(4);
        assert_eq!(filters.current_page(), 4);
        assert_eq!(filters.clone().with_status(Some(TaskStatus::Done)).page, Some(1));
        assert_eq!(filters.clone().with_priority(None).page, Some(1));
        assert_eq!(filters.with_search("x").page, Some(1));
    }

    #[test]
    fn test_matches() {
        let mut t = task("1", "Buy Milk", TaskStatus::Done, TaskPriority::Low);
        t.description = Some("from the corner shop".into());

        assert!(TaskFilters::default().matches(&t));
        assert!(TaskFilters::default().with_status(Some(TaskStatus::Done)).matches(&t));
        assert!(!TaskFilters::default().with_status(Some(TaskStatus::Todo)).matches(&t));
        assert!(!TaskFilters::default().with_priority(Some(TaskPriority::High)).matches(&t));
        assert!(TaskFilters::default().with_search("milk").matches(&t));
        assert!(TaskFilters::default().with_search("CORNER").matches(&t));
        assert!(!TaskFilters::default().with_search("bread").matches(&t));
    }

    #[test]
    fn test_paginated_bounds() {
        let page: Paginated<Task> = serde_json::from_str(
            r#"{"data": [], "total": 25, "page": 2, "limit": 10, "totalPages": 3}"#,
        )
        .unwrap();
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next(2));
        assert!(!page.has_next(3));
        assert!(page.has_prev(2));
        assert!(!page.has_prev(1));

        let empty: Paginated<Task> = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert_eq!(empty.total_pages(), 1);
    }

    #[test]
    fn test_page_past_end_falls_back_to_last() {
        // 删除第 3 页唯一一条后，列表只剩 2 页
        let page: Paginated<Task> = serde_json::from_str(
            r#"{"data": [], "total": 20, "page": 3, "limit": 10, "totalPages": 2}"#,
        )
        .unwrap();
        assert_eq!(page.overflow_target(3), Some(2));
        assert_eq!(page.overflow_target(2), None);

        let empty: Paginated<Task> = serde_json::from_str(r#"{"data": [], "totalPages": 0}"#).unwrap();
        assert_eq!(empty.overflow_target(2), Some(1));
        assert_eq!(empty.overflow_target(1), None);
    }
}
