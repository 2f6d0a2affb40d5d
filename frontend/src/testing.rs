//! 测试替身：内存实现的 HTTP / 存储 / 导航

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use taskdeck_shared::protocol::HttpMethod;
use taskdeck_shared::{Paginated, Task, TaskFilters, TaskPriority, TaskStatus};

use crate::client::ApiClient;
use crate::web::http::{HttpClient, HttpError, HttpRequest, HttpResponse};
use crate::web::location::Navigator;
use crate::web::storage::KeyValueStore;

pub const BASE_URL: &str = "http://api.test";

// =========================================================
// HTTP
// =========================================================

#[derive(Default)]
struct MockInner {
    responses: HashMap<(HttpMethod, String), HttpResponse>,
    requests: Vec<HttpRequest>,
    offline: bool,
}

/// 按 (method, url) 返回预设响应，并记录所有请求
#[derive(Clone, Default)]
pub struct MockHttpClient {
    inner: Rc<RefCell<MockInner>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: HttpMethod, path: &str, status: u16, body: &str) {
        self.inner.borrow_mut().responses.insert(
            (method, format!("{}{}", BASE_URL, path)),
            HttpResponse {
                status,
                body: body.to_string(),
            },
        );
    }

    pub fn go_offline(&self) {
        self.inner.borrow_mut().offline = true;
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.inner.borrow().requests.clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.inner.borrow().requests.last().cloned()
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut inner = self.inner.borrow_mut();
        inner.requests.push(req.clone());
        if inner.offline {
            return Err(HttpError::NetworkError("TypeError: Failed to fetch".into()));
        }
        Ok(inner
            .responses
            .get(&(req.method, req.url.clone()))
            .cloned()
            .unwrap_or(HttpResponse {
                status: 404,
                body: r#"{"detail": "Not Found"}"#.to_string(),
            }))
    }
}

/// 内存任务后端：支持列表、删除，忽略查询参数中的筛选条件
#[derive(Clone, Default)]
pub struct FakeTaskServer {
    tasks: Rc<RefCell<Vec<Task>>>,
    calls: Rc<RefCell<usize>>,
}

impl FakeTaskServer {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Rc::new(RefCell::new(tasks)),
            calls: Rc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.borrow()
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FakeTaskServer {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        *self.calls.borrow_mut() += 1;
        let path = req.url.trim_start_matches(BASE_URL);
        let path = path.split('?').next().unwrap_or(path);
        let prefix = "/api/v1/tasks";

        match (req.method, path) {
            (HttpMethod::Get, p) if p == prefix => {
                let data = self.tasks.borrow().clone();
                let page = Paginated {
                    total: data.len() as u64,
                    page: 1,
                    limit: 10,
                    total_pages: 1,
                    data,
                };
                Ok(HttpResponse {
                    status: 200,
                    body: serde_json::to_string(&page)
                        .map_err(|e| HttpError::ResponseParseFailed(e.to_string()))?,
                })
            }
            (HttpMethod::Delete, p) if p.starts_with(prefix) => {
                let id = p.trim_start_matches(prefix).trim_start_matches('/');
                let mut tasks = self.tasks.borrow_mut();
                let before = tasks.len();
                tasks.retain(|t| t.id != id);
                let status = if tasks.len() < before { 204 } else { 404 };
                Ok(HttpResponse {
                    status,
                    body: String::new(),
                })
            }
            _ => Ok(HttpResponse {
                status: 404,
                body: String::new(),
            }),
        }
    }
}

// =========================================================
// 存储与导航
// =========================================================

#[derive(Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
    /// 写入该 key 时失败，模拟配额已满
    rejected: Option<&'static str>,
}

impl MemoryStorage {
    pub fn rejecting(key: &'static str) -> Self {
        Self {
            rejected: Some(key),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        if self.rejected == Some(key) {
            return false;
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn delete(&self, key: &str) -> bool {
        self.items.borrow_mut().remove(key);
        true
    }
}

#[derive(Clone, Default)]
pub struct RecordingNavigator {
    visits: Rc<RefCell<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<String> {
        self.visits.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate_hard(&self, path: &str) {
        self.visits.borrow_mut().push(path.to_string());
    }
}

// =========================================================
// 组装
// =========================================================

pub type TestClient<C = MockHttpClient> = ApiClient<C, MemoryStorage, RecordingNavigator>;

pub fn client_with<C: HttpClient>(http: C) -> (TestClient<C>, MemoryStorage, RecordingNavigator) {
    let storage = MemoryStorage::default();
    let navigator = RecordingNavigator::default();
    let client = ApiClient::new(BASE_URL, http, storage.clone(), navigator.clone());
    (client, storage, navigator)
}

pub fn task(id: &str, title: &str, status: TaskStatus) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        status,
        priority: TaskPriority::Medium,
        due_date: None,
        created_at: "2025-01-01T00:00:00Z".to_string(),
        updated_at: "2025-01-01T00:00:00Z".to_string(),
    }
}

pub fn page_json(tasks: &[Task]) -> String {
    let page = Paginated {
        data: tasks.to_vec(),
        total: tasks.len() as u64,
        page: 1,
        limit: 10,
        total_pages: 1,
    };
    serde_json::to_string(&page).unwrap_or_default()
}

pub fn filters_for_status(status: TaskStatus) -> TaskFilters {
    TaskFilters::first_page(10).with_status(Some(status))
}
