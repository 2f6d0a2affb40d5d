//! 任务列表查询缓存
//!
//! `QueryCache` 以查询条件为 key 缓存最近一次结果，并用代数（generation）标记失效：
//! 失效之前发出的请求即使晚到，也不会写回缓存。

use std::collections::HashMap;
use std::hash::Hash;

use leptos::prelude::*;
use leptos::task::spawn_local;
use taskdeck_shared::{Paginated, Task, TaskFilters};

use crate::auth::use_auth;

/// 一个在途查询的凭据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket<K> {
    pub key: K,
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub struct QueryCache<K, V> {
    entries: HashMap<K, V>,
    generation: u64,
}

impl<K, V> Default for QueryCache<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            generation: 0,
        }
    }
}

impl<K: Eq + Hash + Clone, V> QueryCache<K, V> {
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn begin(&self, key: K) -> QueryTicket<K> {
        QueryTicket {
            key,
            generation: self.generation,
        }
    }

    /// 写入结果，凭据已过期时丢弃并返回 `false`
    pub fn complete(&mut self, ticket: QueryTicket<K>, value: V) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.entries.insert(ticket.key, value);
        true
    }

    pub fn invalidate(&mut self) {
        self.entries.clear();
        self.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// 完成的请求是否可以写入视图：条件仍是当前条件，且期间没有发生失效
pub fn should_apply<K: PartialEq>(ticket: &QueryTicket<K>, active: &K, generation: u64) -> bool {
    ticket.generation == generation && ticket.key == *active
}

/// 查询在视图中的状态
#[derive(Debug, Clone, PartialEq)]
pub enum QueryStatus<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> QueryStatus<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

// =========================================================
// Leptos 集成
// =========================================================

pub type TaskPage = Paginated<Task>;

/// 全局任务查询客户端，通过 Context 共享
#[derive(Clone, Copy)]
pub struct TaskQueryClient {
    cache: StoredValue<QueryCache<TaskFilters, TaskPage>>,
    /// 每次失效递增，驱动所有活跃查询重新获取
    version: RwSignal<u64>,
}

impl TaskQueryClient {
    pub fn new() -> Self {
        Self {
            cache: StoredValue::new(QueryCache::default()),
            version: RwSignal::new(0),
        }
    }

    /// 变更后调用，丢弃所有缓存的列表
    pub fn invalidate(&self) {
        self.cache.update_value(|cache| cache.invalidate());
        self.version.update(|v| *v += 1);
        log_info!("[Query] Task list cache invalidated");
    }
}

impl Default for TaskQueryClient {
    fn default() -> Self {
        Self::new()
    }
}

pub fn provide_task_queries() -> TaskQueryClient {
    let client = TaskQueryClient::new();
    provide_context(client);
    client
}

pub fn use_task_queries() -> TaskQueryClient {
    use_context::<TaskQueryClient>().expect("TaskQueryClient should be provided")
}

/// 订阅一个任务列表查询
///
/// 条件变化或缓存失效时重新获取。结果只有通过 [`should_apply`] 才会更新视图，
/// 失效前发出的请求晚到时被丢弃。
pub fn use_task_list(filters: Signal<TaskFilters>) -> ReadSignal<QueryStatus<TaskPage>> {
    let auth = use_auth();
    let queries = use_task_queries();
    let (status, set_status) = signal(QueryStatus::Loading);

    Effect::new(move |_| {
        let key = filters.get();
        queries.version.track();

        if let Some(hit) = queries.cache.with_value(|c| c.get(&key).cloned()) {
            set_status.set(QueryStatus::Ready(hit));
            return;
        }

        set_status.set(QueryStatus::Loading);
        let ticket = queries.cache.with_value(|c| c.begin(key.clone()));
        let api = auth.api.get_value();

        spawn_local(async move {
            let result = api.tasks().list(&ticket.key).await;
            let (Some(generation), Some(active)) = (
                queries.cache.try_with_value(|c| c.generation()),
                filters.try_get_untracked(),
            ) else {
                return;
            };
            let apply = should_apply(&ticket, &active, generation);

            match result {
                Ok(page) => {
                    // 条件已切换时仍缓存结果，代数不符时 complete 会丢弃
                    let accepted = queries
                        .cache
                        .try_update_value(|c| c.complete(ticket, page.clone()))
                        .unwrap_or(false);
                    if apply && accepted {
                        set_status.set(QueryStatus::Ready(page));
                    }
                }
                Err(e) => {
                    log_error!("[Query] Failed to load tasks: {}", e);
                    if apply {
                        set_status.set(QueryStatus::Failed(e.user_message()));
                    }
                }
            }
        });
    });

    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeTaskServer, client_with, task};
    use taskdeck_shared::TaskStatus;

    #[test]
    fn stale_ticket_is_rejected_after_invalidate() {
        let mut cache: QueryCache<&str, u32> = QueryCache::default();
        let ticket = cache.begin("all");
        cache.invalidate();

        assert!(!cache.complete(ticket, 1));
        assert_eq!(cache.get(&"all"), None);

        let ticket = cache.begin("all");
        assert!(cache.complete(ticket, 2));
        assert_eq!(cache.get(&"all"), Some(&2));
        assert_eq!(cache.generation(), 1);
    }

    #[test]
    fn keys_are_independent() {
        let mut cache: QueryCache<TaskFilters, u32> = QueryCache::default();
        let todo = TaskFilters::first_page(10).with_status(Some(TaskStatus::Todo));
        let done = TaskFilters::first_page(10).with_status(Some(TaskStatus::Done));

        let t1 = cache.begin(todo.clone());
        let t2 = cache.begin(done.clone());
        assert!(cache.complete(t2, 2));
        assert!(cache.complete(t1, 1));

        assert_eq!(cache.get(&todo), Some(&1));
        assert_eq!(cache.get(&done), Some(&2));
        assert_eq!(cache.get(&TaskFilters::first_page(10)), None);
    }

    #[test]
    fn only_current_ticket_updates_view() {
        let mut cache: QueryCache<TaskFilters, u32> = QueryCache::default();
        let all = TaskFilters::first_page(10);
        let todo = all.clone().with_status(Some(TaskStatus::Todo));

        let current = cache.begin(all.clone());
        assert!(should_apply(&current, &all, cache.generation()));
        assert!(!should_apply(&current, &todo, cache.generation()));

        cache.invalidate();
        assert!(!should_apply(&current, &all, cache.generation()));
    }

    #[tokio::test]
    async fn late_response_from_before_second_delete_is_dropped() {
        let server = FakeTaskServer::with_tasks(vec![
            task("1", "alpha", TaskStatus::Todo),
            task("2", "beta", TaskStatus::Todo),
            task("3", "gamma", TaskStatus::Todo),
        ]);
        let (client, _, _) = client_with(server.clone());
        let mut cache: QueryCache<TaskFilters, TaskPage> = QueryCache::default();
        let filters = TaskFilters::first_page(10);

        client.tasks().delete("1").await.unwrap();
        cache.invalidate();
        let first = cache.begin(filters.clone());
        let stale_page = client.tasks().list(&filters).await.unwrap();

        client.tasks().delete("2").await.unwrap();
        cache.invalidate();
        let second = cache.begin(filters.clone());
        let fresh_page = client.tasks().list(&filters).await.unwrap();

        // 新请求先返回
        assert!(should_apply(&second, &filters, cache.generation()));
        assert!(cache.complete(second, fresh_page));

        // 旧请求晚到，仍包含已删除的任务
        assert!(stale_page.data.iter().any(|t| t.id == "2"));
        assert!(!should_apply(&first, &filters, cache.generation()));
        assert!(!cache.complete(first, stale_page));

        let ids: Vec<_> = cache
            .get(&filters)
            .map(|p| p.data.iter().map(|t| t.id.clone()).collect())
            .unwrap_or_default();
        assert_eq!(ids, vec!["3".to_string()]);
    }

    #[tokio::test]
    async fn delete_then_relist_excludes_deleted_task() {
        let server = FakeTaskServer::with_tasks(vec![
            task("1", "alpha", TaskStatus::Todo),
            task("2", "beta", TaskStatus::Todo),
        ]);
        let (client, _, _) = client_with(server.clone());
        let mut cache: QueryCache<TaskFilters, TaskPage> = QueryCache::default();
        let filters = TaskFilters::first_page(10);

        let ticket = cache.begin(filters.clone());
        let page = client.tasks().list(&filters).await.unwrap();
        assert!(cache.complete(ticket, page));
        assert_eq!(cache.get(&filters).map(|p| p.data.len()), Some(2));

        client.tasks().delete("1").await.unwrap();
        cache.invalidate();
        assert!(cache.get(&filters).is_none());

        let ticket = cache.begin(filters.clone());
        let page = client.tasks().list(&filters).await.unwrap();
        assert!(cache.complete(ticket, page));

        let ids: Vec<_> = cache
            .get(&filters)
            .map(|p| p.data.iter().map(|t| t.id.clone()).collect())
            .unwrap_or_default();
        assert_eq!(ids, vec!["2".to_string()]);
        assert_eq!(server.calls(), 3);
    }

    #[test]
    fn status_accessors() {
        let ready: QueryStatus<u32> = QueryStatus::Ready(3);
        assert_eq!(ready.ready(), Some(&3));
        assert!(QueryStatus::<u32>::Loading.is_loading());
        assert_eq!(
            QueryStatus::<u32>::Failed("nope".into()).error(),
            Some("nope")
        );
    }
}
