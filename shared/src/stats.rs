//! 任务统计
//!
//! 统计只基于当前已加载的一页数据，并非后端的全局聚合。

use crate::{Task, TaskStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |mut acc, task| {
            acc.total += 1;
            match task.status {
                TaskStatus::Todo => acc.todo += 1,
                TaskStatus::InProgress => acc.in_progress += 1,
                TaskStatus::Done => acc.done += 1,
            }
            acc
        })
    }

    /// 未完成 = todo + in-progress
    pub fn pending(&self) -> usize {
        self.total - self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TaskPriority;

    fn task(id: &str, status: TaskStatus) -> Task {
        Task {
            id: id.into(),
            title: format!("task {id}"),
            description: None,
            status,
            priority: TaskPriority::Medium,
            due_date: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn counts_by_status() {
        let tasks = vec![
            task("1", TaskStatus::Todo),
            task("2", TaskStatus::InProgress),
            task("3", TaskStatus::Done),
            task("4", TaskStatus::Done),
        ];
        let stats = TaskStats::from_tasks(&tasks);
        assert_eq!(
            stats,
            TaskStats {
                total: 4,
                todo: 1,
                in_progress: 1,
                done: 2
            }
        );
        assert_eq!(stats.pending(), 2);
    }

    #[test]
    fn empty_page() {
        let stats = TaskStats::from_tasks(&[]);
        assert_eq!(stats, TaskStats::default());
        assert_eq!(stats.pending(), 0);
    }
}
