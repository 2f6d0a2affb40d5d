//! 表单状态管理模块
//!
//! 将零散的 signal 整合为 `FormState` 结构体，负责：
//! - 数据的持有
//! - 新建时的重置与编辑时的回填
//! - 数据到校验表单的转换

use leptos::prelude::*;
use taskdeck_shared::date::to_input_value;
use taskdeck_shared::validation::TaskForm;
use taskdeck_shared::{Task, TaskPriority, TaskStatus};

/// 表单状态结构体
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，非常适合作为 Props 在组件间传递。
/// 状态和优先级保存 select 的原始值，由校验负责解析。
#[derive(Clone, Copy)]
pub struct FormState {
    pub title: RwSignal<String>,
    pub description: RwSignal<String>,
    pub status: RwSignal<String>,
    pub priority: RwSignal<String>,
    /// `YYYY-MM-DD`，空串表示无截止日期
    pub due_date: RwSignal<String>,
}

impl FormState {
    /// 创建新的表单状态，所有字段使用默认值
    pub fn new() -> Self {
        Self {
            title: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            status: RwSignal::new(TaskStatus::default().as_str().to_string()),
            priority: RwSignal::new(TaskPriority::default().as_str().to_string()),
            due_date: RwSignal::new(String::new()),
        }
    }

    /// 重置表单到初始状态
    pub fn reset(&self) {
        self.title.set(String::new());
        self.description.set(String::new());
        self.status.set(TaskStatus::default().as_str().to_string());
        self.priority.set(TaskPriority::default().as_str().to_string());
        self.due_date.set(String::new());
    }

    /// 用已有任务回填
    pub fn load(&self, task: &Task) {
        self.title.set(task.title.clone());
        self.description
            .set(task.description.clone().unwrap_or_default());
        self.status.set(task.status.as_str().to_string());
        self.priority.set(task.priority.as_str().to_string());
        self.due_date.set(
            task.due_date
                .as_deref()
                .map(to_input_value)
                .unwrap_or_default(),
        );
    }

    /// 读取当前输入，交给 `TaskForm::validate` 校验
    pub fn to_form(&self) -> TaskForm {
        TaskForm {
            title: self.title.get_untracked(),
            description: self.description.get_untracked(),
            status: self.status.get_untracked(),
            priority: self.priority.get_untracked(),
            due_date: self.due_date.get_untracked(),
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}
