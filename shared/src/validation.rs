//! 表单校验
//!
//! 校验发生在提交之前，校验失败的表单不会触达网络层。
//! 每个字段只保留第一条错误。

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::{LoginRequest, SignupRequest, TaskPayload, TaskPriority, TaskStatus, date};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

const EMAIL_MAX: usize = 255;
const PASSWORD_MIN: usize = 6;
const PASSWORD_MAX: usize = 128;
const NAME_MAX: usize = 100;
const TITLE_MAX: usize = 200;
const DESCRIPTION_MAX: usize = 2000;

// =========================================================
// 错误集合
// =========================================================

/// 按字段归类的校验错误
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录错误；同一字段已有错误时忽略
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, msg)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, msg)?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

// =========================================================
// 字段规则
// =========================================================

fn check_email(errors: &mut FieldErrors, email: &str) {
    if email.is_empty() {
        errors.add("email", "Email is required");
    } else if !EMAIL_RE.is_match(email) {
        errors.add("email", "Invalid email address");
    } else if email.chars().count() > EMAIL_MAX {
        errors.add("email", format!("Email must be at most {} characters", EMAIL_MAX));
    }
}

fn check_password(errors: &mut FieldErrors, password: &str) {
    let len = password.chars().count();
    if len == 0 {
        errors.add("password", "Password is required");
    } else if len < PASSWORD_MIN {
        errors.add("password", "Password must be at least 6 characters");
    } else if len > PASSWORD_MAX {
        errors.add(
            "password",
            format!("Password must be at most {} characters", PASSWORD_MAX),
        );
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

// =========================================================
// 表单
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let email = self.email.trim();
        check_email(&mut errors, email);
        check_password(&mut errors, &self.password);
        errors.into_result(|| LoginRequest {
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    /// 确认密码只参与校验，不会出现在请求体中
    pub fn validate(&self) -> Result<SignupRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = self.name.trim();
        if name.is_empty() {
            errors.add("name", "Name is required");
        } else if name.chars().count() > NAME_MAX {
            errors.add("name", format!("Name must be at most {} characters", NAME_MAX));
        }
        let email = self.email.trim();
        check_email(&mut errors, email);
        check_password(&mut errors, &self.password);
        if self.confirm_password.is_empty() {
            errors.add("confirm_password", "Please confirm your password");
        } else if self.confirm_password != self.password {
            errors.add("confirm_password", "Passwords do not match");
        }
        errors.into_result(|| SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

/// 任务表单的原始输入（均为字符串，来自 input / select）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub due_date: String,
}

impl TaskForm {
    pub fn validate(&self) -> Result<TaskPayload, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.add("title", "Title is required");
        } else if title.chars().count() > TITLE_MAX {
            errors.add("title", format!("Title must be at most {} characters", TITLE_MAX));
        }

        let description = non_empty(&self.description);
        if description
            .as_deref()
            .is_some_and(|d| d.chars().count() > DESCRIPTION_MAX)
        {
            errors.add(
                "description",
                format!("Description must be at most {} characters", DESCRIPTION_MAX),
            );
        }

        let status = self.status.parse::<TaskStatus>().ok();
        if status.is_none() {
            errors.add("status", "Status is required");
        }
        let priority = self.priority.parse::<TaskPriority>().ok();
        if priority.is_none() {
            errors.add("priority", "Priority is required");
        }

        let due_date = non_empty(&self.due_date);
        if due_date.as_deref().is_some_and(|d| date::parse_date(d).is_none()) {
            errors.add("due_date", "Invalid date");
        }

        match (status, priority) {
            (Some(status), Some(priority)) if errors.is_empty() => Ok(TaskPayload {
                title: title.to_string(),
                description,
                status,
                priority,
                due_date,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn test_login_rules() {
        let ok = login("  ann@x.com ", "secret1").validate().unwrap();
        assert_eq!(ok.email, "ann@x.com");

        let errs = login("", "").validate().unwrap_err();
        assert_eq!(errs.get("email"), Some("Email is required"));
        assert_eq!(errs.get("password"), Some("Password is required"));

        let errs = login("not-an-email", "12345").validate().unwrap_err();
        assert_eq!(errs.get("email"), Some("Invalid email address"));
        assert_eq!(errs.get("password"), Some("Password must be at least 6 characters"));

        let errs = login("ann@x.com", &"p".repeat(129)).validate().unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(errs.get("password").unwrap().contains("at most"));
    }

    #[test]
    fn test_signup_rules() {
        let mut form = SignupForm {
            name: " Ann ".into(),
            email: "ann@x.com".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        };
        let req = form.validate().unwrap();
        assert_eq!(req.name, "Ann");
        let body = serde_json::to_value(&req).unwrap();
        assert!(body.get("confirm_password").is_none());
        assert!(body.get("confirmPassword").is_none());

        form.confirm_password = "secret2".into();
        let errs = form.validate().unwrap_err();
        assert_eq!(errs.get("confirm_password"), Some("Passwords do not match"));

        form.confirm_password.clear();
        form.name = "   ".into();
        let errs = form.validate().unwrap_err();
        assert_eq!(errs.get("name"), Some("Name is required"));
        assert_eq!(errs.get("confirm_password"), Some("Please confirm your password"));
    }

    #[test]
    fn test_task_rules() {
        let form = TaskForm {
            title: "  Ship it ".into(),
            description: "   ".into(),
            status: "in-progress".into(),
            priority: "high".into(),
            due_date: "".into(),
        };
        let payload = form.validate().unwrap();
        assert_eq!(payload.title, "Ship it");
        assert_eq!(payload.description, None);
        assert_eq!(payload.status, TaskStatus::InProgress);
        assert_eq!(payload.priority, TaskPriority::High);
        assert_eq!(payload.due_date, None);

        let bad = TaskForm {
            title: "".into(),
            description: "d".repeat(2001),
            status: "blocked".into(),
            priority: "".into(),
            due_date: "tomorrow".into(),
        };
        let errs = bad.validate().unwrap_err();
        assert_eq!(errs.get("title"), Some("Title is required"));
        assert!(errs.get("description").is_some());
        assert_eq!(errs.get("status"), Some("Status is required"));
        assert_eq!(errs.get("priority"), Some("Priority is required"));
        assert_eq!(errs.get("due_date"), Some("Invalid date"));
    }

    #[test]
    fn test_first_error_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.add("email", "first");
        errors.add("email", "second");
        assert_eq!(errors.get("email"), Some("first"));
        assert_eq!(errors.to_string(), "email: first");
    }
}
