//! Bug model and the pure validation rules applied before persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Maximum title length, counted in characters.
pub const TITLE_MAX_CHARS: usize = 100;

/// Lifecycle status of a bug. Any value may follow any other.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum BugStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
}

impl BugStatus {
    pub const ALL: [BugStatus; 3] = [BugStatus::Open, BugStatus::InProgress, BugStatus::Resolved];

    pub fn as_str(&self) -> &'static str {
        match self {
            BugStatus::Open => "open",
            BugStatus::InProgress => "in-progress",
            BugStatus::Resolved => "resolved",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(BugStatus::Open),
            "in-progress" => Some(BugStatus::InProgress),
            "resolved" => Some(BugStatus::Resolved),
            _ => None,
        }
    }
}

/// Priority level of a bug.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BugPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl BugPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            BugPriority::Low => "low",
            BugPriority::Medium => "medium",
            BugPriority::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(BugPriority::Low),
            "medium" => Some(BugPriority::Medium),
            "high" => Some(BugPriority::High),
            _ => None,
        }
    }
}

/// A persisted defect report. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Bug {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: BugStatus,
    pub priority: BugPriority,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating a new bug.
///
/// Fields arrive as loose strings so that a missing field or an unknown enum
/// value surfaces as a validation error rather than a decoding failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBugRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

impl CreateBugRequest {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            ..Default::default()
        }
    }

    pub fn with_priority(mut self, priority: BugPriority) -> Self {
        self.priority = Some(priority.as_str().to_string());
        self
    }

    pub fn with_status(mut self, status: BugStatus) -> Self {
        self.status = Some(status.as_str().to_string());
        self
    }

    /// Validate the request and apply defaults for `status` and `priority`.
    pub fn validate(&self) -> Result<NewBug, AppError> {
        let title = validate_title(self.title.as_deref())?;
        let description = validate_description(self.description.as_deref())?;
        let status = match self.status.as_deref() {
            Some(s) => parse_status(s)?,
            None => BugStatus::default(),
        };
        let priority = match self.priority.as_deref() {
            Some(p) => parse_priority(p)?,
            None => BugPriority::default(),
        };

        Ok(NewBug {
            title,
            description,
            status,
            priority,
        })
    }
}

/// A validated create request with defaults applied, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBug {
    pub title: String,
    pub description: String,
    pub status: BugStatus,
    pub priority: BugPriority,
}

/// Request body for updating an existing bug. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBugRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

impl UpdateBugRequest {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn status(mut self, status: BugStatus) -> Self {
        self.status = Some(status.as_str().to_string());
        self
    }

    pub fn priority(mut self, priority: BugPriority) -> Self {
        self.priority = Some(priority.as_str().to_string());
        self
    }

    /// Merge the supplied fields into `existing` and validate the result.
    pub fn apply_to(&self, existing: &Bug) -> Result<Bug, AppError> {
        let mut merged = existing.clone();

        if self.title.is_some() {
            merged.title = validate_title(self.title.as_deref())?;
        }
        if self.description.is_some() {
            merged.description = validate_description(self.description.as_deref())?;
        }
        if let Some(status) = self.status.as_deref() {
            merged.status = parse_status(status)?;
        }
        if let Some(priority) = self.priority.as_deref() {
            merged.priority = parse_priority(priority)?;
        }

        Ok(merged)
    }
}

fn validate_title(title: Option<&str>) -> Result<String, AppError> {
    let title = title.map(str::trim).unwrap_or_default();
    if title.is_empty() {
        return Err(AppError::Validation("Please add a title".to_string()));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(AppError::Validation(format!(
            "Title can not be more than {} characters",
            TITLE_MAX_CHARS
        )));
    }
    Ok(title.to_string())
}

fn validate_description(description: Option<&str>) -> Result<String, AppError> {
    let description = description.map(str::trim).unwrap_or_default();
    if description.is_empty() {
        return Err(AppError::Validation("Please add a description".to_string()));
    }
    Ok(description.to_string())
}

fn parse_status(s: &str) -> Result<BugStatus, AppError> {
    BugStatus::parse(s).ok_or_else(|| {
        AppError::Validation(format!(
            "`{}` is not a valid status (expected open, in-progress or resolved)",
            s
        ))
    })
}

fn parse_priority(s: &str) -> Result<BugPriority, AppError> {
    BugPriority::parse(s).ok_or_else(|| {
        AppError::Validation(format!(
            "`{}` is not a valid priority (expected low, medium or high)",
            s
        ))
    })
}
