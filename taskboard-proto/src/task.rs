//! Task model shared by the board client and the task API server.
//!
//! Defines the task record as it travels over the wire (camelCase JSON),
//! the fixed set of board columns, and the create/edit payloads. Task
//! identifiers are coerced to a single canonical numeric type here, at
//! the point of ingestion, so nothing downstream compares strings to
//! numbers.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Maximum allowed task title length in characters.
pub const MAX_TASK_TITLE_LENGTH: usize = 256;

/// Wire format for due dates (`YYYY-MM-DD`).
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors raised when validating task input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Task title is empty or whitespace only.
    #[error("task title cannot be empty")]
    TitleEmpty,
    /// Task title exceeds [`MAX_TASK_TITLE_LENGTH`].
    #[error("task title too long (max {MAX_TASK_TITLE_LENGTH} characters)")]
    TitleTooLong,
    /// A task identifier could not be parsed.
    #[error("invalid task id: {0}")]
    InvalidId(String),
    /// A status name did not match any column.
    #[error("unknown status: {0}")]
    UnknownStatus(String),
    /// A priority name did not match any level.
    #[error("unknown priority: {0}")]
    UnknownPriority(String),
    /// A due date was not in `YYYY-MM-DD` form.
    #[error("invalid due date: {0}")]
    InvalidDueDate(String),
}

/// Unique identifier for a task, assigned by the task API on creation.
///
/// Numeric in transit. Decoding also accepts the decimal string form
/// (`"7"`), so ids that were stringified somewhere upstream still compare
/// equal once they are inside the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Creates a `TaskId` from its numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns the id following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TaskId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for TaskId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ValidationError::InvalidId(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TaskIdVisitor;

        impl Visitor<'_> for TaskIdVisitor {
            type Value = TaskId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer task id or its decimal string form")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<TaskId, E> {
                Ok(TaskId(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<TaskId, E> {
                u64::try_from(v)
                    .map(TaskId)
                    .map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<TaskId, E> {
                v.parse()
                    .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(TaskIdVisitor)
    }
}

/// Board column a task belongs to.
///
/// Serialized as the column id (`todo`, `inprogress`, `done`). The column
/// titles are accepted on input as well, since older data files store them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Not started.
    #[default]
    #[serde(rename = "todo", alias = "To Do")]
    Todo,
    /// Being worked on.
    #[serde(rename = "inprogress", alias = "In Progress")]
    InProgress,
    /// Finished.
    #[serde(rename = "done", alias = "Done")]
    Done,
}

impl Status {
    /// All columns in display order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Column identifier used on the wire.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "inprogress",
            Self::Done => "done",
        }
    }

    /// Human-facing column title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Status {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "todo" => Ok(Self::Todo),
            "inprogress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(ValidationError::UnknownStatus(s.to_string())),
        }
    }
}

/// Task priority. Absent or null decodes to [`Priority::Medium`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority.
    #[serde(alias = "Low")]
    Low,
    /// Default priority.
    #[default]
    #[serde(alias = "Medium")]
    Medium,
    /// High priority.
    #[serde(alias = "High")]
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ValidationError::UnknownPriority(s.to_string())),
        }
    }
}

/// Parses a `YYYY-MM-DD` due date.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDueDate`] if the string is not a
/// valid calendar date in that form.
pub fn parse_due_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), DUE_DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDueDate(s.to_string()))
}

/// Checks a task title: non-blank and at most [`MAX_TASK_TITLE_LENGTH`] chars.
///
/// # Errors
///
/// Returns [`ValidationError::TitleEmpty`] or [`ValidationError::TitleTooLong`].
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::TitleEmpty);
    }
    if title.chars().count() > MAX_TASK_TITLE_LENGTH {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(())
}

/// A task card on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Identifier assigned by the task API. Never mutated or reused.
    pub id: TaskId,
    /// Card title.
    pub title: String,
    /// Optional longer text; empty when absent.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Column the task belongs to.
    pub status: Status,
    /// Sort key within the task's column.
    #[serde(default, deserialize_with = "null_as_default")]
    pub order: u32,
    /// Priority, `medium` when absent.
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: Priority,
    /// Optional due date.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_due_date"
    )]
    pub due_date: Option<NaiveDate>,
}

impl Task {
    /// Creates a task with default priority, no description and no due date.
    #[must_use]
    pub fn new(id: TaskId, title: impl Into<String>, status: Status, order: u32) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            status,
            order,
            priority: Priority::default(),
            due_date: None,
        }
    }

    /// Returns a copy with the editable fields replaced by those set in `edit`.
    ///
    /// `status` and `order` are never touched by an edit.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the edited title is invalid.
    pub fn apply_edit(&self, edit: &TaskEdit) -> Result<Self, ValidationError> {
        let mut task = self.clone();
        if let Some(title) = &edit.title {
            validate_title(title)?;
            task.title.clone_from(title);
        }
        if let Some(description) = &edit.description {
            task.description.clone_from(description);
        }
        if let Some(priority) = edit.priority {
            task.priority = priority;
        }
        if let Some(due_date) = edit.due_date {
            task.due_date = due_date;
        }
        Ok(task)
    }
}

/// Changes to the editable fields of a task. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New priority.
    pub priority: Option<Priority>,
    /// New due date; `Some(None)` clears it.
    pub due_date: Option<Option<NaiveDate>>,
}

impl TaskEdit {
    /// Returns `true` if the edit changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}

/// Body of a create request.
///
/// `title` defaults to empty so that a missing title reaches validation
/// instead of failing to decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    /// Card title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Optional longer text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Target column.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: Status,
    /// Priority.
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: Priority,
    /// Optional due date.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_due_date"
    )]
    pub due_date: Option<NaiveDate>,
    /// Explicit position; the server appends to the column when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl NewTask {
    /// Creates a create request for `title` in column `status`.
    #[must_use]
    pub fn new(title: impl Into<String>, status: Status) -> Self {
        Self {
            title: title.into(),
            status,
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the title is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)
    }

    /// Builds the stored task once the server has picked an id and order.
    #[must_use]
    pub fn into_task(self, id: TaskId, order: u32) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            status: self.status,
            order,
            priority: self.priority,
            due_date: self.due_date,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn deserialize_due_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_due_date(&s).map(Some).map_err(de::Error::custom),
    }
}
