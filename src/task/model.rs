//! Task data model

use chrono::NaiveDate;

use super::parser::starts_like_header;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task priority, a single uppercase letter `A`..=`Z`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Priority(char);

impl Priority {
    /// Priority that marks a chore as skipped instead of done
    pub const SKIP: Priority = Priority('S');

    /// Parse a priority letter
    pub fn new(letter: char) -> Option<Self> {
        letter.is_ascii_uppercase().then_some(Self(letter))
    }

    /// Parse from text such as `S`
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::new(c),
            _ => None,
        }
    }

    pub fn letter(&self) -> char {
        self.0
    }

    pub fn is_skip(&self) -> bool {
        *self == Self::SKIP
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0)
    }
}

/// A task, one line of a todo.txt file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Task {
    /// Priority letter, if any
    #[serde(default)]
    pub priority: Option<Priority>,

    /// Whether the line starts with `x `
    #[serde(default)]
    pub completed: bool,

    /// When the task was completed (only meaningful if `completed`)
    #[serde(default)]
    pub completion_date: Option<NaiveDate>,

    /// When the task was created
    #[serde(default)]
    pub creation_date: Option<NaiveDate>,

    /// Free text, including `+project`, `@context` and `key:value` annotations
    pub description: String,
}

impl Task {
    /// Create a new active task with no priority and no dates
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    /// Mark task as done on the given date
    pub fn complete(&mut self, on: NaiveDate) {
        self.completed = true;
        self.completion_date = Some(on);
    }

    /// Priority as recorded on the line, or from a `pri:X` attribute.
    ///
    /// Many todo.txt clients strip the `(X)` prefix when completing a task and
    /// keep it as `pri:X` instead.
    pub fn effective_priority(&self) -> Option<Priority> {
        self.priority.or_else(|| {
            self.description
                .split_whitespace()
                .find_map(|word| word.strip_prefix("pri:").and_then(Priority::parse))
        })
    }

    /// Format as a todo.txt line.
    ///
    /// Line breaks in the description are written as spaces. A description
    /// that would be read back as header fields is indented when nothing
    /// else precedes it.
    pub fn to_line(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(5);

        if self.completed {
            parts.push("x".to_string());
        }
        if let Some(priority) = &self.priority {
            parts.push(priority.to_string());
        }

        if self.completed {
            // A lone date on a completed line is read back as the completion date.
            if let Some(done) = &self.completion_date {
                parts.push(done.format("%Y-%m-%d").to_string());
                if let Some(created) = &self.creation_date {
                    parts.push(created.format("%Y-%m-%d").to_string());
                }
            }
        } else if let Some(created) = &self.creation_date {
            parts.push(created.format("%Y-%m-%d").to_string());
        }

        if !self.description.is_empty() {
            let description = self.description.replace(['\r', '\n'], " ");
            if parts.is_empty() && starts_like_header(&description) {
                return format!(" {}", description);
            }
            parts.push(description);
        }

        parts.join(" ")
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}
