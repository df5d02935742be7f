//! todo.txt parser and writer
//!
//! Parsing never fails. Header fields (`x`, `(A)`, dates) are recognised
//! only when they are well formed and start the line; anything else is left
//! in the description.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

use super::model::{Priority, Task};

static PRIORITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(([A-Z])\)(?:\s+|$)").expect("priority pattern is valid"));

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})(?:\s+|$)").expect("date pattern is valid")
});

/// Parse a single todo.txt line
pub fn parse_line(line: &str) -> Task {
    let mut rest = line.trim_end();
    let mut task = Task::default();

    // An indented line has no header.
    if rest.starts_with(char::is_whitespace) {
        task.description = rest.trim_start().to_string();
        return task;
    }

    if rest == "x" {
        task.completed = true;
        return task;
    }
    if let Some(after) = rest.strip_prefix("x ") {
        task.completed = true;
        rest = after.trim_start();
    }

    if let Some(caps) = PRIORITY_RE.captures(rest) {
        task.priority = caps[1].chars().next().and_then(Priority::new);
        rest = &rest[caps[0].len()..];
    }

    if task.completed {
        task.completion_date = take_date(&mut rest);
        if task.completion_date.is_some() {
            task.creation_date = take_date(&mut rest);
        }
    } else {
        task.creation_date = take_date(&mut rest);
    }

    task.description = rest.to_string();
    task
}

/// Consume a leading `YYYY-MM-DD` token if it is a real calendar date
fn take_date(rest: &mut &str) -> Option<NaiveDate> {
    let text: &str = *rest;
    let caps = DATE_RE.captures(text)?;
    let date = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok()?;
    *rest = &text[caps[0].len()..];
    Some(date)
}

/// Whether `text` at the start of a line would be read as header fields
pub(crate) fn starts_like_header(text: &str) -> bool {
    let mut rest = text;
    text == "x"
        || text.starts_with("x ")
        || PRIORITY_RE.is_match(text)
        || take_date(&mut rest).is_some()
}

/// Parse todo.txt content, skipping blank lines
pub fn parse_list(content: &str) -> Vec<Task> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
        .collect()
}

/// Write tasks as todo.txt content, one per line with a trailing newline
pub fn to_text(tasks: &[Task]) -> String {
    let mut output = String::new();
    for task in tasks {
        output.push_str(&task.to_line());
        output.push('\n');
    }
    output
}
