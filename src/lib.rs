//! grocy-todo library - Sync Grocy chores with a todo.txt task list

pub mod chore;
pub mod cli;
pub mod config;
pub mod grocy;
pub mod task;
