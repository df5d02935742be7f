//! todo.txt task list
//!
//! - Parse and write single todo.txt lines
//! - Load and save the whole list from a file

pub mod model;
pub mod parser;
pub mod store;

pub use model::{Priority, Task};
pub use parser::{parse_line, parse_list, to_text};
pub use store::{StoreError, TaskStore, TodoTxtStore};
