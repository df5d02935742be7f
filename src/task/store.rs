//! todo.txt file persistence

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use super::model::Task;
use super::parser::{parse_list, to_text};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read task list {}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write task list {}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Somewhere an ordered task list can be loaded from and saved to
pub trait TaskStore {
    fn load(&self) -> Result<Vec<Task>, StoreError>;
    fn save(&self, tasks: &[Task]) -> Result<(), StoreError>;
}

/// A todo.txt file on disk
#[derive(Debug, Clone)]
pub struct TodoTxtStore {
    path: PathBuf,
}

impl TodoTxtStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_error(&self, source: io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }

    /// The file that actually holds the list, following a symlink at `path`
    /// even when its target does not exist yet
    fn target(&self) -> io::Result<PathBuf> {
        match fs::canonicalize(&self.path) {
            Ok(target) => Ok(target),
            Err(e) if e.kind() == io::ErrorKind::NotFound => match fs::read_link(&self.path) {
                Ok(link) => Ok(match self.path.parent() {
                    Some(parent) => parent.join(link),
                    None => link,
                }),
                Err(_) => Ok(self.path.clone()),
            },
            Err(e) => Err(e),
        }
    }
}

impl TaskStore for TodoTxtStore {
    fn load(&self) -> Result<Vec<Task>, StoreError> {
        if !self.path.exists() {
            debug!("No task list at {:?}, starting empty", self.path);
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        let tasks = parse_list(&content);
        debug!("Loaded {} tasks from {:?}", tasks.len(), self.path);
        Ok(tasks)
    }

    /// Replace the file contents atomically: write a temp file next to the
    /// real file, then rename it over that file. A symlink at `path` is kept
    /// and so are the permissions of an existing file.
    fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let target = self.target().map_err(|e| self.write_error(e))?;
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut file = tempfile::NamedTempFile::new_in(&dir).map_err(|e| self.write_error(e))?;
        file.write_all(to_text(tasks).as_bytes())
            .map_err(|e| self.write_error(e))?;
        if let Ok(metadata) = fs::metadata(&target) {
            file.as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| self.write_error(e))?;
        }
        file.as_file().sync_all().map_err(|e| self.write_error(e))?;
        file.persist(&target)
            .map_err(|e| self.write_error(e.error))?;

        debug!("Saved {} tasks to {:?}", tasks.len(), target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let store = TodoTxtStore::new(temp.path().join("todo.txt"));
        assert!(store.load()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_store_roundtrip() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join("todo.txt");
        let store = TodoTxtStore::new(&path);

        let tasks = vec![Task::new("Buy milk"), Task::new("Take out trash chore:5")];
        store.save(&tasks)?;

        assert_eq!(
            fs::read_to_string(&path)?,
            "Buy milk\nTake out trash chore:5\n"
        );
        assert_eq!(store.load()?, tasks);
        Ok(())
    }

    #[test]
    fn test_save_overwrites() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join("todo.txt");
        fs::write(&path, "old line one\nold line two\n")?;

        let store = TodoTxtStore::new(&path);
        store.save(&[Task::new("new line")])?;
        assert_eq!(fs::read_to_string(&path)?, "new line\n");
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_save_through_symlink_updates_target() -> anyhow::Result<()> {
        use std::os::unix::fs::symlink;

        let temp = tempdir()?;
        let synced = temp.path().join("synced");
        fs::create_dir(&synced)?;
        let real = synced.join("todo.txt");
        fs::write(&real, "Buy milk\n")?;
        let link = temp.path().join("todo.txt");
        symlink(&real, &link)?;

        let store = TodoTxtStore::new(&link);
        store.save(&[Task::new("Buy milk"), Task::new("Dust chore:1")])?;

        assert!(fs::symlink_metadata(&link)?.file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real)?, "Buy milk\nDust chore:1\n");
        assert_eq!(store.load()?.len(), 2);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_save_through_dangling_symlink_creates_target() -> anyhow::Result<()> {
        use std::os::unix::fs::symlink;

        let temp = tempdir()?;
        let link = temp.path().join("todo.txt");
        symlink("real-todo.txt", &link)?;

        let store = TodoTxtStore::new(&link);
        assert!(store.load()?.is_empty());
        store.save(&[Task::new("Buy milk")])?;

        assert!(fs::symlink_metadata(&link)?.file_type().is_symlink());
        assert_eq!(
            fs::read_to_string(temp.path().join("real-todo.txt"))?,
            "Buy milk\n"
        );
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_file_mode() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir()?;
        let path = temp.path().join("todo.txt");
        fs::write(&path, "old\n")?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644))?;

        TodoTxtStore::new(&path).save(&[Task::new("new")])?;
        assert_eq!(fs::metadata(&path)?.permissions().mode() & 0o777, 0o644);
        Ok(())
    }

    #[test]
    fn test_read_error_names_path() -> anyhow::Result<()> {
        let temp = tempdir()?;
        // A directory cannot be read as a file.
        let store = TodoTxtStore::new(temp.path());
        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("Failed to read task list"));
        Ok(())
    }
}
