use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::{Snapshot, SnapshotFile};

/// 固定的存储键（数据目录下的文件名）
pub const STORAGE_KEY: &str = "jokes.toml";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("snapshot is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 持久化协作者
pub trait Persistence {
    /// 没有保存过快照时返回 `Ok(None)`
    fn load(&self) -> Result<Option<Snapshot>, StorageError>;
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StorageError>;
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// 基于TOML文件的持久化
#[derive(Debug, Clone)]
pub struct TomlStorage {
    path: PathBuf,
}

impl TomlStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 数据目录下以固定存储键命名的文件
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(STORAGE_KEY))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persistence for TomlStorage {
    fn load(&self) -> Result<Option<Snapshot>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let file: SnapshotFile = toml::from_str(&content)?;

        Ok(Some(file.into_snapshot()))
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let file = SnapshotFile::new(snapshot.clone());
        let content = toml::to_string_pretty(&file)?;

        fs::write(&self.path, content)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// 测试用的内存持久化，`saves` 记录保存次数
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    pub stored: std::rc::Rc<std::cell::RefCell<Option<Snapshot>>>,
    pub saves: std::rc::Rc<std::cell::Cell<usize>>,
}

#[cfg(test)]
impl Persistence for MemoryStorage {
    fn load(&self) -> Result<Option<Snapshot>, StorageError> {
        Ok(self.stored.borrow().clone())
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StorageError> {
        *self.stored.borrow_mut() = Some(snapshot.clone());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        *self.stored.borrow_mut() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassifiedItem, Item, Reaction};

    fn sample() -> Snapshot {
        Snapshot {
            pending: vec![Item::new("b", "Why did the chicken \"cross\" the road?")],
            history: vec![ClassifiedItem::new(
                Item::new("a", "multi\nline joke"),
                Reaction::Unfavorable,
                42,
            )],
        }
    }

    #[test]
    fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = TomlStorage::in_dir(dir.path());
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = TomlStorage::in_dir(dir.path());

        storage.save(&sample()).unwrap();
        assert_eq!(storage.load().unwrap(), Some(sample()));

        storage.save(&Snapshot::default()).unwrap();
        assert_eq!(storage.load().unwrap(), Some(Snapshot::default()));
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = TomlStorage::in_dir(dir.path());
        fs::write(storage.path(), "pending = [ this is not toml").unwrap();

        assert!(matches!(storage.load(), Err(StorageError::Parse(_))));
    }

    #[test]
    fn test_clear_removes_file_and_tolerates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = TomlStorage::in_dir(dir.path());

        storage.save(&sample()).unwrap();
        storage.clear().unwrap();
        assert!(!storage.path().exists());
        storage.clear().unwrap();
    }
}
