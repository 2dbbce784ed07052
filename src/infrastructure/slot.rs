//! 存储槽 - 基础设施层
//!
//! 一个具名槽位只保存一段字节（整个批次列表的 JSON），
//! 只暴露 load / save 两个能力，不认识 Batch

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{AppError, AppResult};

/// 默认槽位名（与浏览器 localStorage 的键一致）
pub const DEFAULT_SLOT_NAME: &str = "potato_batches";

/// 持久化适配器
///
/// - `load` 在槽位不存在时返回 `Ok(None)`
/// - `save` 每次写入完整内容
pub trait StorageSlot {
    fn name(&self) -> &str;
    fn load(&self) -> AppResult<Option<Vec<u8>>>;
    fn save(&mut self, bytes: &[u8]) -> AppResult<()>;
}

/// 内存槽位
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    name: String,
    bytes: Option<Vec<u8>>,
    saves: usize,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self {
            name: DEFAULT_SLOT_NAME.to_string(),
            bytes: None,
            saves: 0,
        }
    }

    /// 预置内容（模拟已有的存储数据）
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Some(bytes.into()),
            ..Self::new()
        }
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }

    /// 已执行的写入次数
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl StorageSlot for MemorySlot {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> AppResult<Option<Vec<u8>>> {
        Ok(self.bytes.clone())
    }

    fn save(&mut self, bytes: &[u8]) -> AppResult<()> {
        self.bytes = Some(bytes.to_vec());
        self.saves += 1;
        Ok(())
    }
}

/// 文件槽位
///
/// 写入时先写临时文件再重命名，避免留下半截内容
#[derive(Debug, Clone)]
pub struct FileSlot {
    name: String,
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| DEFAULT_SLOT_NAME.to_string());
        Self { name, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut file_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        file_name.push(".tmp");
        self.path.with_file_name(file_name)
    }
}

impl StorageSlot for FileSlot {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> AppResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => {
                debug!("读取存储文件 {} ({} 字节)", self.path.display(), bytes.len());
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("存储文件不存在: {}", self.path.display());
                Ok(None)
            }
            Err(e) => Err(AppError::storage_read_failed(&self.name, e)),
        }
    }

    fn save(&mut self, bytes: &[u8]) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::storage_write_failed(&self.name, e))?;
        }
        let temp = self.temp_path();
        fs::write(&temp, bytes).map_err(|e| AppError::storage_write_failed(&self.name, e))?;
        fs::rename(&temp, &self.path)
            .map_err(|e| AppError::storage_write_failed(&self.name, e))?;
        debug!("写入存储文件 {} ({} 字节)", self.path.display(), bytes.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_slot_counts_saves() {
        let mut slot = MemorySlot::new();
        assert_eq!(slot.load().unwrap(), None);
        slot.save(b"[]").unwrap();
        slot.save(b"[1]").unwrap();
        assert_eq!(slot.bytes(), Some(&b"[1]"[..]));
        assert_eq!(slot.save_count(), 2);
        assert_eq!(slot.name(), DEFAULT_SLOT_NAME);
    }

    #[test]
    fn test_file_slot_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSlot::new(dir.path().join("potato_batches.json"));
        assert_eq!(slot.load().unwrap(), None);
        assert_eq!(slot.name(), "potato_batches");
    }

    #[test]
    fn test_file_slot_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut slot = FileSlot::new(dir.path().join("nested").join("store.json"));
        slot.save(b"[]").unwrap();
        slot.save(b"[{}]").unwrap();
        assert_eq!(slot.load().unwrap(), Some(b"[{}]".to_vec()));
        assert!(!slot.temp_path().exists());
    }
}
