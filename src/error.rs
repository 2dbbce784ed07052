use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 存储槽读写错误
    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),
    /// 记录操作错误
    #[error("记录错误: {0}")]
    Store(#[from] StoreError),
    /// 表单输入错误
    #[error("表单错误: {0}")]
    Form(#[from] FormError),
}

/// 存储槽错误
///
/// 只有底层介质真正失败时才会出现，解析失败不算错误
#[derive(Debug, Error)]
pub enum StorageError {
    /// 读取存储槽失败
    #[error("读取存储槽 {slot} 失败: {source}")]
    ReadFailed {
        slot: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入存储槽失败
    #[error("写入存储槽 {slot} 失败: {source}")]
    WriteFailed {
        slot: String,
        #[source]
        source: std::io::Error,
    },
    /// 序列化批次列表失败
    #[error("序列化批次列表失败: {0}")]
    EncodeFailed(#[from] serde_json::Error),
}

/// 记录操作错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 批次不存在（仅 update 会报告）
    #[error("批次不存在: {id}")]
    NotFound { id: String },
    /// ID 生成器连续产生已存在的 ID
    #[error("ID 生成器在 {attempts} 次尝试后仍未产生唯一 ID (最后一次: {last})")]
    DuplicateId { last: String, attempts: usize },
}

/// 表单输入错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// 必填字段为空
    #[error("必填字段为空: {}", .fields.join(", "))]
    MissingRequired { fields: Vec<&'static str> },
    /// 字段名不属于批次结构
    #[error("未知字段: {field}")]
    UnknownField { field: String },
    /// 字段由系统分配，不可修改
    #[error("字段只读: {field}")]
    ReadOnlyField { field: String },
    /// 日期格式无效（应为 YYYY-MM-DD）
    #[error("无效的日期 (应为 YYYY-MM-DD): {value}")]
    InvalidDate { value: String },
    /// 字段赋值格式无效（应为 field=value）
    #[error("无效的字段赋值 (应为 field=value): {input}")]
    InvalidAssignment { input: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建批次不存在错误
    pub fn not_found(id: impl Into<String>) -> Self {
        AppError::Store(StoreError::NotFound { id: id.into() })
    }

    /// 创建存储槽读取错误
    pub fn storage_read_failed(slot: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Storage(StorageError::ReadFailed {
            slot: slot.into(),
            source,
        })
    }

    /// 创建存储槽写入错误
    pub fn storage_write_failed(slot: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Storage(StorageError::WriteFailed {
            slot: slot.into(),
            source,
        })
    }

    /// 是否为"批次不存在"
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Store(StoreError::NotFound { .. }))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Storage(StorageError::EncodeFailed(err))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
