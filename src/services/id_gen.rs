//! ID 生成能力

use std::cell::Cell;
use uuid::Uuid;

/// 为新批次产生不透明 ID
pub trait IdGenerator {
    fn next_id(&self) -> String;
}

/// 随机 UUID（v4）
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// 顺序 ID：`{prefix}{n}`，从 1 开始
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: Cell<u64>,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: Cell::new(1),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self.next.get();
        self.next.set(n + 1);
        format!("{}{}", self.prefix, n)
    }
}
