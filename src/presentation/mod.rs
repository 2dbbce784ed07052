//! 表现层
//!
//! 把存储与评估的结果渲染为终端文本，并负责删除前的确认

pub mod confirm;
pub mod report;

pub use confirm::{AutoConfirm, Confirm, PromptConfirm, DELETE_PROMPT};
pub use report::{render_batch_detail, render_batch_table, render_summary, BatchRow};
