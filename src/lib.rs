//! # Potato Quality
//!
//! 土豆批次质量登记：记录每批土豆的检验指标，计算缺陷扣款与质量等级
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有存储介质，只暴露 load / save 能力
//! - `StorageSlot` - 持久化适配器（`MemorySlot` / `FileSlot`）
//!
//! ### ② 模型层（Models）
//! - `Batch` / `BatchDraft` / `BatchPatch` - 批次记录、新建字段、更新补丁
//! - `BatchForm` - 表单状态（全部为文本），必填检查只在这里做
//! - `MetricField` - 十项质量指标的目录
//!
//! ### ③ 业务能力层（Services）
//! - `BatchStore` - 批次列表的增删改查与搜索
//! - `quality` - 缺陷总和、扣款比例、质量等级（纯函数）
//! - `Clock` / `IdGenerator` - 由调用方注入的时间与 ID 能力
//!
//! ### ④ 表现层与编排层
//! - `presentation/` - 列表、详情、删除确认
//! - `app` - 一个用户动作 = 一次存储操作 + 一次渲染
//!
//! ## 模块结构

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod presentation;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use app::{App, ImportSummary};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{FileSlot, MemorySlot, StorageSlot};
pub use models::{Batch, BatchDraft, BatchForm, BatchPatch, MetricField, Metrics};
pub use services::{
    evaluate, price_deduction, quality_class, total_defects, BatchStore, Clock, IdGenerator,
    QualityClass, QualityReport,
};
