//! 命令行定义

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::error::FormError;

#[derive(Debug, Parser)]
#[command(name = "potato_quality", version, about = "土豆批次质量登记")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// 列出批次（可按批次号或供应商搜索）
    List {
        #[arg(long, short)]
        search: Option<String>,
        /// 以 JSON 输出，附带质量评估
        #[arg(long)]
        json: bool,
    },
    /// 显示单个批次的详情
    Show { id: String },
    /// 从 TOML 表单新增批次
    Add {
        #[arg(long)]
        file: PathBuf,
    },
    /// 导入收件目录中的所有 TOML 表单
    Import,
    /// 修改批次
    Edit {
        id: String,
        /// 完整的编辑表单
        #[arg(long)]
        file: Option<PathBuf>,
        /// 单个字段赋值，可重复
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },
    /// 删除批次（需要确认）
    Delete {
        id: String,
        /// 跳过确认
        #[arg(long, short)]
        yes: bool,
    },
}

/// 解析 `field=value`
pub fn parse_assignment(input: &str) -> Result<(String, String), FormError> {
    match input.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.to_string()))
        }
        _ => Err(FormError::InvalidAssignment {
            input: input.to_string(),
        }),
    }
}
