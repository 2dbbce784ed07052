/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::info;

use crate::config::Config;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🥔 土豆批次质量登记 - 启动");
    info!("💾 存储文件: {}", config.store_file);
    info!("{}", "=".repeat(60));
}

/// 记录表单加载信息
///
/// # 参数
/// - `total`: 表单总数
/// - `folder`: 表单目录
pub fn log_forms_loaded(total: usize, folder: &str) {
    info!("✓ 在 {} 中找到 {} 个待导入的表单", folder, total);
}

/// 打印导入统计信息
///
/// # 参数
/// - `imported`: 成功导入数量
/// - `skipped`: 跳过数量
/// - `total`: 总数
pub fn log_import_summary(imported: usize, skipped: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 导入完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", imported, total);
    info!("⚠️ 跳过: {}", skipped);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
