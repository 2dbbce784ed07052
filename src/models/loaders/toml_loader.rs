use crate::models::form::BatchForm;
use crate::models::numeric::format_decimal;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从文件加载的表单草稿
#[derive(Debug, Clone)]
pub struct LoadedForm {
    pub path: PathBuf,
    pub form: BatchForm,
}

/// 从 TOML 文件加载批次表单
pub async fn load_batch_form(toml_file_path: &Path) -> Result<BatchForm> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let form: BatchForm = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    Ok(form)
}

/// 读取 TOML 文件中实际出现的字段（按文件中的顺序），值统一转为表单文本
///
/// 编辑时只覆盖这些字段，文件里没写的字段保持原值
pub async fn load_form_fields(toml_file_path: &Path) -> Result<Vec<(String, String)>> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let table: toml::Table = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    table
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                toml::Value::String(text) => text,
                toml::Value::Integer(number) => number.to_string(),
                toml::Value::Float(number) => format_decimal(number),
                toml::Value::Datetime(date) => date.to_string(),
                other => anyhow::bail!(
                    "字段 {} 的值类型不支持 ({}): {}",
                    key,
                    other.type_str(),
                    toml_file_path.display()
                ),
            };
            Ok((key, text))
        })
        .collect()
}

/// 从文件夹中加载所有 TOML 表单（按文件名排序）
///
/// 无法解析的文件会记录警告并跳过
pub async fn load_all_batch_forms(folder_path: &str) -> Result<Vec<LoadedForm>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut toml_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml_files.push(path);
        }
    }
    toml_files.sort();

    let mut forms = Vec::new();
    for path in toml_files {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_batch_form(&path).await {
            Ok(form) => forms.push(LoadedForm { path, form }),
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(forms)
}
