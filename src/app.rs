//! 编排层
//!
//! 每个用户动作 = 一次完整的存储操作 + 一次渲染，动作之间不重叠

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

use crate::cli::Command;
use crate::config::Config;
use crate::error::AppError;
use crate::infrastructure::{FileSlot, StorageSlot};
use crate::models::batch::{Batch, BatchPatch};
use crate::models::form::BatchForm;
use crate::models::loaders::{load_all_batch_forms, load_batch_form, load_form_fields};
use crate::presentation::{
    render_batch_detail, render_batch_table, AutoConfirm, BatchRow, Confirm, DELETE_PROMPT,
};
use crate::services::{BatchStore, Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::utils::logging::{log_forms_loaded, log_import_summary, log_startup};

/// 取消删除时的提示
const DELETE_CANCELLED: &str = "تم إلغاء الحذف";

/// 应用主结构
pub struct App<S: StorageSlot = FileSlot> {
    config: Config,
    store: BatchStore<S>,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
}

impl App<FileSlot> {
    /// 初始化应用：打开存储文件
    pub fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let store = BatchStore::open(FileSlot::new(&config.store_file))
            .with_context(|| format!("无法打开存储文件: {}", config.store_file))?;

        Ok(Self::from_parts(
            config,
            store,
            Box::new(SystemClock),
            Box::new(UuidGenerator),
        ))
    }
}

/// 导入统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    pub total: usize,
}

impl<S: StorageSlot> App<S> {
    /// 用现成的存储、时钟与 ID 生成器组装应用
    pub fn from_parts(
        config: Config,
        store: BatchStore<S>,
        clock: Box<dyn Clock>,
        ids: Box<dyn IdGenerator>,
    ) -> Self {
        Self {
            config,
            store,
            clock,
            ids,
        }
    }

    pub fn store(&self) -> &BatchStore<S> {
        &self.store
    }

    /// 执行一条命令，返回要输出的文本
    pub async fn run(&mut self, command: Command, confirm: &mut dyn Confirm) -> Result<String> {
        match command {
            Command::List { search, json } => self.list(search.as_deref(), json),
            Command::Show { id } => self.show(&id),
            Command::Add { file } => {
                let form = load_batch_form(&file).await?;
                let batch = self.add_form(form)?;
                Ok(render_batch_detail(&batch))
            }
            Command::Import => {
                self.import().await?;
                self.list(None, false)
            }
            Command::Edit { id, file, set } => {
                let patch = self.build_patch(&id, file.as_deref(), &set).await?;
                let batch = self.edit(&id, &patch)?;
                Ok(render_batch_detail(&batch))
            }
            Command::Delete { id, yes } => {
                if yes {
                    self.delete(&id, &mut AutoConfirm(true))
                } else {
                    self.delete(&id, confirm)
                }
            }
        }
    }

    /// 渲染列表（或 JSON）
    pub fn list(&self, query: Option<&str>, json: bool) -> Result<String> {
        let batches = self.store.search(query);
        if json {
            let rows: Vec<BatchRow> = batches.into_iter().map(BatchRow::from).collect();
            return Ok(serde_json::to_string_pretty(&rows)?);
        }
        Ok(render_batch_table(&batches, query))
    }

    pub fn show(&self, id: &str) -> Result<String> {
        let batch = self.store.get(id).ok_or_else(|| AppError::not_found(id))?;
        Ok(render_batch_detail(batch))
    }

    /// 提交新建表单
    pub fn add_form(&mut self, form: BatchForm) -> Result<Batch> {
        let draft = form.into_draft()?;
        let batch = self.store.add(draft, self.clock.as_ref(), self.ids.as_ref())?;
        Ok(batch)
    }

    /// 提交编辑补丁
    pub fn edit(&mut self, id: &str, patch: &BatchPatch) -> Result<Batch> {
        let batch = self.store.update(id, patch, self.clock.as_ref())?;
        Ok(batch)
    }

    /// 编辑补丁
    ///
    /// 表单文件：以已保存的批次预填表单，只覆盖文件里出现的字段；
    /// 之后再叠加逐项赋值
    async fn build_patch(
        &self,
        id: &str,
        file: Option<&Path>,
        assignments: &[(String, String)],
    ) -> Result<BatchPatch> {
        let mut patch = match file {
            Some(path) => {
                let existing = self.store.get(id).ok_or_else(|| AppError::not_found(id))?;
                let mut form = BatchForm::from_batch(existing);
                for (field, value) in load_form_fields(path).await? {
                    form.set(&field, value)?;
                }
                form.into_patch()?
            }
            None => BatchPatch::new(),
        };
        for (field, value) in assignments {
            patch.set_field(field, value)?;
        }
        if patch.is_empty() {
            anyhow::bail!("没有要修改的字段 (使用 --file 或 --set)");
        }
        Ok(patch)
    }

    /// 删除批次：确认后才发出删除，之后重新渲染列表
    pub fn delete(&mut self, id: &str, confirm: &mut dyn Confirm) -> Result<String> {
        if !confirm.confirm(DELETE_PROMPT).context("读取确认输入失败")? {
            info!("用户取消删除 {}", id);
            return Ok(DELETE_CANCELLED.to_string());
        }
        self.store.remove(id)?;
        self.list(None, false)
    }

    /// 导入收件目录中的所有表单
    ///
    /// 必填字段缺失的表单跳过；成功导入的文件默认删除
    pub async fn import(&mut self) -> Result<ImportSummary> {
        info!("\n📁 正在扫描待导入的表单...");
        let forms = load_all_batch_forms(&self.config.inbox_folder).await?;
        log_forms_loaded(forms.len(), &self.config.inbox_folder);

        let mut summary = ImportSummary {
            total: forms.len(),
            ..Default::default()
        };

        for loaded in forms {
            let name = loaded.path.display().to_string();
            let draft = match loaded.form.into_draft() {
                Ok(draft) => draft,
                Err(e) => {
                    summary.skipped += 1;
                    warn!("⚠️ 跳过 {}: {}", name, e);
                    continue;
                }
            };

            let batch = self
                .store
                .add(draft, self.clock.as_ref(), self.ids.as_ref())?;
            summary.imported += 1;
            info!("✓ {} → 批次 {}", name, batch.id);

            if !self.config.keep_imported {
                if let Err(e) = tokio::fs::remove_file(&loaded.path).await {
                    warn!("删除已导入的文件失败 {}: {}", name, e);
                }
            }
        }

        log_import_summary(summary.imported, summary.skipped, summary.total);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemorySlot;
    use crate::services::{FixedClock, SequentialIdGenerator};

    fn test_app(config: Config) -> App<MemorySlot> {
        let store = BatchStore::open(MemorySlot::new()).unwrap();
        App::from_parts(
            config,
            store,
            Box::new(FixedClock::new("2024-05-01T08:00:00Z".parse().unwrap())),
            Box::new(SequentialIdGenerator::new("b")),
        )
    }

    fn form(batch_number: &str, supplier: &str, soil: &str) -> BatchForm {
        let mut form = BatchForm::new();
        form.set("batchNumber", batch_number).unwrap();
        form.set("supplier", supplier).unwrap();
        form.set("quantity", "10").unwrap();
        form.set("price", "100").unwrap();
        form.set("soil", soil).unwrap();
        form
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let mut app = test_app(Config::default());
        app.add_form(form("B-1", "Acme", "5")).unwrap();

        let output = app
            .run(
                Command::Delete {
                    id: "b1".to_string(),
                    yes: false,
                },
                &mut AutoConfirm(false),
            )
            .await
            .unwrap();
        assert_eq!(output, DELETE_CANCELLED);
        assert_eq!(app.store().len(), 1);

        let output = app
            .run(
                Command::Delete {
                    id: "b1".to_string(),
                    yes: false,
                },
                &mut AutoConfirm(true),
            )
            .await
            .unwrap();
        assert!(app.store().is_empty());
        assert!(output.starts_with("قائمة الدفعات (0)"));
    }

    #[tokio::test]
    async fn test_edit_with_assignments() {
        let mut app = test_app(Config::default());
        app.add_form(form("B-1", "Acme", "5")).unwrap();

        app.run(
            Command::Edit {
                id: "b1".to_string(),
                file: None,
                set: vec![("greening".to_string(), "8".to_string())],
            },
            &mut AutoConfirm(false),
        )
        .await
        .unwrap();

        let batch = app.store().get("b1").unwrap();
        assert_eq!(batch.metrics.greening, Some(8.0));
        assert_eq!(batch.metrics.soil, Some(5.0));
        assert!(batch.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_edit_from_file_keeps_fields_the_file_omits() {
        let mut app = test_app(Config::default());
        let mut stored = form("B-1", "Acme", "5");
        stored.set("arrivalDate", "2024-05-01").unwrap();
        stored.set("greening", "3").unwrap();
        app.add_form(stored).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edit.toml");
        std::fs::write(
            &path,
            "batchNumber = \"B-1\"\nsupplier = \"Acme\"\nquantity = 10\nprice = 100\nsoil = 6\n",
        )
        .unwrap();

        app.run(
            Command::Edit {
                id: "b1".to_string(),
                file: Some(path),
                set: Vec::new(),
            },
            &mut AutoConfirm(false),
        )
        .await
        .unwrap();

        let batch = app.store().get("b1").unwrap();
        assert_eq!(batch.metrics.soil, Some(6.0));
        assert_eq!(batch.metrics.greening, Some(3.0));
        assert_eq!(
            batch.arrival_date,
            chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
        );
    }

    #[tokio::test]
    async fn test_edit_from_file_rejects_blanked_required_field() {
        let mut app = test_app(Config::default());
        app.add_form(form("B-1", "Acme", "5")).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edit.toml");
        std::fs::write(&path, "price = \"\"\n").unwrap();

        let result = app
            .run(
                Command::Edit {
                    id: "b1".to_string(),
                    file: Some(path),
                    set: Vec::new(),
                },
                &mut AutoConfirm(false),
            )
            .await;
        assert!(result.is_err());
        assert_eq!(app.store().get("b1").unwrap().price, 100.0);
    }

    #[tokio::test]
    async fn test_edit_blank_quantity_is_rejected() {
        let mut app = test_app(Config::default());
        app.add_form(form("B-1", "Acme", "5")).unwrap();

        let result = app
            .run(
                Command::Edit {
                    id: "b1".to_string(),
                    file: None,
                    set: vec![("quantity".to_string(), String::new())],
                },
                &mut AutoConfirm(false),
            )
            .await;
        assert!(result.is_err());
        assert_eq!(app.store().get("b1").unwrap().quantity, 10.0);
    }

    #[tokio::test]
    async fn test_edit_unknown_id_is_not_found() {
        let mut app = test_app(Config::default());
        let err = app
            .run(
                Command::Edit {
                    id: "nope".to_string(),
                    file: None,
                    set: vec![("soil".to_string(), "1".to_string())],
                },
                &mut AutoConfirm(false),
            )
            .await
            .unwrap_err();
        assert!(err
            .downcast_ref::<AppError>()
            .map_or(false, AppError::is_not_found));
    }

    #[tokio::test]
    async fn test_edit_without_fields_is_rejected() {
        let mut app = test_app(Config::default());
        app.add_form(form("B-1", "Acme", "5")).unwrap();
        let result = app
            .run(
                Command::Edit {
                    id: "b1".to_string(),
                    file: None,
                    set: Vec::new(),
                },
                &mut AutoConfirm(false),
            )
            .await;
        assert!(result.is_err());
        assert_eq!(app.store().get("b1").unwrap().updated_at, None);
    }

    #[test]
    fn test_add_form_blocks_missing_required() {
        let mut app = test_app(Config::default());
        let err = app.add_form(form("B-1", "", "5")).unwrap_err();
        assert!(err.to_string().contains("supplier"));
        assert!(app.store().is_empty());
    }

    #[test]
    fn test_list_search_and_json() {
        let mut app = test_app(Config::default());
        app.add_form(form("B-1", "Acme", "5")).unwrap();
        app.add_form(form("B-2", "Beta", "25")).unwrap();

        let table = app.list(Some("ACME"), false).unwrap();
        assert!(table.starts_with("قائمة الدفعات (1)"));

        let json: serde_json::Value =
            serde_json::from_str(&app.list(None, true).unwrap()).unwrap();
        assert_eq!(json[1]["quality"]["qualityClass"], "bad");
    }

    #[tokio::test]
    async fn test_import_adds_valid_forms_and_skips_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("01.toml");
        let bad = dir.path().join("02.toml");
        std::fs::write(
            &good,
            "batchNumber = \"B-1\"\nsupplier = \"Acme\"\narrivalDate = \"2024-05-01\"\nquantity = 10\nprice = 100\nsoil = 5\n",
        )
        .unwrap();
        std::fs::write(&bad, "batchNumber = \"B-2\"\nquantity = 3\n").unwrap();

        let config = Config {
            inbox_folder: dir.path().to_string_lossy().to_string(),
            ..Config::default()
        };
        let mut app = test_app(config);
        let summary = app.import().await.unwrap();

        assert_eq!(
            summary,
            ImportSummary {
                imported: 1,
                skipped: 1,
                total: 2
            }
        );
        assert_eq!(app.store().list()[0].batch_number, "B-1");
        assert!(!good.exists());
        assert!(bad.exists());
    }
}
