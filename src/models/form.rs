//! 批次表单（表现层边界）
//!
//! 表单里的每个字段都是文本，与浏览器表单状态一致；
//! 必填字段检查只在这里做，存储层和评估层不做校验

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::models::batch::{Batch, BatchDraft, BatchPatch, Metrics};
use crate::models::metric::MetricField;
use crate::models::numeric::{self, format_decimal, parse_decimal};

/// 必填字段（按表单顺序）
pub const REQUIRED_FIELDS: [&str; 5] = ["batchNumber", "supplier", "arrivalDate", "quantity", "price"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// 新建/编辑批次时的表单状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BatchForm {
    #[serde(default, deserialize_with = "numeric::deserialize_text")]
    pub batch_number: String,
    #[serde(default, deserialize_with = "numeric::deserialize_text")]
    pub supplier: String,
    #[serde(default = "today_text", deserialize_with = "numeric::deserialize_text")]
    pub arrival_date: String,
    #[serde(default, deserialize_with = "numeric::deserialize_text")]
    pub quantity: String,
    #[serde(default, deserialize_with = "numeric::deserialize_text")]
    pub price: String,
    #[serde(default, deserialize_with = "numeric::deserialize_text")]
    pub dry_matter: String,
    #[serde(default, deserialize_with = "numeric::deserialize_text")]
    pub sugar: String,
    #[serde(default, deserialize_with = "numeric::deserialize_text")]
    pub fry_defects: String,
    #[serde(default, deserialize_with = "numeric::deserialize_text")]
    pub soil: String,
    #[serde(default, deserialize_with = "numeric::deserialize_text")]
    pub greening: String,
    #[serde(default, deserialize_with = "numeric::deserialize_text")]
    pub disease: String,
    #[serde(default, deserialize_with = "numeric::deserialize_text")]
    pub peeling: String,
    #[serde(default, deserialize_with = "numeric::deserialize_text")]
    pub mechanical: String,
    #[serde(default, deserialize_with = "numeric::deserialize_text")]
    pub wilting: String,
    #[serde(default, deserialize_with = "numeric::deserialize_text")]
    pub size_defects: String,
}

fn today_text() -> String {
    chrono::Local::now().date_naive().format(DATE_FORMAT).to_string()
}

impl Default for BatchForm {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchForm {
    /// 空表单，到货日期默认为今天
    pub fn new() -> Self {
        Self {
            batch_number: String::new(),
            supplier: String::new(),
            arrival_date: today_text(),
            quantity: String::new(),
            price: String::new(),
            dry_matter: String::new(),
            sugar: String::new(),
            fry_defects: String::new(),
            soil: String::new(),
            greening: String::new(),
            disease: String::new(),
            peeling: String::new(),
            mechanical: String::new(),
            wilting: String::new(),
            size_defects: String::new(),
        }
    }

    /// 用已有批次预填表单（编辑模式）
    pub fn from_batch(batch: &Batch) -> Self {
        let mut form = Self {
            batch_number: batch.batch_number.clone(),
            supplier: batch.supplier.clone(),
            arrival_date: batch.arrival_date.format(DATE_FORMAT).to_string(),
            quantity: format_decimal(batch.quantity),
            price: format_decimal(batch.price),
            ..Self::new()
        };
        for field in MetricField::ALL {
            *form.metric_text_mut(field) = batch
                .metrics
                .get(field)
                .map(format_decimal)
                .unwrap_or_default();
        }
        form
    }

    fn metric_text(&self, field: MetricField) -> &str {
        match field {
            MetricField::DryMatter => &self.dry_matter,
            MetricField::Sugar => &self.sugar,
            MetricField::FryDefects => &self.fry_defects,
            MetricField::Soil => &self.soil,
            MetricField::Greening => &self.greening,
            MetricField::Disease => &self.disease,
            MetricField::Peeling => &self.peeling,
            MetricField::Mechanical => &self.mechanical,
            MetricField::Wilting => &self.wilting,
            MetricField::SizeDefects => &self.size_defects,
        }
    }

    fn metric_text_mut(&mut self, field: MetricField) -> &mut String {
        match field {
            MetricField::DryMatter => &mut self.dry_matter,
            MetricField::Sugar => &mut self.sugar,
            MetricField::FryDefects => &mut self.fry_defects,
            MetricField::Soil => &mut self.soil,
            MetricField::Greening => &mut self.greening,
            MetricField::Disease => &mut self.disease,
            MetricField::Peeling => &mut self.peeling,
            MetricField::Mechanical => &mut self.mechanical,
            MetricField::Wilting => &mut self.wilting,
            MetricField::SizeDefects => &mut self.size_defects,
        }
    }

    /// 读取字段文本
    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            "batchNumber" => Some(&self.batch_number),
            "supplier" => Some(&self.supplier),
            "arrivalDate" => Some(&self.arrival_date),
            "quantity" => Some(&self.quantity),
            "price" => Some(&self.price),
            other => MetricField::from_id(other).map(|field| self.metric_text(field)),
        }
    }

    /// 修改一个字段（对应输入框的 onChange）
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let slot = match name {
            "batchNumber" => &mut self.batch_number,
            "supplier" => &mut self.supplier,
            "arrivalDate" => &mut self.arrival_date,
            "quantity" => &mut self.quantity,
            "price" => &mut self.price,
            other => {
                let field = MetricField::from_id(other).ok_or_else(|| FormError::UnknownField {
                    field: other.to_string(),
                })?;
                self.metric_text_mut(field)
            }
        };
        *slot = value.into();
        Ok(())
    }

    /// 当前表单的指标值（用于编辑时的实时汇总）
    pub fn metrics(&self) -> Metrics {
        let mut metrics = Metrics::default();
        for field in MetricField::ALL {
            metrics.set(field, parse_decimal(self.metric_text(field)));
        }
        metrics
    }

    /// 为空的必填字段
    pub fn missing_required(&self) -> Vec<&'static str> {
        REQUIRED_FIELDS
            .into_iter()
            .filter(|name| self.get(name).map_or(true, |text| text.trim().is_empty()))
            .collect()
    }

    fn check_required(&self) -> Result<(), FormError> {
        let fields = self.missing_required();
        if fields.is_empty() {
            Ok(())
        } else {
            Err(FormError::MissingRequired { fields })
        }
    }

    /// 提交新建表单
    pub fn into_draft(self) -> Result<BatchDraft, FormError> {
        self.check_required()?;
        let metrics = self.metrics();
        Ok(BatchDraft {
            arrival_date: parse_arrival_date(&self.arrival_date)?,
            quantity: parse_decimal(&self.quantity).unwrap_or(0.0),
            price: parse_decimal(&self.price).unwrap_or(0.0),
            batch_number: self.batch_number,
            supplier: self.supplier,
            metrics,
        })
    }

    /// 提交编辑表单：所有字段都写入补丁，空指标会被清空
    pub fn into_patch(self) -> Result<BatchPatch, FormError> {
        self.check_required()?;
        let mut patch = BatchPatch::new()
            .arrival_date(parse_arrival_date(&self.arrival_date)?)
            .quantity(parse_decimal(&self.quantity).unwrap_or(0.0))
            .price(parse_decimal(&self.price).unwrap_or(0.0));
        for field in MetricField::ALL {
            patch = patch.metric(field, parse_decimal(self.metric_text(field)));
        }
        Ok(patch.batch_number(self.batch_number).supplier(self.supplier))
    }
}

/// 必填文本不能为空白
pub(crate) fn require_text(name: &'static str, value: &str) -> Result<String, FormError> {
    if value.trim().is_empty() {
        Err(FormError::MissingRequired { fields: vec![name] })
    } else {
        Ok(value.to_string())
    }
}

/// 解析到货日期（YYYY-MM-DD）
pub(crate) fn parse_arrival_date(value: &str) -> Result<NaiveDate, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::MissingRequired {
            fields: vec!["arrivalDate"],
        });
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| FormError::InvalidDate {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> BatchForm {
        let mut form = BatchForm::new();
        form.set("batchNumber", "B-1").unwrap();
        form.set("supplier", "Acme").unwrap();
        form.set("arrivalDate", "2024-05-01").unwrap();
        form.set("quantity", "10").unwrap();
        form.set("price", "100").unwrap();
        form.set("soil", "5").unwrap();
        form.set("greening", "3").unwrap();
        form
    }

    #[test]
    fn test_new_form_defaults_arrival_date_to_today() {
        let form = BatchForm::new();
        assert_eq!(form.arrival_date, today_text());
        assert_eq!(
            form.missing_required(),
            vec!["batchNumber", "supplier", "quantity", "price"]
        );
    }

    #[test]
    fn test_into_draft_blocks_on_blank_required() {
        let mut form = filled_form();
        form.set("supplier", "   ").unwrap();
        assert_eq!(
            form.into_draft(),
            Err(FormError::MissingRequired {
                fields: vec!["supplier"]
            })
        );
    }

    #[test]
    fn test_into_draft_coerces_numbers() {
        let mut form = filled_form();
        form.set("price", "cheap").unwrap();
        form.set("sugar", "x").unwrap();
        let draft = form.into_draft().unwrap();

        assert_eq!(draft.batch_number, "B-1");
        assert_eq!(draft.quantity, 10.0);
        assert_eq!(draft.price, 0.0);
        assert_eq!(draft.metrics.soil, Some(5.0));
        assert_eq!(draft.metrics.sugar, None);
        assert_eq!(draft.metrics.wilting, None);
    }

    #[test]
    fn test_invalid_date_is_reported() {
        let mut form = filled_form();
        form.set("arrivalDate", "01/05/2024").unwrap();
        assert_eq!(
            form.into_draft(),
            Err(FormError::InvalidDate {
                value: "01/05/2024".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut form = BatchForm::new();
        assert!(matches!(
            form.set("colour", "red"),
            Err(FormError::UnknownField { .. })
        ));
        assert_eq!(form.get("colour"), None);
    }

    #[test]
    fn test_edit_form_round_trip() {
        let batch = filled_form()
            .into_draft()
            .unwrap()
            .into_batch("7".to_string(), "2024-05-01T00:00:00Z".parse().unwrap());
        let form = BatchForm::from_batch(&batch);
        assert_eq!(form.quantity, "10");
        assert_eq!(form.soil, "5");
        assert_eq!(form.disease, "");

        let patch = form.into_patch().unwrap();
        let mut edited = batch.clone();
        patch.apply_to(&mut edited);
        assert_eq!(edited, batch);
    }

    #[test]
    fn test_live_metrics() {
        let mut form = filled_form();
        form.set("disease", "2").unwrap();
        let metrics = form.metrics();
        assert_eq!(metrics.soil, Some(5.0));
        assert_eq!(metrics.disease, Some(2.0));
        assert_eq!(metrics.peeling, None);
    }

    #[test]
    fn test_form_from_toml_accepts_numbers() {
        let form: BatchForm = toml::from_str(
            r#"
            batchNumber = "B-2"
            supplier = "Acme"
            arrivalDate = "2024-05-02"
            quantity = 12
            price = 95.5
            soil = 4
            "#,
        )
        .unwrap();
        assert_eq!(form.quantity, "12");
        assert_eq!(form.price, "95.5");
        assert_eq!(form.soil, "4");
        assert_eq!(form.wilting, "");
    }

    #[test]
    fn test_form_from_toml_rejects_unknown_keys() {
        let parsed = toml::from_str::<BatchForm>("batchNumber = \"B-3\"\nsoill = 4\n");
        assert!(parsed.is_err());
    }
}
