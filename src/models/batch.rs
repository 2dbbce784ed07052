use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::FormError;
use crate::models::form::{parse_arrival_date, require_text};
use crate::models::metric::MetricField;
use crate::models::numeric::{self, parse_decimal};

/// 十项质量指标
///
/// 每项都是可选的百分比（糖分除外），缺失时在计算中按 0 处理
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    #[serde(default, deserialize_with = "numeric::deserialize_optional_decimal", skip_serializing_if = "Option::is_none")]
    pub dry_matter: Option<f64>,
    #[serde(default, deserialize_with = "numeric::deserialize_optional_decimal", skip_serializing_if = "Option::is_none")]
    pub sugar: Option<f64>,
    #[serde(default, deserialize_with = "numeric::deserialize_optional_decimal", skip_serializing_if = "Option::is_none")]
    pub fry_defects: Option<f64>,
    #[serde(default, deserialize_with = "numeric::deserialize_optional_decimal", skip_serializing_if = "Option::is_none")]
    pub soil: Option<f64>,
    #[serde(default, deserialize_with = "numeric::deserialize_optional_decimal", skip_serializing_if = "Option::is_none")]
    pub greening: Option<f64>,
    #[serde(default, deserialize_with = "numeric::deserialize_optional_decimal", skip_serializing_if = "Option::is_none")]
    pub disease: Option<f64>,
    #[serde(default, deserialize_with = "numeric::deserialize_optional_decimal", skip_serializing_if = "Option::is_none")]
    pub peeling: Option<f64>,
    #[serde(default, deserialize_with = "numeric::deserialize_optional_decimal", skip_serializing_if = "Option::is_none")]
    pub mechanical: Option<f64>,
    #[serde(default, deserialize_with = "numeric::deserialize_optional_decimal", skip_serializing_if = "Option::is_none")]
    pub wilting: Option<f64>,
    #[serde(default, deserialize_with = "numeric::deserialize_optional_decimal", skip_serializing_if = "Option::is_none")]
    pub size_defects: Option<f64>,
}

impl Metrics {
    pub fn get(&self, field: MetricField) -> Option<f64> {
        match field {
            MetricField::DryMatter => self.dry_matter,
            MetricField::Sugar => self.sugar,
            MetricField::FryDefects => self.fry_defects,
            MetricField::Soil => self.soil,
            MetricField::Greening => self.greening,
            MetricField::Disease => self.disease,
            MetricField::Peeling => self.peeling,
            MetricField::Mechanical => self.mechanical,
            MetricField::Wilting => self.wilting,
            MetricField::SizeDefects => self.size_defects,
        }
    }

    pub fn set(&mut self, field: MetricField, value: Option<f64>) {
        let slot = match field {
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
        };
        *slot = value;
    }

    /// 计算用取值：缺失或非有限值按 0
    pub fn value_or_zero(&self, field: MetricField) -> f64 {
        self.get(field).filter(|v| v.is_finite()).unwrap_or(0.0)
    }

    pub fn with(mut self, field: MetricField, value: f64) -> Self {
        self.set(field, Some(value));
        self
    }
}

/// 一批土豆的检验记录
///
/// 存储格式中的字段名为 camelCase，与浏览器版本一致
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    /// 创建时分配，不可变
    pub id: String,
    /// 创建时分配，不可变
    pub created_at: DateTime<Utc>,
    /// 每次更新时刷新
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// 批次号（不保证唯一）
    pub batch_number: String,
    /// 供应商
    pub supplier: String,
    /// 到货日期
    pub arrival_date: NaiveDate,
    /// 数量（吨）
    #[serde(deserialize_with = "numeric::deserialize_decimal")]
    pub quantity: f64,
    /// 单价（每吨）
    #[serde(deserialize_with = "numeric::deserialize_decimal")]
    pub price: f64,
    #[serde(flatten)]
    pub metrics: Metrics,
}

/// 新批次的调用方字段
///
/// 必填字段在类型上就必须给出，`id`/`createdAt` 由存储分配
#[derive(Debug, Clone, PartialEq)]
pub struct BatchDraft {
    pub batch_number: String,
    pub supplier: String,
    pub arrival_date: NaiveDate,
    pub quantity: f64,
    pub price: f64,
    pub metrics: Metrics,
}

impl BatchDraft {
    pub fn new(
        batch_number: impl Into<String>,
        supplier: impl Into<String>,
        arrival_date: NaiveDate,
        quantity: f64,
        price: f64,
    ) -> Self {
        Self {
            batch_number: batch_number.into(),
            supplier: supplier.into(),
            arrival_date,
            quantity,
            price,
            metrics: Metrics::default(),
        }
    }

    pub fn with_metric(mut self, field: MetricField, value: f64) -> Self {
        self.metrics.set(field, Some(value));
        self
    }

    pub(crate) fn into_batch(self, id: String, created_at: DateTime<Utc>) -> Batch {
        Batch {
            id,
            created_at,
            updated_at: None,
            batch_number: self.batch_number,
            supplier: self.supplier,
            arrival_date: self.arrival_date,
            quantity: self.quantity,
            price: self.price,
            metrics: self.metrics,
        }
    }
}

/// 批次更新补丁
///
/// 只列出允许修改的字段；未设置的字段保持原值。
/// 指标的 `Some(None)` 表示清空该指标
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchPatch {
    pub batch_number: Option<String>,
    pub supplier: Option<String>,
    pub arrival_date: Option<NaiveDate>,
    pub quantity: Option<f64>,
    pub price: Option<f64>,
    pub metrics: BTreeMap<MetricField, Option<f64>>,
}

impl BatchPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batch_number(mut self, value: impl Into<String>) -> Self {
        self.batch_number = Some(value.into());
        self
    }

    pub fn supplier(mut self, value: impl Into<String>) -> Self {
        self.supplier = Some(value.into());
        self
    }

    pub fn arrival_date(mut self, value: NaiveDate) -> Self {
        self.arrival_date = Some(value);
        self
    }

    pub fn quantity(mut self, value: f64) -> Self {
        self.quantity = Some(value);
        self
    }

    pub fn price(mut self, value: f64) -> Self {
        self.price = Some(value);
        self
    }

    pub fn metric(mut self, field: MetricField, value: Option<f64>) -> Self {
        self.metrics.insert(field, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.batch_number.is_none()
            && self.supplier.is_none()
            && self.arrival_date.is_none()
            && self.quantity.is_none()
            && self.price.is_none()
            && self.metrics.is_empty()
    }

    /// 按字段名设置一个值（值为表单文本）
    ///
    /// 字段名必须属于批次结构；系统字段只读
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        match name {
            "id" | "createdAt" | "updatedAt" => {
                return Err(FormError::ReadOnlyField {
                    field: name.to_string(),
                })
            }
            "batchNumber" => self.batch_number = Some(require_text("batchNumber", value)?),
            "supplier" => self.supplier = Some(require_text("supplier", value)?),
            "arrivalDate" => self.arrival_date = Some(parse_arrival_date(value)?),
            "quantity" => self.quantity = Some(required_decimal("quantity", value)?),
            "price" => self.price = Some(required_decimal("price", value)?),
            other => {
                let field = MetricField::from_id(other).ok_or_else(|| FormError::UnknownField {
                    field: other.to_string(),
                })?;
                self.metrics.insert(field, parse_decimal(value));
            }
        }
        Ok(())
    }

    /// 把补丁合并到批次上（不改动 id/createdAt/updatedAt）
    pub fn apply_to(&self, batch: &mut Batch) {
        if let Some(value) = &self.batch_number {
            batch.batch_number = value.clone();
        }
        if let Some(value) = &self.supplier {
            batch.supplier = value.clone();
        }
        if let Some(value) = self.arrival_date {
            batch.arrival_date = value;
        }
        if let Some(value) = self.quantity {
            batch.quantity = value;
        }
        if let Some(value) = self.price {
            batch.price = value;
        }
        for (field, value) in &self.metrics {
            batch.metrics.set(*field, *value);
        }
    }
}

/// 必填数值：空白拒绝，非数字文本按 0
fn required_decimal(name: &'static str, value: &str) -> Result<f64, FormError> {
    let text = require_text(name, value)?;
    Ok(parse_decimal(&text).unwrap_or(0.0))
}
