//! 质量评估 - 业务能力层
//!
//! 纯函数：只依赖输入的十项指标，不持有状态
//!
//! - 缺陷总和 = 七项缺陷指标之和（不封顶）
//! - 扣款比例 = min(缺陷总和, 100)
//! - 质量等级：> 20 差，(10, 20] 中，≤ 10 好
//!
//! 干物质、糖分、油炸缺陷不参与计算

use serde::Serialize;

use crate::models::batch::{Batch, BatchDraft, Metrics};
use crate::models::form::BatchForm;
use crate::models::metric::MetricField;

/// 缺陷总和超过该值为"中"
pub const MEDIUM_THRESHOLD: f64 = 10.0;
/// 缺陷总和超过该值为"差"
pub const BAD_THRESHOLD: f64 = 20.0;
/// 扣款比例上限
pub const MAX_DEDUCTION: f64 = 100.0;

/// 质量等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityClass {
    Good,
    Medium,
    Bad,
}

impl QualityClass {
    /// 徽章标签
    pub fn label(self) -> &'static str {
        match self {
            QualityClass::Good => "جيد",
            QualityClass::Medium => "متوسط",
            QualityClass::Bad => "رديء",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QualityClass::Good => "good",
            QualityClass::Medium => "medium",
            QualityClass::Bad => "bad",
        }
    }
}

impl std::fmt::Display for QualityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 可以提供十项指标的输入：已保存的批次、草稿或正在编辑的表单
pub trait MetricSource {
    fn metrics(&self) -> Metrics;
}

impl MetricSource for Metrics {
    fn metrics(&self) -> Metrics {
        *self
    }
}

impl MetricSource for Batch {
    fn metrics(&self) -> Metrics {
        self.metrics
    }
}

impl MetricSource for BatchDraft {
    fn metrics(&self) -> Metrics {
        self.metrics
    }
}

impl MetricSource for BatchForm {
    fn metrics(&self) -> Metrics {
        BatchForm::metrics(self)
    }
}

/// 缺陷总和
pub fn total_defects(source: &impl MetricSource) -> f64 {
    let metrics = source.metrics();
    MetricField::DEFECTS
        .into_iter()
        .map(|field| metrics.value_or_zero(field))
        .sum()
}

/// 价格扣款比例（%）
pub fn price_deduction(source: &impl MetricSource) -> f64 {
    total_defects(source).min(MAX_DEDUCTION)
}

/// 质量等级
pub fn quality_class(source: &impl MetricSource) -> QualityClass {
    classify(total_defects(source))
}

fn classify(total: f64) -> QualityClass {
    if total > BAD_THRESHOLD {
        QualityClass::Bad
    } else if total > MEDIUM_THRESHOLD {
        QualityClass::Medium
    } else {
        QualityClass::Good
    }
}

/// 一次性计算的评估结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    pub total_defects: f64,
    pub price_deduction: f64,
    pub quality_class: QualityClass,
}

pub fn evaluate(source: &impl MetricSource) -> QualityReport {
    let total = total_defects(source);
    QualityReport {
        total_defects: total,
        price_deduction: total.min(MAX_DEDUCTION),
        quality_class: classify(total),
    }
}
