//! 列表与详情渲染
//!
//! 只消费存储层和评估层的输出，不做任何计算以外的业务判断

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write as _;

use crate::models::batch::Batch;
use crate::models::metric::{MetricField, Reference};
use crate::models::numeric::format_decimal;
use crate::services::quality::{evaluate, QualityReport};
use crate::utils::logging::truncate_text;

const EMPTY_SEARCH: &str = "لا توجد نتائج للبحث";
const EMPTY_STORE: &str = "لا توجد دفعات مسجلة";
const SUPPLIER_WIDTH: usize = 24;

/// JSON 输出中的一行：批次字段 + 评估结果
#[derive(Debug, Serialize)]
pub struct BatchRow<'a> {
    #[serde(flatten)]
    pub batch: &'a Batch,
    pub quality: QualityReport,
}

impl<'a> From<&'a Batch> for BatchRow<'a> {
    fn from(batch: &'a Batch) -> Self {
        Self {
            batch,
            quality: evaluate(batch),
        }
    }
}

/// en-US 短日期（M/D/YYYY）
pub fn format_arrival_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// 保留一位小数的百分比
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// 扣款汇总框
pub fn render_summary(report: &QualityReport) -> String {
    format!(
        "ملخص الخصومات\n  إجمالي نسبة العيوب: {}\n  نسبة الخصم من السعر: {}",
        format_percent(report.total_defects),
        format_percent(report.price_deduction)
    )
}

/// 批次列表
///
/// 列表为空时，根据是否有搜索词给出不同提示
pub fn render_batch_table(batches: &[&Batch], query: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "قائمة الدفعات ({})", batches.len());

    if batches.is_empty() {
        let searching = query.map_or(false, |q| !q.is_empty());
        out.push_str(if searching { EMPTY_SEARCH } else { EMPTY_STORE });
        return out;
    }

    let _ = writeln!(
        out,
        "{:<14} | {:<24} | {:<10} | {:<10} | {:<6} | المعرف",
        "رقم الدفعة", "المورد", "التاريخ", "الكمية", "الجودة"
    );
    for batch in batches {
        let report = evaluate(*batch);
        let _ = writeln!(
            out,
            "{:<14} | {:<24} | {:<10} | {:<10} | {:<6} | {}",
            batch.batch_number,
            truncate_text(&batch.supplier, SUPPLIER_WIDTH),
            format_arrival_date(batch.arrival_date),
            format!("{} طن", format_decimal(batch.quantity)),
            report.quality_class.label(),
            batch.id
        );
    }
    out.trim_end().to_string()
}

fn reference_badge(reference: Option<Reference>) -> String {
    match reference {
        Some(Reference::Preferred(text)) => format!(" [المفضل {}]", text),
        Some(Reference::Allowed(text)) => format!(" [المسموح {}]", text),
        None => String::new(),
    }
}

/// 单个批次的详情：基本字段、十项指标与汇总
pub fn render_batch_detail(batch: &Batch) -> String {
    let report = evaluate(batch);
    let mut out = String::new();

    let _ = writeln!(out, "رقم الدفعة: {}", batch.batch_number);
    let _ = writeln!(out, "المورد: {}", batch.supplier);
    let _ = writeln!(out, "تاريخ الاستلام: {}", format_arrival_date(batch.arrival_date));
    let _ = writeln!(out, "الكمية: {} طن", format_decimal(batch.quantity));
    let _ = writeln!(out, "السعر (للطن): {}", format_decimal(batch.price));
    let _ = writeln!(out, "الجودة: {}", report.quality_class.label());
    let _ = writeln!(out, "المعرف: {}", batch.id);
    let _ = writeln!(out, "معايير فحص الجودة");

    for field in MetricField::ALL {
        let value = batch
            .metrics
            .get(field)
            .map(format_decimal)
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "  {}: {} {}{}",
            field.label(),
            value,
            field.unit(),
            reference_badge(field.reference())
        );
    }

    out.push_str(&render_summary(&report));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::batch::BatchDraft;
    use crate::services::quality::QualityClass;

    fn batch(id: &str, soil: f64) -> Batch {
        BatchDraft::new(
            "B-1",
            "Acme",
            NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
            12.5,
            100.0,
        )
        .with_metric(MetricField::Soil, soil)
        .into_batch(id.to_string(), "2024-03-07T00:00:00Z".parse().unwrap())
    }

    #[test]
    fn test_format_arrival_date_en_us() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(format_arrival_date(date), "3/7/2024");
    }

    #[test]
    fn test_summary_one_decimal() {
        let report = QualityReport {
            total_defects: 150.0,
            price_deduction: 100.0,
            quality_class: QualityClass::Bad,
        };
        let summary = render_summary(&report);
        assert!(summary.contains("150.0%"));
        assert!(summary.contains("100.0%"));
    }

    #[test]
    fn test_empty_states() {
        assert!(render_batch_table(&[], None).ends_with(EMPTY_STORE));
        assert!(render_batch_table(&[], Some("")).ends_with(EMPTY_STORE));
        assert!(render_batch_table(&[], Some("acme")).ends_with(EMPTY_SEARCH));
    }

    #[test]
    fn test_table_rows_carry_quality_badge() {
        let good = batch("1", 4.0);
        let bad = batch("2", 40.0);
        let table = render_batch_table(&[&good, &bad], None);

        assert!(table.starts_with("قائمة الدفعات (2)"));
        let rows: Vec<_> = table.lines().skip(2).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains(QualityClass::Good.label()));
        assert!(rows[0].contains("12.5 طن"));
        assert!(rows[1].contains(QualityClass::Bad.label()));
        assert!(rows[1].ends_with("2"));
    }

    #[test]
    fn test_detail_lists_every_metric() {
        let detail = render_batch_detail(&batch("1", 4.0));
        for field in MetricField::ALL {
            assert!(detail.contains(field.label()), "{}", field);
        }
        assert!(detail.contains("[المفضل > 19%]"));
        assert!(detail.contains("4.0%"));
    }

    #[test]
    fn test_json_row_flattens_batch() {
        let b = batch("1", 15.0);
        let json = serde_json::to_value(BatchRow::from(&b)).unwrap();
        assert_eq!(json["batchNumber"], "B-1");
        assert_eq!(json["soil"], 15.0);
        assert_eq!(json["quality"]["qualityClass"], "medium");
        assert_eq!(json["quality"]["priceDeduction"], 15.0);
    }
}
