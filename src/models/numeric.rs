//! 数值解析工具
//!
//! 表单输入与旧版存储中的数值既可能是数字，也可能是文本，
//! 这里统一按浏览器 `parseFloat` 的方式取前导小数

use regex::Regex;
use serde::de::{self, Deserializer, Visitor};
use std::fmt;
use std::sync::OnceLock;

static DECIMAL_PREFIX: OnceLock<Option<Regex>> = OnceLock::new();

fn decimal_prefix() -> Option<&'static Regex> {
    DECIMAL_PREFIX
        .get_or_init(|| Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").ok())
        .as_ref()
}

/// 解析文本中的前导小数
///
/// - 跳过前导空白
/// - 取最长的前导小数字面量（`"12.5%"` → 12.5）
/// - 没有前导数字或结果非有限值时返回 `None`
pub fn parse_decimal(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let found = decimal_prefix()?.find(trimmed)?;
    found
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// 把小数格式化为表单文本（10.0 → "10"，2.5 → "2.5"）
pub fn format_decimal(value: f64) -> String {
    format!("{}", value)
}

struct DecimalVisitor;

impl<'de> Visitor<'de> for DecimalVisitor {
    type Value = Option<f64>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number, a numeric string, or null")
    }

    fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Some(value).filter(|v| v.is_finite()))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Some(value as f64))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Some(value as f64))
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(parse_decimal(value))
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DecimalVisitor)
    }
}

/// 反序列化可选小数：数字、数字文本、空文本与 null 都接受
pub fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(DecimalVisitor)
}

/// 反序列化必填小数：无法解析的值按 0 处理
pub fn deserialize_decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_optional_decimal(deserializer)?.unwrap_or(0.0))
}

struct TextVisitor;

impl<'de> Visitor<'de> for TextVisitor {
    type Value = String;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string or a number")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(value.to_string())
    }

    fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(format_decimal(value))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(value.to_string())
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(value.to_string())
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(String::new())
    }
}

/// 把表单字段反序列化为文本：TOML 草稿里写 `quantity = 10` 或 `quantity = "10"` 都行
pub fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(TextVisitor)
}
