use phf::phf_map;
use serde::{Deserialize, Serialize};

/// 质量指标枚举
///
/// 十项指标中，七项为缺陷指标（参与扣款与分级），
/// 干物质、糖分、油炸缺陷只做参考展示
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum MetricField {
    /// 干物质（硬度）
    DryMatter,
    /// 糖分
    Sugar,
    /// 油炸后切片缺陷
    FryDefects,
    /// 泥土
    Soil,
    /// 绿化
    Greening,
    /// 病害
    Disease,
    /// 脱皮
    Peeling,
    /// 机械损伤
    Mechanical,
    /// 萎蔫
    Wilting,
    /// 规格缺陷
    SizeDefects,
}

/// 指标类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// 缺陷指标，计入缺陷总和
    Defect,
    /// 参考指标，只展示参考范围
    Informational,
}

/// 参考范围徽章
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    /// 推荐值（绿色徽章）
    Preferred(&'static str),
    /// 允许值（蓝色徽章）
    Allowed(&'static str),
}

impl Reference {
    pub fn text(self) -> &'static str {
        match self {
            Reference::Preferred(text) | Reference::Allowed(text) => text,
        }
    }
}

static METRIC_BY_ID: phf::Map<&'static str, MetricField> = phf_map! {
    "dryMatter" => MetricField::DryMatter,
    "sugar" => MetricField::Sugar,
    "fryDefects" => MetricField::FryDefects,
    "soil" => MetricField::Soil,
    "greening" => MetricField::Greening,
    "disease" => MetricField::Disease,
    "peeling" => MetricField::Peeling,
    "mechanical" => MetricField::Mechanical,
    "wilting" => MetricField::Wilting,
    "sizeDefects" => MetricField::SizeDefects,
};

impl MetricField {
    /// 表单展示顺序
    pub const ALL: [MetricField; 10] = [
        MetricField::DryMatter,
        MetricField::Sugar,
        MetricField::FryDefects,
        MetricField::Soil,
        MetricField::Greening,
        MetricField::Disease,
        MetricField::Peeling,
        MetricField::Mechanical,
        MetricField::Wilting,
        MetricField::SizeDefects,
    ];

    /// 参与缺陷总和的七项指标
    pub const DEFECTS: [MetricField; 7] = [
        MetricField::Soil,
        MetricField::Greening,
        MetricField::Disease,
        MetricField::Peeling,
        MetricField::Mechanical,
        MetricField::Wilting,
        MetricField::SizeDefects,
    ];

    /// 存储与表单中使用的字段名
    pub fn id(self) -> &'static str {
        match self {
            MetricField::DryMatter => "dryMatter",
            MetricField::Sugar => "sugar",
            MetricField::FryDefects => "fryDefects",
            MetricField::Soil => "soil",
            MetricField::Greening => "greening",
            MetricField::Disease => "disease",
            MetricField::Peeling => "peeling",
            MetricField::Mechanical => "mechanical",
            MetricField::Wilting => "wilting",
            MetricField::SizeDefects => "sizeDefects",
        }
    }

    /// 界面标签
    pub fn label(self) -> &'static str {
        match self {
            MetricField::DryMatter => "المادة الجافة (الصلابة)",
            MetricField::Sugar => "السكر",
            MetricField::FryDefects => "عيوب الشريحة بعد القلي",
            MetricField::Soil => "الاتربة",
            MetricField::Greening => "الاخضرار",
            MetricField::Disease => "الاصابات المرضية",
            MetricField::Peeling => "التقشير",
            MetricField::Mechanical => "الاصابات الميكانيكية",
            MetricField::Wilting => "الذبول",
            MetricField::SizeDefects => "عيوب الاحجام",
        }
    }

    /// 计量单位
    pub fn unit(self) -> &'static str {
        match self {
            MetricField::Sugar => "ملغ/ديسيليتر",
            _ => "%",
        }
    }

    /// 参考范围
    pub fn reference(self) -> Option<Reference> {
        match self {
            MetricField::DryMatter => Some(Reference::Preferred("> 19%")),
            MetricField::Sugar => Some(Reference::Allowed("≤ 10")),
            MetricField::FryDefects => Some(Reference::Allowed("< 15%")),
            _ => None,
        }
    }

    pub fn kind(self) -> MetricKind {
        match self {
            MetricField::DryMatter | MetricField::Sugar | MetricField::FryDefects => {
                MetricKind::Informational
            }
            _ => MetricKind::Defect,
        }
    }

    pub fn is_defect(self) -> bool {
        self.kind() == MetricKind::Defect
    }

    /// 按字段名查找指标（精确匹配）
    pub fn from_id(id: &str) -> Option<Self> {
        METRIC_BY_ID.get(id).copied()
    }
}

impl std::fmt::Display for MetricField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id_matches_every_field() {
        for field in MetricField::ALL {
            assert_eq!(MetricField::from_id(field.id()), Some(field));
        }
        assert_eq!(MetricField::from_id("Soil"), None);
        assert_eq!(MetricField::from_id("quantity"), None);
    }

    #[test]
    fn test_defect_list_matches_kind() {
        let defects: Vec<_> = MetricField::ALL
            .into_iter()
            .filter(|field| field.is_defect())
            .collect();
        assert_eq!(defects, MetricField::DEFECTS.to_vec());
    }

    #[test]
    fn test_informational_metrics_carry_references() {
        for field in MetricField::ALL {
            assert_eq!(
                field.reference().is_some(),
                field.kind() == MetricKind::Informational,
                "{}",
                field
            );
        }
        assert_eq!(MetricField::Sugar.reference(), Some(Reference::Allowed("≤ 10")));
        assert_eq!(MetricField::DryMatter.reference().map(Reference::text), Some("> 19%"));
    }

    #[test]
    fn test_serde_uses_field_ids() {
        let json = serde_json::to_string(&MetricField::SizeDefects).unwrap();
        assert_eq!(json, "\"sizeDefects\"");
    }
}
