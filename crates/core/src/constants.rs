//! Constants used throughout the HIS core crate.
//!
//! Preset palettes are the "click to add" suggestions shown next to each tag field. They are
//! suggestions only; free-text values are accepted alongside them.

/// Cigarettes in one pack, the unit of the pack-years calculation.
pub const CIGARETTES_PER_PACK: f64 = 20.0;

/// Recording clinician used when no name is configured.
pub const DEFAULT_RECORDING_CLINICIAN: &str = "当前医生";

/// Placeholder shown in record summaries for empty values.
pub const NOT_RECORDED: &str = "未记录";

/// Environment variable naming the recording clinician.
pub const CLINICIAN_ENV_VAR: &str = "HIS_CLINICIAN";

/// Environment variable naming a census YAML file.
pub const CENSUS_PATH_ENV_VAR: &str = "HIS_CENSUS_PATH";

/// Common occupational exposures.
pub const OCCUPATIONAL_EXPOSURES: &[&str] = &[
    "粉尘", "化学品", "噪音", "辐射", "高温", "低温", "重金属", "有机溶剂",
];

/// Common dietary restrictions.
pub const DIET_RESTRICTIONS: &[&str] = &["低盐", "低脂", "低糖", "素食", "无麸质", "无乳糖", "无坚果"];

/// Common exercise types.
pub const EXERCISE_TYPES: &[&str] = &[
    "步行", "跑步", "游泳", "骑车", "健身", "瑜伽", "太极", "球类运动",
];

/// Common sleep complaints.
pub const SLEEP_ISSUES: &[&str] = &[
    "入睡困难",
    "早醒",
    "睡眠中断",
    "打鼾",
    "睡眠呼吸暂停",
    "白天嗜睡",
    "噩梦",
];

/// Common tobacco products.
pub const TOBACCO_TYPES: &[&str] = &["卷烟", "雪茄", "电子烟", "水烟", "烟斗"];

/// Common alcoholic drinks.
pub const ALCOHOL_TYPES: &[&str] = &["啤酒", "红酒", "白酒", "洋酒"];

/// Education levels offered on the social history form.
pub const EDUCATION_LEVELS: &[&str] = &[
    "小学", "初中", "高中", "大专", "本科", "研究生", "博士", "其他",
];

/// Diet types offered on the social history form.
pub const DIET_TYPES: &[&str] = &["普通饮食", "素食", "低盐饮食", "低脂饮食", "低糖饮食", "其他"];

/// Departments offered by the ward list department filter.
pub const WARD_DEPARTMENTS: &[&str] = &["内科", "外科", "儿科", "妇科"];
