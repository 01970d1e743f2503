use crate::core::metrics::{ClassificationMetrics, RegressionMetrics};
use crate::domain::model::CatchTable;
use chrono::NaiveDate;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;

/// 報表中每日評分的鍵，例如 `10-10-2022`
pub const REPORT_DATE_FORMAT: &str = "%d-%m-%Y";
/// 報表 `submission` 區塊的日期鍵，例如 `10102022`
pub const SUBMISSION_DATE_FORMAT: &str = "%d%m%Y";

/// 沒有樣本的指標輸出為 `{}`
fn empty_object_if_none<T: Serialize, S: Serializer>(
    value: &Option<T>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(inner) => inner.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    #[serde(serialize_with = "empty_object_if_none")]
    pub lat_lon_regression: Option<RegressionMetrics>,
    #[serde(serialize_with = "empty_object_if_none")]
    pub fish_zone_classification: Option<ClassificationMetrics>,
    #[serde(serialize_with = "empty_object_if_none")]
    pub fao_zone_classification: Option<ClassificationMetrics>,
    /// 平均距離（公里），沒有可計算的距離時為 null
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedComparison {
    pub true_coordinates: Coordinates,
    pub true_fish_zone: usize,
    pub true_fao_zone: usize,
    pub true_fish_zone_name: String,
    pub true_fao_zone_name: String,
    pub predicted_coordinates: Coordinates,
    pub predicted_fish_zone: usize,
    pub predicted_fao_zone: usize,
    pub predicted_fish_zone_name: String,
    pub predicted_fao_zone_name: String,
    pub prediction_distance_from_true_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyEvaluation {
    #[serde(flatten)]
    pub summary: MetricSummary,
    pub detailed: BTreeMap<String, DetailedComparison>,
}

/// 一個隊伍的完整評分：每日、總平均，以及解析後的原始提交
#[derive(Debug, Clone)]
pub struct TeamEvaluation {
    pub team: String,
    pub days: BTreeMap<NaiveDate, DailyEvaluation>,
    pub total_average: MetricSummary,
    pub submission: CatchTable,
}

impl TeamEvaluation {
    pub fn day(&self, date: NaiveDate) -> Option<&DailyEvaluation> {
        self.days.get(&date)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
    }
}

struct SubmissionView<'a>(&'a CatchTable);

impl Serialize for SubmissionView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (date, catches) in self.0 {
            map.serialize_entry(&date.format(SUBMISSION_DATE_FORMAT).to_string(), catches)?;
        }
        map.end()
    }
}

impl Serialize for TeamEvaluation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len() + 2))?;
        for (date, daily) in &self.days {
            map.serialize_entry(&date.format(REPORT_DATE_FORMAT).to_string(), daily)?;
        }
        map.serialize_entry("total_average", &self.total_average)?;
        map.serialize_entry("submission", &SubmissionView(&self.submission))?;
        map.end()
    }
}
