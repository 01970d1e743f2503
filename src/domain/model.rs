use crate::core::report::TeamEvaluation;
use crate::core::zones::ZoneIndex;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// 座標不在任何多邊形內時使用的標籤，同時也是分類編號 0
pub const NOT_AVAILABLE: &str = "Not available";

/// CSV 中的一列：日期、魚種、經度、緯度
#[derive(Debug, Clone, PartialEq)]
pub struct CatchReport {
    pub date: NaiveDate,
    pub species: String,
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedCatch {
    pub longitude: f64,
    pub latitude: f64,
    pub location: String,
    pub fao_zone: String,
}

impl ResolvedCatch {
    pub fn has_finite_coordinates(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite()
    }
}

pub type DailyCatches = BTreeMap<String, ResolvedCatch>;
pub type CatchTable = BTreeMap<NaiveDate, DailyCatches>;

#[derive(Debug, Clone)]
pub struct Submission {
    pub team: String,
    pub source: String,
    pub catches: CatchTable,
}

#[derive(Debug, Clone)]
pub struct EvaluationInput {
    pub zones: Arc<ZoneIndex>,
    pub ground_truth: CatchTable,
    pub submissions: Vec<Submission>,
}

/// 一個要寫出的檔案，路徑相對於輸出目錄
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub relative_path: String,
    pub contents: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct TeamArtifacts {
    pub evaluation: TeamEvaluation,
    pub maps: Vec<Artifact>,
}

#[derive(Debug, Clone, Default)]
pub struct EvaluationOutput {
    pub teams: Vec<TeamArtifacts>,
    pub shared: Vec<Artifact>,
}

impl EvaluationOutput {
    pub fn artifact_count(&self) -> usize {
        self.shared.len()
            + self
                .teams
                .iter()
                .map(|team| team.maps.len() + 1)
                .sum::<usize>()
    }
}
