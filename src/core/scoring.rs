use crate::config::toml_config::MapSettings;
use crate::core::map::{marker_popup, MapMarker, MarkerColor, ZoneMap};
use crate::core::metrics::{classification_metrics, geodesic_distance_km, mean, regression_metrics};
use crate::core::report::{
    Coordinates, DailyEvaluation, DetailedComparison, MetricSummary, TeamEvaluation,
    REPORT_DATE_FORMAT,
};
use crate::core::zones::ZoneIndex;
use crate::domain::model::{Artifact, CatchTable, ResolvedCatch, Submission, TeamArtifacts};
use crate::utils::error::Result;
use serde_json::Value;
use std::collections::BTreeMap;

/// 一段期間內累積的真實值／預測值序列
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonSeries {
    pub true_coordinates: Vec<[f64; 2]>,
    pub predicted_coordinates: Vec<[f64; 2]>,
    pub true_fishing_zones: Vec<usize>,
    pub predicted_fishing_zones: Vec<usize>,
    pub true_fao_zones: Vec<usize>,
    pub predicted_fao_zones: Vec<usize>,
    pub distances: Vec<f64>,
}

impl ComparisonSeries {
    pub fn len(&self) -> usize {
        self.true_fishing_zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn extend(&mut self, other: &ComparisonSeries) {
        self.true_coordinates.extend_from_slice(&other.true_coordinates);
        self.predicted_coordinates
            .extend_from_slice(&other.predicted_coordinates);
        self.true_fishing_zones
            .extend_from_slice(&other.true_fishing_zones);
        self.predicted_fishing_zones
            .extend_from_slice(&other.predicted_fishing_zones);
        self.true_fao_zones.extend_from_slice(&other.true_fao_zones);
        self.predicted_fao_zones
            .extend_from_slice(&other.predicted_fao_zones);
        self.distances.extend_from_slice(&other.distances);
    }

    pub fn summarize(&self) -> Result<MetricSummary> {
        Ok(MetricSummary {
            lat_lon_regression: regression_metrics(&self.true_coordinates, &self.predicted_coordinates)?,
            fish_zone_classification: classification_metrics(
                &self.true_fishing_zones,
                &self.predicted_fishing_zones,
            )?,
            fao_zone_classification: classification_metrics(
                &self.true_fao_zones,
                &self.predicted_fao_zones,
            )?,
            distance: mean(&self.distances),
        })
    }
}

/// 以同一份真實資料評分多個提交
pub struct Scorer<'a> {
    ground_truth: &'a CatchTable,
    zones: &'a ZoneIndex,
    map_settings: &'a MapSettings,
    fishing_layer: Value,
    fao_layer: Value,
}

struct DayResult {
    series: ComparisonSeries,
    detailed: BTreeMap<String, DetailedComparison>,
    fishing_map: ZoneMap,
    fao_map: ZoneMap,
}

impl<'a> Scorer<'a> {
    pub fn new(ground_truth: &'a CatchTable, zones: &'a ZoneIndex, map_settings: &'a MapSettings) -> Self {
        Self {
            ground_truth,
            zones,
            map_settings,
            fishing_layer: zones.fishing_zone_geojson(),
            fao_layer: zones.fao_zone_geojson(),
        }
    }

    pub fn evaluate(&self, submission: &Submission) -> Result<TeamArtifacts> {
        tracing::info!("🎯 Evaluating {} ({})", submission.team, submission.source);

        let mut days = BTreeMap::new();
        let mut maps = Vec::new();
        let mut total = ComparisonSeries::default();

        for (date, true_catches) in self.ground_truth {
            let date_str = date.format(REPORT_DATE_FORMAT).to_string();

            let Some(predicted_catches) = submission.catches.get(date) else {
                tracing::warn!("Found no predictions for {}...", date_str);
                continue;
            };

            let mut day = DayResult {
                series: ComparisonSeries::default(),
                detailed: BTreeMap::new(),
                fishing_map: ZoneMap::new(
                    format!("fish-zone-{}", date_str),
                    self.map_settings,
                    self.fishing_layer.clone(),
                ),
                fao_map: ZoneMap::new(
                    format!("fao-zone-{}", date_str),
                    self.map_settings,
                    self.fao_layer.clone(),
                ),
            };

            for (species, true_catch) in true_catches {
                let Some(predicted_catch) = predicted_catches.get(species) else {
                    tracing::warn!("Found no predictions for {} on {}...", species, date_str);
                    continue;
                };
                self.compare(species, true_catch, predicted_catch, &mut day);
            }

            maps.push(Artifact {
                relative_path: format!("fish-zone-{}.html", date_str),
                contents: day.fishing_map.render()?.into_bytes(),
            });
            maps.push(Artifact {
                relative_path: format!("fao-zone-{}.html", date_str),
                contents: day.fao_map.render()?.into_bytes(),
            });

            tracing::debug!(
                "{} on {}: {} comparisons, {} with distance",
                submission.team,
                date_str,
                day.series.len(),
                day.series.distances.len()
            );

            days.insert(
                *date,
                DailyEvaluation {
                    summary: day.series.summarize()?,
                    detailed: day.detailed,
                },
            );
            total.extend(&day.series);
        }

        if days.is_empty() {
            tracing::warn!("No evaluable days for {}", submission.team);
        }

        Ok(TeamArtifacts {
            evaluation: TeamEvaluation {
                team: submission.team.clone(),
                days,
                total_average: total.summarize()?,
                submission: submission.catches.clone(),
            },
            maps,
        })
    }

    fn compare(
        &self,
        species: &str,
        true_catch: &ResolvedCatch,
        predicted_catch: &ResolvedCatch,
        day: &mut DayResult,
    ) {
        let true_fish_zone = self.zones.fishing_zone_class(&true_catch.location);
        let predicted_fish_zone = self.zones.fishing_zone_class(&predicted_catch.location);
        let true_fao_zone = self.zones.fao_zone_class(&true_catch.fao_zone);
        let predicted_fao_zone = self.zones.fao_zone_class(&predicted_catch.fao_zone);

        // 區域分類一律計分，非有限座標落在 "Not available"
        let series = &mut day.series;
        series.true_fishing_zones.push(true_fish_zone);
        series.predicted_fishing_zones.push(predicted_fish_zone);
        series.true_fao_zones.push(true_fao_zone);
        series.predicted_fao_zones.push(predicted_fao_zone);

        if !true_catch.has_finite_coordinates() || !predicted_catch.has_finite_coordinates() {
            tracing::debug!(
                "{} has non-finite coordinates, scoring zones only",
                species
            );
            return;
        }

        series
            .true_coordinates
            .push([true_catch.longitude, true_catch.latitude]);
        series
            .predicted_coordinates
            .push([predicted_catch.longitude, predicted_catch.latitude]);

        let Some(distance) = geodesic_distance_km(
            (true_catch.longitude, true_catch.latitude),
            (predicted_catch.longitude, predicted_catch.latitude),
        ) else {
            return;
        };
        series.distances.push(distance);

        day.detailed.insert(
            species.to_string(),
            DetailedComparison {
                true_coordinates: Coordinates {
                    longitude: true_catch.longitude,
                    latitude: true_catch.latitude,
                },
                true_fish_zone,
                true_fao_zone,
                true_fish_zone_name: true_catch.location.clone(),
                true_fao_zone_name: true_catch.fao_zone.clone(),
                predicted_coordinates: Coordinates {
                    longitude: predicted_catch.longitude,
                    latitude: predicted_catch.latitude,
                },
                predicted_fish_zone,
                predicted_fao_zone,
                predicted_fish_zone_name: predicted_catch.location.clone(),
                predicted_fao_zone_name: predicted_catch.fao_zone.clone(),
                prediction_distance_from_true_km: distance,
            },
        );

        let true_popup = marker_popup(species, &true_catch.location, &true_catch.fao_zone);
        let predicted_popup = marker_popup(species, &predicted_catch.location, &predicted_catch.fao_zone);

        for map in [&mut day.fishing_map, &mut day.fao_map] {
            map.add_marker(MapMarker {
                latitude: true_catch.latitude,
                longitude: true_catch.longitude,
                color: MarkerColor::Red,
                popup: true_popup.clone(),
            });
            map.add_marker(MapMarker {
                latitude: predicted_catch.latitude,
                longitude: predicted_catch.longitude,
                color: MarkerColor::Blue,
                popup: predicted_popup.clone(),
            });
        }
    }
}

/// 檔名第一個 `_` 之前的部分就是隊伍名稱，例如 `teamA_v2.csv` => `teamA`
pub fn team_name(path: &str) -> String {
    let file_name = std::path::Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path);
    let stem = file_name.split('_').next().unwrap_or(file_name);
    stem.strip_suffix(".csv").unwrap_or(stem).to_string()
}
