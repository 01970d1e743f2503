//! Ground-truth generation from raw landing records.
//!
//! For every requested (date, species) the position with the largest summed
//! product weight becomes the true catch location.

use crate::domain::model::CatchReport;
use crate::utils::error::{EvalError, Result};
use chrono::NaiveDate;
use std::collections::HashMap;

pub const LANDING_DATE_FORMAT: &str = "%d.%m.%Y";

pub const COLUMN_DATE: &str = "Siste fangstdato";
pub const COLUMN_SPECIES: &str = "Art FAO";
pub const COLUMN_LATITUDE: &str = "Lat (lokasjon)";
pub const COLUMN_LONGITUDE: &str = "Lon (lokasjon)";
pub const COLUMN_WEIGHT: &str = "Produktvekt";

pub const DEFAULT_SPECIES: &[&str] = &[
    "Berggylt",
    "Makrell",
    "Sild",
    "Hyse",
    "Sei",
    "Uer (vanlig)",
    "Lyr",
    "Torsk",
    "Breiflabb",
    "Lange",
];

#[derive(Debug, Clone, PartialEq)]
pub struct LandingRecord {
    pub date: NaiveDate,
    pub species: String,
    pub latitude: f64,
    pub longitude: f64,
    pub product_weight: f64,
}

/// 逗號作為小數點，並移除千分位空白
fn parse_decimal(value: &str) -> Option<f64> {
    let normalized: String = value
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok()
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header.trim() == name)
        .ok_or_else(|| EvalError::validation(format!("landing file is missing column '{}'", name)))
}

/// 解析漁獲登記資料；缺少位置或日期的列直接略過，缺少重量視為 0
pub fn parse_landings(data: &[u8], delimiter: u8) -> Result<Vec<LandingRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let date_idx = column_index(&headers, COLUMN_DATE)?;
    let species_idx = column_index(&headers, COLUMN_SPECIES)?;
    let lat_idx = column_index(&headers, COLUMN_LATITUDE)?;
    let lon_idx = column_index(&headers, COLUMN_LONGITUDE)?;
    let weight_idx = column_index(&headers, COLUMN_WEIGHT)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = record?;
        let field = |idx: usize| record.get(idx).map(str::trim).unwrap_or("");

        let parsed = (
            NaiveDate::parse_from_str(field(date_idx), LANDING_DATE_FORMAT).ok(),
            parse_decimal(field(lat_idx)),
            parse_decimal(field(lon_idx)),
        );
        let (Some(date), Some(latitude), Some(longitude)) = parsed else {
            skipped += 1;
            continue;
        };

        records.push(LandingRecord {
            date,
            species: field(species_idx).to_string(),
            latitude,
            longitude,
            product_weight: parse_decimal(field(weight_idx)).unwrap_or(0.0),
        });
    }

    if skipped > 0 {
        tracing::debug!("Skipped {} landing rows without date or position", skipped);
    }
    tracing::info!("📥 Parsed {} landing records", records.len());
    Ok(records)
}

/// 對每個日期、魚種，找出總重量最大的位置。同重量時取 (緯度, 經度) 排序最前者。
pub fn select_ground_truth(
    records: &[LandingRecord],
    dates: &[NaiveDate],
    species: &[String],
) -> Vec<CatchReport> {
    let mut reports = Vec::new();

    for date in dates {
        for fish in species {
            let mut positions: HashMap<(u64, u64), (f64, f64, f64)> = HashMap::new();
            for record in records
                .iter()
                .filter(|r| r.date == *date && r.species == *fish)
            {
                let entry = positions
                    .entry((record.latitude.to_bits(), record.longitude.to_bits()))
                    .or_insert((record.latitude, record.longitude, 0.0));
                entry.2 += record.product_weight;
            }

            if positions.is_empty() {
                tracing::warn!("No {} caught on {}", fish, date.format(LANDING_DATE_FORMAT));
                continue;
            }

            let mut grouped: Vec<(f64, f64, f64)> = positions.into_values().collect();
            grouped.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

            let mut best = grouped[0];
            for candidate in grouped.iter().skip(1) {
                if candidate.2 > best.2 {
                    best = *candidate;
                }
            }

            reports.push(CatchReport {
                date: *date,
                species: fish.clone(),
                longitude: best.1,
                latitude: best.0,
            });
        }
    }

    reports
}

/// 以評分程式可直接讀取的格式輸出：Date;Fish;Lon;Lat
pub fn write_ground_truth(reports: &[CatchReport], delimiter: u8, date_format: &str) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(["Date", "Fish", "Lon", "Lat"])?;
    for report in reports {
        writer.write_record([
            report.date.format(date_format).to_string(),
            report.species.clone(),
            report.longitude.to_string(),
            report.latitude.to_string(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| EvalError::processing(format!("failed to flush ground truth: {}", e)))
}

pub fn parse_dates(values: &[String]) -> Result<Vec<NaiveDate>> {
    values
        .iter()
        .map(|value| {
            NaiveDate::parse_from_str(value.trim(), LANDING_DATE_FORMAT).map_err(|e| {
                EvalError::InvalidConfigValueError {
                    field: "dates".to_string(),
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })
        })
        .collect()
}

/// 預設評估期間 2022-10-10 至 2022-10-17
pub fn default_dates() -> Vec<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(2022, 10, 10).unwrap_or_default();
    start.iter_days().take(8).collect()
}
