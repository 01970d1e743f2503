use crate::core::zones::ZoneIndex;
use crate::domain::model::{CatchReport, CatchTable, ResolvedCatch};
use crate::utils::error::{EvalError, Result};
use chrono::NaiveDate;

/// 日期、魚種、經度、緯度
const EXPECTED_COLUMNS: usize = 4;

pub fn parse_catch_reports(
    data: &[u8],
    source_name: &str,
    delimiter: u8,
    date_format: &str,
) -> Result<Vec<CatchReport>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let header_len = reader.headers()?.len();
    if header_len != EXPECTED_COLUMNS {
        return Err(EvalError::validation(format!(
            "{}: expected {} header columns (date, species, longitude, latitude), found {}",
            source_name, EXPECTED_COLUMNS, header_len
        )));
    }

    let mut reports = Vec::new();

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        // 第 1 列是標題
        let row = index + 2;
        let record_error = |message: String| EvalError::RecordError {
            source_name: source_name.to_string(),
            row,
            message,
        };

        if record.len() != EXPECTED_COLUMNS {
            return Err(record_error(format!(
                "expected {} fields, found {}",
                EXPECTED_COLUMNS,
                record.len()
            )));
        }

        let date = NaiveDate::parse_from_str(&record[0], date_format)
            .map_err(|e| record_error(format!("invalid date '{}': {}", &record[0], e)))?;
        let longitude = record[2]
            .parse::<f64>()
            .map_err(|e| record_error(format!("invalid longitude '{}': {}", &record[2], e)))?;
        let latitude = record[3]
            .parse::<f64>()
            .map_err(|e| record_error(format!("invalid latitude '{}': {}", &record[3], e)))?;

        reports.push(CatchReport {
            date,
            species: record[1].to_string(),
            longitude,
            latitude,
        });
    }

    tracing::debug!("Parsed {} catch reports from {}", reports.len(), source_name);
    Ok(reports)
}

/// 對每筆回報做區域判定；同一天同一魚種重複出現時以後面的為準
pub fn resolve_catches(reports: Vec<CatchReport>, zones: &ZoneIndex) -> CatchTable {
    let mut table = CatchTable::new();

    for report in reports {
        let assignment = zones.resolve(report.longitude, report.latitude);
        let replaced = table.entry(report.date).or_default().insert(
            report.species.clone(),
            ResolvedCatch {
                longitude: report.longitude,
                latitude: report.latitude,
                location: assignment.location,
                fao_zone: assignment.fao_zone,
            },
        );

        if replaced.is_some() {
            tracing::debug!(
                "Duplicate report for {} on {}, keeping the last one",
                report.species,
                report.date
            );
        }
    }

    table
}

pub fn read_catch_table(
    data: &[u8],
    source_name: &str,
    zones: &ZoneIndex,
    delimiter: u8,
    date_format: &str,
) -> Result<CatchTable> {
    tracing::info!("📥 Reading {}", source_name);
    let reports = parse_catch_reports(data, source_name, delimiter, date_format)?;
    Ok(resolve_catches(reports, zones))
}
