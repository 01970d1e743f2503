use crate::utils::error::{EvalError, Result};
use serde::{Deserialize, Serialize};

/// 多輸出回歸指標；`raw_*` 為每個維度（經度、緯度）各自的值，其餘為各維度平均
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub mean_squared_error: f64,
    pub raw_mean_squared_error: Vec<f64>,
    pub mean_root_squared_error: f64,
    pub raw_mean_root_squared_error: Vec<f64>,
    pub mean_absolute_error: f64,
    pub raw_mean_absolute_error: Vec<f64>,
    pub mean_absolute_percentage_error: f64,
    pub raw_mean_absolute_percentage_error: Vec<f64>,
}

fn per_dimension<const D: usize>(
    y_true: &[[f64; D]],
    y_pred: &[[f64; D]],
    error: impl Fn(f64, f64) -> f64,
) -> Vec<f64> {
    let n = y_true.len() as f64;
    (0..D)
        .map(|d| {
            y_true
                .iter()
                .zip(y_pred)
                .map(|(t, p)| error(t[d], p[d]))
                .sum::<f64>()
                / n
        })
        .collect()
}

fn uniform_average(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn regression_metrics<const D: usize>(
    y_true: &[[f64; D]],
    y_pred: &[[f64; D]],
) -> Result<Option<RegressionMetrics>> {
    if y_true.len() != y_pred.len() {
        return Err(EvalError::processing(format!(
            "coordinate series differ in length: {} true vs {} predicted",
            y_true.len(),
            y_pred.len()
        )));
    }
    if y_true.is_empty() || D == 0 {
        return Ok(None);
    }

    let raw_mse = per_dimension(y_true, y_pred, |t, p| (t - p).powi(2));
    let raw_mae = per_dimension(y_true, y_pred, |t, p| (t - p).abs());
    // 真實值接近 0 時以 f64::EPSILON 作為分母下限
    let raw_mape = per_dimension(y_true, y_pred, |t, p| (t - p).abs() / t.abs().max(f64::EPSILON));

    let mse = uniform_average(&raw_mse);

    Ok(Some(RegressionMetrics {
        mean_squared_error: mse,
        raw_mean_root_squared_error: raw_mse.iter().map(|v| v.sqrt()).collect(),
        mean_root_squared_error: mse.sqrt(),
        raw_mean_squared_error: raw_mse,
        mean_absolute_error: uniform_average(&raw_mae),
        raw_mean_absolute_error: raw_mae,
        mean_absolute_percentage_error: uniform_average(&raw_mape),
        raw_mean_absolute_percentage_error: raw_mape,
    }))
}
