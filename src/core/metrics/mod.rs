//! Accuracy metrics for catch-location predictions
//!
//! - Zone-label classification: micro/macro recall, precision, F1 and MCC
//! - Coordinate regression: MSE, RMSE, MAE, MAPE with per-dimension values
//! - Geodesic distance between true and predicted positions

pub mod classification;
pub mod distance;
pub mod regression;

pub use classification::{classification_metrics, Average, ClassificationMetrics, ConfusionMatrix};
pub use distance::{geodesic_distance_km, mean};
pub use regression::{regression_metrics, RegressionMetrics};
