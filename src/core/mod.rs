pub mod catch_reader;
pub mod etl;
pub mod ground_truth;
pub mod map;
pub mod metrics;
pub mod report;
pub mod scoring;
pub mod zones;

pub use crate::domain::model::{
    CatchReport, CatchTable, EvaluationInput, EvaluationOutput, ResolvedCatch, Submission,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
