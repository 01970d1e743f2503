pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::pipelines::EvaluationPipeline;
pub use config::{cli::LocalStorage, toml_config::EvaluationSettings};
pub use core::{etl::EtlEngine, zones::ZoneIndex};
pub use utils::error::{EvalError, Result};
