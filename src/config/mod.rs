pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use toml_config::EvaluationSettings;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "catch-eval")]
#[command(about = "Score fishing-catch location predictions against ground truth")]
pub struct CliConfig {
    /// Submission CSV file, or a directory of submission CSV files
    #[arg(short, long, default_value = "../submissions")]
    pub input_path: String,

    #[arg(short, long, default_value = "../data/gt.csv")]
    pub ground_truth_path: String,

    #[arg(short = 'f', long, default_value = "../data/zones.json")]
    pub fishing_zone_info_path: String,

    #[arg(short, long, default_value = "../output")]
    pub output_dir: String,

    /// Optional TOML file with evaluation settings
    #[arg(short, long)]
    pub config: Option<String>,

    /// Scale factor for fishing-zone polygons (overrides the config file)
    #[arg(long)]
    pub scale_zones: Option<f64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, help = "Log per-phase CPU and memory usage")]
    pub monitor: bool,

    #[arg(long, help = "Show what would be evaluated without writing output")]
    pub dry_run: bool,

    #[arg(skip)]
    #[serde(default)]
    pub settings: EvaluationSettings,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入 `--config` 指定的 TOML，再套用命令列覆蓋
    pub fn resolve_settings(&mut self) -> Result<()> {
        if let Some(path) = &self.config {
            self.settings = EvaluationSettings::from_file(path)?;
        }
        if let Some(scale) = self.scale_zones {
            self.settings.zones.scale = scale;
        }
        Ok(())
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn ground_truth_path(&self) -> &str {
        &self.ground_truth_path
    }

    fn fishing_zone_info_path(&self) -> &str {
        &self.fishing_zone_info_path
    }

    fn output_dir(&self) -> &str {
        &self.output_dir
    }

    fn settings(&self) -> &EvaluationSettings {
        &self.settings
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input_path", &self.input_path)?;
        validation::validate_path("ground_truth_path", &self.ground_truth_path)?;
        validation::validate_file_extension("ground_truth_path", &self.ground_truth_path, &["csv"])?;
        validation::validate_path("fishing_zone_info_path", &self.fishing_zone_info_path)?;
        validation::validate_file_extension(
            "fishing_zone_info_path",
            &self.fishing_zone_info_path,
            &["json"],
        )?;
        validation::validate_path("output_dir", &self.output_dir)?;
        self.settings.validate()
    }
}
