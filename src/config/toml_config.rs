use crate::utils::error::{EvalError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_DATE_FORMAT: &str = "%d%m%Y";
pub const DEFAULT_TILES: &str = "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png";

/// 評分設定，全部欄位都有預設值，TOML 檔案可以只寫需要覆蓋的部分
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    pub input: InputSettings,
    pub zones: ZoneSettings,
    pub map: MapSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    pub delimiter: String,
    pub date_format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneSettings {
    /// 漁區多邊形以外框中心縮放的倍率
    pub scale: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub zoom: u8,
    pub tiles: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub report_filename: String,
    pub export_geojson: bool,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            delimiter: ";".to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl Default for ZoneSettings {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            center_latitude: 50.854457,
            center_longitude: 4.377184,
            zoom: 5,
            tiles: DEFAULT_TILES.to_string(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            report_filename: "eval.json".to_string(),
            export_geojson: false,
        }
    }
}

impl EvaluationSettings {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EvalError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EvalError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OUTPUT_TILES})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EvalError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// csv reader 使用的分隔位元組
    pub fn delimiter_byte(&self) -> Result<u8> {
        validation::validate_delimiter("input.delimiter", &self.input.delimiter)
    }
}

impl Validate for EvaluationSettings {
    fn validate(&self) -> Result<()> {
        self.delimiter_byte()?;
        validation::validate_non_empty_string("input.date_format", &self.input.date_format)?;
        validation::validate_range("zones.scale", self.zones.scale, 1e-6, 1e6)?;
        validation::validate_range("map.center_latitude", self.map.center_latitude, -90.0, 90.0)?;
        validation::validate_range("map.center_longitude", self.map.center_longitude, -180.0, 180.0)?;
        validation::validate_range("map.zoom", self.map.zoom, 0, 20)?;
        validation::validate_non_empty_string("map.tiles", &self.map.tiles)?;
        validation::validate_file_extension("output.report_filename", &self.output.report_filename, &["json"])?;
        Ok(())
    }
}
