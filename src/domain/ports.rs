use crate::config::toml_config::EvaluationSettings;
use crate::domain::model::{EvaluationInput, EvaluationOutput};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn is_dir(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
    /// 列出目錄下指定副檔名的檔案，依路徑排序
    fn list_files(
        &self,
        dir: &str,
        extension: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn ground_truth_path(&self) -> &str;
    fn fishing_zone_info_path(&self) -> &str;
    fn output_dir(&self) -> &str;
    fn settings(&self) -> &EvaluationSettings;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<EvaluationInput>;
    async fn transform(&self, input: EvaluationInput) -> Result<EvaluationOutput>;
    async fn load(&self, output: EvaluationOutput) -> Result<String>;
}
