use crate::core::catch_reader::read_catch_table;
use crate::core::scoring::{team_name, Scorer};
use crate::core::zones::ZoneIndex;
use crate::core::{ConfigProvider, EvaluationInput, EvaluationOutput, Pipeline, Storage, Submission};
use crate::domain::model::Artifact;
use crate::utils::error::Result;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// 讀取區域與真實資料、評分每個提交、把報表與地圖寫到各隊伍目錄
pub struct EvaluationPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> EvaluationPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// 輸入路徑是目錄時取其中所有 csv，否則視為單一提交檔案
    pub async fn discover_submissions(&self) -> Result<Vec<String>> {
        let input_path = self.config.input_path();
        if self.storage.is_dir(input_path).await {
            let files = self.storage.list_files(input_path, "csv").await?;
            tracing::debug!("Found {} submission files in {}", files.len(), input_path);
            Ok(files)
        } else {
            Ok(vec![input_path.to_string()])
        }
    }

    async fn load_zones(&self) -> Result<ZoneIndex> {
        let path = self.config.fishing_zone_info_path();
        tracing::info!("🗺️ Loading fishing zones from {}", path);
        let data = self.storage.read_file(path).await?;
        ZoneIndex::from_json(&data, self.config.settings().zones.scale)
    }

    async fn read_table(&self, path: &str, zones: &ZoneIndex) -> Result<crate::core::CatchTable> {
        let settings = self.config.settings();
        let data = self.storage.read_file(path).await?;
        read_catch_table(
            &data,
            path,
            zones,
            settings.delimiter_byte()?,
            &settings.input.date_format,
        )
    }

    fn output_path(&self, parts: &[&str]) -> String {
        parts
            .iter()
            .fold(Path::new(self.config.output_dir()).to_path_buf(), |path, part| {
                path.join(part)
            })
            .to_string_lossy()
            .into_owned()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for EvaluationPipeline<S, C> {
    async fn extract(&self) -> Result<EvaluationInput> {
        let zones = self.load_zones().await?;
        let ground_truth = self
            .read_table(self.config.ground_truth_path(), &zones)
            .await?;

        let mut submissions = Vec::new();
        let mut seen_teams = HashSet::new();

        for path in self.discover_submissions().await? {
            let team = team_name(&path);
            match self.read_table(&path, &zones).await {
                Ok(catches) => {
                    if !seen_teams.insert(team.clone()) {
                        tracing::warn!(
                            "Team {} has more than one submission, {} will overwrite earlier results",
                            team,
                            path
                        );
                    }
                    submissions.push(Submission {
                        team,
                        source: path,
                        catches,
                    });
                }
                Err(e) => {
                    tracing::error!("❌ Skipping submission {}: {}", path, e);
                    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                }
            }
        }

        if submissions.is_empty() {
            tracing::warn!("No readable submissions found at {}", self.config.input_path());
        }

        Ok(EvaluationInput {
            zones: Arc::new(zones),
            ground_truth,
            submissions,
        })
    }

    async fn transform(&self, input: EvaluationInput) -> Result<EvaluationOutput> {
        let settings = self.config.settings();
        let scorer = Scorer::new(&input.ground_truth, &input.zones, &settings.map);

        let mut output = EvaluationOutput::default();
        for submission in &input.submissions {
            output.teams.push(scorer.evaluate(submission)?);
        }

        if settings.output.export_geojson {
            output.shared.push(Artifact {
                relative_path: "fishing-zones.geojson".to_string(),
                contents: serde_json::to_vec_pretty(&input.zones.fishing_zone_geojson())?,
            });
            output.shared.push(Artifact {
                relative_path: "fao-zones.geojson".to_string(),
                contents: serde_json::to_vec_pretty(&input.zones.fao_zone_geojson())?,
            });
        }

        Ok(output)
    }

    async fn load(&self, output: EvaluationOutput) -> Result<String> {
        let report_filename = &self.config.settings().output.report_filename;

        for team in &output.teams {
            let team_dir = &team.evaluation.team;

            for map in &team.maps {
                let path = self.output_path(&[team_dir, &map.relative_path]);
                self.storage.write_file(&path, &map.contents).await?;
            }

            let report_path = self.output_path(&[team_dir, report_filename]);
            self.storage
                .write_file(&report_path, &team.evaluation.to_json_pretty()?)
                .await?;
            tracing::info!("📝 Wrote {}", report_path);
        }

        for artifact in &output.shared {
            let path = self.output_path(&[&artifact.relative_path]);
            self.storage.write_file(&path, &artifact.contents).await?;
        }

        Ok(self.config.output_dir().to_string())
    }
}
