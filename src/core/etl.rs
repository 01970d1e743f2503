use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor_enabled: bool,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor_enabled,
        }
    }

    pub async fn run(&self) -> Result<String> {
        let mut monitor = SystemMonitor::new(self.monitor_enabled);
        tracing::info!("Starting evaluation run...");

        // Extract
        let input = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted ground truth for {} days and {} submissions",
            input.ground_truth.len(),
            input.submissions.len()
        );
        monitor.finish_phase("extract");

        // Transform
        let output = self.pipeline.transform(input).await?;
        tracing::info!(
            "Evaluated {} teams ({} artifacts)",
            output.teams.len(),
            output.artifact_count()
        );
        monitor.finish_phase("transform");

        // Load
        let output_path = self.pipeline.load(output).await?;
        tracing::info!("Output saved to: {}", output_path);
        monitor.finish_phase("load");

        monitor.log_final_stats();
        Ok(output_path)
    }
}
