use catch_eval::core::Storage;
use catch_eval::utils::error::ErrorSeverity;
use catch_eval::utils::{logger, validation::Validate};
use catch_eval::{CliConfig, EtlEngine, EvaluationPipeline, LocalStorage};
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(config.verbose, config.log_json);

    tracing::info!("🚀 Starting catch-eval");

    // 載入設定檔並套用命令列覆蓋
    if let Err(e) = config.resolve_settings() {
        tracing::error!("❌ Failed to load settings: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Make sure the file exists and is valid TOML format");
        std::process::exit(1);
    }

    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config);

    let storage = LocalStorage::default();

    if config.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No output will be written");
        perform_dry_run(storage, config).await;
        return Ok(());
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let pipeline = EvaluationPipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Evaluation completed successfully!");
            println!("✅ Evaluation completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Evaluation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &CliConfig) {
    let settings = &config.settings;
    println!("📋 Configuration Summary:");
    println!("  Submissions: {}", config.input_path);
    println!("  Ground truth: {}", config.ground_truth_path);
    println!("  Zones: {}", config.fishing_zone_info_path);
    println!("  Output: {}", config.output_dir);
    println!(
        "  Input format: delimiter '{}', date format {}",
        settings.input.delimiter, settings.input.date_format
    );
    println!("  Zone scale: {}", settings.zones.scale);
    println!("  Report file: {}", settings.output.report_filename);
    if settings.output.export_geojson {
        println!("  GeoJSON export: enabled");
    }
    if config.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }
    println!();
}

async fn perform_dry_run(storage: LocalStorage, config: CliConfig) {
    println!("🔍 Dry Run Analysis:");

    for (label, path) in [
        ("Ground truth", config.ground_truth_path.as_str()),
        ("Zones", config.fishing_zone_info_path.as_str()),
    ] {
        match storage.read_file(path).await {
            Ok(data) => println!("  ✅ {}: {} ({} bytes)", label, path, data.len()),
            Err(e) => println!("  ❌ {}: {} ({})", label, path, e),
        }
    }

    let pipeline = EvaluationPipeline::new(storage, config);
    match pipeline.discover_submissions().await {
        Ok(paths) => {
            println!("  📊 Submissions to evaluate: {}", paths.len());
            for path in paths {
                println!("    - {} (team {})", path, catch_eval::core::scoring::team_name(&path));
            }
        }
        Err(e) => println!("  ❌ Could not list submissions: {}", e),
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
