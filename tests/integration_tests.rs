#![cfg(feature = "cli")]

use catch_eval::{CliConfig, EtlEngine, EvaluationPipeline, EvaluationSettings, LocalStorage};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ZONES: &str = r#"{
    "Vestfjorden": {
        "FAOArea": "27.IIa",
        "Coordinates": [
            {"Latitude": 67.0, "Longitude": 12.0},
            {"Latitude": 67.0, "Longitude": 16.0},
            {"Latitude": 69.0, "Longitude": 16.0},
            {"Latitude": 69.0, "Longitude": 12.0}
        ]
    },
    "Tromsoflaket": {
        "FAOArea": "27.IIa",
        "Coordinates": [
            {"Latitude": 69.0, "Longitude": 16.0},
            {"Latitude": 69.0, "Longitude": 20.0},
            {"Latitude": 71.0, "Longitude": 20.0},
            {"Latitude": 71.0, "Longitude": 16.0}
        ]
    },
    "Vikingbanken": {
        "FAOArea": "27.IVa",
        "Coordinates": [
            {"Latitude": 59.0, "Longitude": 1.0},
            {"Latitude": 59.0, "Longitude": 4.0},
            {"Latitude": 61.0, "Longitude": 4.0},
            {"Latitude": 61.0, "Longitude": 1.0}
        ]
    }
}"#;

const GROUND_TRUTH: &str = "Date;Fish;Lon;Lat\n\
    10102022;Torsk;14.0;68.0\n\
    10102022;Sei;2.5;60.0\n\
    11102022;Torsk;18.0;70.0\n\
    11102022;Makrell;2.0;60.5\n";

struct Fixture {
    _temp_dir: TempDir,
    root: String,
}

impl Fixture {
    fn new(submissions: &[(&str, &str)]) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_str().unwrap().to_string();

        fs::create_dir_all(Path::new(&root).join("data")).unwrap();
        fs::create_dir_all(Path::new(&root).join("submissions")).unwrap();
        fs::write(Path::new(&root).join("data/zones.json"), ZONES).unwrap();
        fs::write(Path::new(&root).join("data/gt.csv"), GROUND_TRUTH).unwrap();
        for (name, content) in submissions {
            fs::write(Path::new(&root).join("submissions").join(name), content).unwrap();
        }

        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    fn path(&self, relative: &str) -> String {
        Path::new(&self.root).join(relative).to_string_lossy().into_owned()
    }

    fn config(&self, input: &str) -> CliConfig {
        CliConfig {
            input_path: self.path(input),
            ground_truth_path: self.path("data/gt.csv"),
            fishing_zone_info_path: self.path("data/zones.json"),
            output_dir: self.path("output"),
            config: None,
            scale_zones: None,
            verbose: false,
            log_json: false,
            monitor: false,
            dry_run: false,
            settings: EvaluationSettings::default(),
        }
    }

    fn report(&self, team: &str) -> serde_json::Value {
        let data = fs::read(self.path(&format!("output/{}/eval.json", team))).unwrap();
        serde_json::from_slice(&data).unwrap()
    }
}

async fn run(config: CliConfig) -> catch_eval::Result<String> {
    let pipeline = EvaluationPipeline::new(LocalStorage::default(), config);
    EtlEngine::new(pipeline).run().await
}

#[tokio::test]
async fn test_end_to_end_directory_of_submissions() {
    let fixture = Fixture::new(&[
        ("perfect_20221018.csv", GROUND_TRUTH),
        (
            "sloppy_20221018.csv",
            "date;species;longitude;latitude\n\
             10102022;Torsk;18.5;70.5\n\
             10102022;Sei;2.5;60.0\n\
             11102022;Torsk;18.0;70.0\n",
        ),
    ]);

    let output_dir = run(fixture.config("submissions")).await.unwrap();
    assert_eq!(output_dir, fixture.path("output"));

    for team in ["perfect", "sloppy"] {
        for file in [
            "eval.json",
            "fish-zone-10-10-2022.html",
            "fao-zone-10-10-2022.html",
            "fish-zone-11-10-2022.html",
            "fao-zone-11-10-2022.html",
        ] {
            let path = fixture.path(&format!("output/{}/{}", team, file));
            assert!(Path::new(&path).exists(), "missing {}", path);
        }
    }

    let perfect = fixture.report("perfect");
    let total = &perfect["total_average"];
    assert_eq!(total["fish_zone_classification"]["f1_macro"], 1.0);
    assert_eq!(total["fao_zone_classification"]["recall_micro"], 1.0);
    assert_eq!(total["lat_lon_regression"]["mean_squared_error"], 0.0);
    assert_eq!(perfect["10-10-2022"]["detailed"].as_object().unwrap().len(), 2);

    let sloppy = fixture.report("sloppy");
    // 10/10 Torsk 預測落在 Tromsoflaket（同一個 FAO 區），11/10 Makrell 沒有預測
    let first_day = &sloppy["10-10-2022"];
    assert_eq!(first_day["fish_zone_classification"]["recall_micro"], 0.5);
    assert_eq!(first_day["fao_zone_classification"]["recall_micro"], 1.0);
    let torsk = &first_day["detailed"]["Torsk"];
    assert_eq!(torsk["true_fish_zone_name"], "Vestfjorden");
    assert_eq!(torsk["predicted_fish_zone_name"], "Tromsoflaket");
    assert!(torsk["prediction_distance_from_true_km"].as_f64().unwrap() > 200.0);

    let second_day = &sloppy["11-10-2022"];
    assert_eq!(second_day["detailed"].as_object().unwrap().len(), 1);
    assert!(second_day["detailed"].get("Makrell").is_none());

    assert_eq!(sloppy["submission"]["10102022"]["Torsk"]["location"], "Tromsoflaket");
    assert_eq!(sloppy["submission"]["11102022"]["Torsk"]["fao_zone"], "27.IIa");
}

#[tokio::test]
async fn test_single_submission_file_and_missing_day() {
    let fixture = Fixture::new(&[(
        "teamX_only_first_day.csv",
        "date;species;longitude;latitude\n10102022;Torsk;14.0;68.0\n",
    )]);

    run(fixture.config("submissions/teamX_only_first_day.csv"))
        .await
        .unwrap();

    let report = fixture.report("teamX");
    assert!(report.get("10-10-2022").is_some());
    assert!(report.get("11-10-2022").is_none());
    assert!(!Path::new(&fixture.path("output/teamX/fish-zone-11-10-2022.html")).exists());
    assert!(report["total_average"]["distance"].as_f64().unwrap() < 1e-6);
}

#[tokio::test]
async fn test_broken_submission_does_not_stop_others() {
    let fixture = Fixture::new(&[
        ("good_1.csv", GROUND_TRUTH),
        ("broken_1.csv", "only;three;columns\n1;2;3\n"),
    ]);

    run(fixture.config("submissions")).await.unwrap();

    assert!(Path::new(&fixture.path("output/good/eval.json")).exists());
    assert!(!Path::new(&fixture.path("output/broken")).exists());
}

#[tokio::test]
async fn test_missing_zone_file_fails_run() {
    let fixture = Fixture::new(&[("teamA_1.csv", GROUND_TRUTH)]);
    let mut config = fixture.config("submissions");
    config.fishing_zone_info_path = fixture.path("data/missing.json");

    let err = run(config).await.unwrap_err();
    assert!(matches!(err, catch_eval::EvalError::IoError(_)));
}

#[tokio::test]
async fn test_settings_change_report_name_and_export_layers() {
    let fixture = Fixture::new(&[("teamA_1.csv", GROUND_TRUTH)]);
    let mut config = fixture.config("submissions");
    config.settings.output.report_filename = "scores.json".to_string();
    config.settings.output.export_geojson = true;

    let pipeline = EvaluationPipeline::new(LocalStorage::default(), config);
    EtlEngine::new_with_monitoring(pipeline, true).run().await.unwrap();

    assert!(Path::new(&fixture.path("output/teamA/scores.json")).exists());
    let layers: serde_json::Value =
        serde_json::from_slice(&fs::read(fixture.path("output/fao-zones.geojson")).unwrap()).unwrap();
    assert_eq!(layers["features"].as_array().unwrap().len(), 2);
}
