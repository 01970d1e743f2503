use anyhow::{bail, Context};
use catch_eval::config::toml_config::DEFAULT_DATE_FORMAT;
use catch_eval::core::ground_truth::{
    default_dates, parse_dates, parse_landings, select_ground_truth, write_ground_truth,
    DEFAULT_SPECIES,
};
use catch_eval::utils::logger;
use catch_eval::utils::validation::validate_delimiter;
use clap::Parser;
use std::path::Path;

#[derive(Parser)]
#[command(name = "generate-gt")]
#[command(about = "Build the ground-truth catch file from raw landing records")]
struct Args {
    /// Landing records CSV (';' separated, ',' as decimal separator)
    #[arg(short, long, default_value = "fangstdata_2022.csv")]
    landings: String,

    /// Output ground-truth CSV
    #[arg(short, long, default_value = "gt.csv")]
    output: String,

    /// Dates to include, dd.mm.YYYY (defaults to 10.10.2022 - 17.10.2022)
    #[arg(long, value_delimiter = ',')]
    dates: Vec<String>,

    /// Species to include (defaults to the evaluation species list)
    #[arg(long, value_delimiter = ',')]
    species: Vec<String>,

    /// Date format written to the output, must match the evaluator's input.date_format
    #[arg(long, default_value = DEFAULT_DATE_FORMAT)]
    date_format: String,

    /// Output delimiter
    #[arg(long, default_value = ";")]
    delimiter: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let dates = if args.dates.is_empty() {
        default_dates()
    } else {
        parse_dates(&args.dates)?
    };
    let species: Vec<String> = if args.species.is_empty() {
        DEFAULT_SPECIES.iter().map(|s| s.to_string()).collect()
    } else {
        args.species.iter().map(|s| s.trim().to_string()).collect()
    };
    let delimiter = validate_delimiter("delimiter", &args.delimiter)?;

    tracing::info!(
        "🚀 Generating ground truth for {} dates x {} species from {}",
        dates.len(),
        species.len(),
        args.landings
    );

    let data = std::fs::read(&args.landings)
        .with_context(|| format!("failed to read landing records from {}", args.landings))?;
    let records = parse_landings(&data, b';')?;
    let reports = select_ground_truth(&records, &dates, &species);

    if reports.is_empty() {
        bail!("no catches matched the requested dates and species");
    }

    let output = write_ground_truth(&reports, delimiter, &args.date_format)?;
    if let Some(parent) = Path::new(&args.output).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(&args.output, output)
        .with_context(|| format!("failed to write {}", args.output))?;

    tracing::info!("✅ Wrote {} ground-truth rows to {}", reports.len(), args.output);
    println!("📁 Ground truth saved to: {}", args.output);
    Ok(())
}
