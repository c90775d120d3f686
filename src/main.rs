use anyhow::{anyhow, Context, Result};
use clap::Parser;
use filterscope::data::Dataset;
use filterscope::runtime;
use filterscope::settings::FilterSettings;
use filterscope::DashboardOptions;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "filterscope")]
#[command(about = "Resolve plot settings and report the impact of cutoff filters", long_about = None)]
struct Args {
    /// Update pipeline (e.g., 'cutoff(200, none) | bins(40) | group_by(plate)')
    #[arg(default_value = "")]
    dsl: String,

    /// Dataset file (reads stdin when omitted)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Dataset is column-oriented JSON instead of CSV
    #[arg(long)]
    json: bool,

    /// FilterSettings JSON file
    #[arg(long, conflicts_with = "field")]
    settings: Option<PathBuf>,

    /// Start from a histogram of this column
    #[arg(long)]
    field: Option<String>,

    /// DashboardOptions JSON file (grouping context, category)
    #[arg(long)]
    options: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let dataset = load_dataset(args.data.as_deref(), args.json).context("Failed to load dataset")?;
    info!(columns = dataset.columns().len(), rows = dataset.len(), "dataset loaded");

    let settings = match (&args.settings, &args.field) {
        (Some(path), _) => read_json::<FilterSettings>(path).context("Failed to read settings")?,
        (None, Some(field)) => FilterSettings::histogram(field.as_str()),
        (None, None) => return Err(anyhow!("Either --settings or --field is required")),
    };

    let options = match &args.options {
        Some(path) => read_json::<DashboardOptions>(path).context("Failed to read options")?,
        None => DashboardOptions::default(),
    };

    let report = runtime::evaluate(Arc::new(dataset), &options, settings, &args.dsl)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, &report).context("Failed to write report")?;
    writeln!(handle).context("Failed to write report")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}

fn load_dataset(path: Option<&Path>, json: bool) -> Result<Dataset> {
    let mut input: Box<dyn Read> = match path {
        Some(p) => Box::new(File::open(p).with_context(|| format!("Cannot open {}", p.display()))?),
        None => Box::new(io::stdin().lock()),
    };

    if json {
        let mut text = String::new();
        input.read_to_string(&mut text).context("Failed to read dataset")?;
        let value: serde_json::Value = serde_json::from_str(&text).context("Invalid JSON")?;
        if value.is_array() {
            Dataset::from_records(&value)
        } else {
            Dataset::from_json(&value)
        }
    } else {
        Dataset::from_csv_reader(input)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    serde_json::from_reader(io::BufReader::new(file))
        .with_context(|| format!("Invalid JSON in {}", path.display()))
}
