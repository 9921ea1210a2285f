use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fnblob_client::{
  Credential, create_and_upload_results, create_blob_client, download_file, results_blob_client,
};
use fnblob_config::StorageConfig;
use fnblob_results::{
  FunctionDescriptor, JsonEncoder, Value, build_results_object, derive_results_path,
};

const DEFAULT_LOG_FILTER: &str = "fnblob=info,fnblob_client=info";

/// fnblob - results storage helpers for serverless functions
#[derive(Parser)]
#[command(name = "fnblob")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the storage config file (default: ~/.fnblob/config.json)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the results path for a descriptor
  Path {
    /// Path to the descriptor file (JSON object)
    descriptor_file: PathBuf,

    /// Partition date, YYYY-MM-DD (default: today, UTC)
    #[arg(long)]
    date: Option<NaiveDate>,
  },

  /// Download a blob from the source container to a temp file
  Download {
    /// Blob name within the source container
    #[arg(long)]
    blob: String,

    /// Descriptor used for error context
    #[arg(long)]
    descriptor_file: Option<PathBuf>,
  },

  /// Upload execution results (JSON on stdin) to the results container
  Upload {
    /// Path to the descriptor file (JSON object)
    descriptor_file: PathBuf,

    /// Partition date, YYYY-MM-DD (default: today, UTC)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Print the results path and document instead of uploading
    #[arg(long)]
    dry_run: bool,
  },
}

fn main() -> Result<()> {
  init_tracing();
  let cli = Cli::parse();

  match cli.command {
    Some(Commands::Path {
      descriptor_file,
      date,
    }) => {
      let descriptor = read_descriptor(&descriptor_file)?;
      let date = date.unwrap_or_else(|| Utc::now().date_naive());
      println!("{}", derive_results_path(&descriptor, &date));
    }
    Some(Commands::Download {
      blob,
      descriptor_file,
    }) => {
      let config = load_config(cli.config)?;
      let descriptor = match descriptor_file {
        Some(path) => read_descriptor(&path)?,
        None => FunctionDescriptor::new(),
      };
      run_download(config, descriptor, blob)?;
    }
    Some(Commands::Upload {
      descriptor_file,
      date,
      dry_run,
    }) => {
      let descriptor = read_descriptor(&descriptor_file)?;
      let date = date.unwrap_or_else(|| Utc::now().date_naive());
      if dry_run {
        print_results(&descriptor, date)?;
      } else {
        let config = load_config(cli.config)?;
        run_upload(config, descriptor, date)?;
      }
    }
    None => {
      println!("fnblob - use --help to see available commands");
    }
  }

  Ok(())
}

fn init_tracing() {
  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .with_target(true)
    .try_init();
}

fn load_config(path: Option<PathBuf>) -> Result<StorageConfig> {
  let path = match path {
    Some(path) => path,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".fnblob")
      .join("config.json"),
  };

  StorageConfig::load(&path).with_context(|| format!("failed to load config: {}", path.display()))
}

fn read_descriptor(path: &Path) -> Result<FunctionDescriptor> {
  let content = std::fs::read_to_string(path)
    .with_context(|| format!("failed to read descriptor file: {}", path.display()))?;

  let json: serde_json::Value = serde_json::from_str(&content)
    .with_context(|| format!("failed to parse descriptor file: {}", path.display()))?;

  FunctionDescriptor::from_json(json)
    .with_context(|| format!("invalid descriptor file: {}", path.display()))
}

fn run_download(config: StorageConfig, descriptor: FunctionDescriptor, blob: String) -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run_download_async(config, descriptor, blob).await })
}

async fn run_download_async(
  config: StorageConfig,
  descriptor: FunctionDescriptor,
  blob: String,
) -> Result<()> {
  let credential = Credential::from_source(&config.credential);
  let client = create_blob_client(
    &descriptor,
    &config.connection_string,
    &config.source_container,
    &blob,
    &credential,
    "source",
  )?;

  let local = download_file(&descriptor, &client).await?;
  println!("{}", local.display());

  Ok(())
}

fn run_upload(
  config: StorageConfig,
  descriptor: FunctionDescriptor,
  date: NaiveDate,
) -> Result<()> {
  let results = read_results_from_stdin()?;

  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run_upload_async(config, descriptor, date, results).await })
}

async fn run_upload_async(
  config: StorageConfig,
  descriptor: FunctionDescriptor,
  date: NaiveDate,
  results: Value,
) -> Result<()> {
  let credential = Credential::from_source(&config.credential);
  let client = results_blob_client(
    &descriptor,
    &config.connection_string,
    &config.results_container,
    &credential,
    &date,
  )?;

  create_and_upload_results(&descriptor, results, &client).await?;
  println!("{}", client.blob_name());

  Ok(())
}

fn print_results(descriptor: &FunctionDescriptor, date: NaiveDate) -> Result<()> {
  let results = build_results_object(descriptor, read_results_from_stdin()?);
  let body = JsonEncoder::pretty()
    .encode_map(results.fields())
    .context("failed to encode results")?;

  println!("{}", derive_results_path(descriptor, &date));
  println!("{}", String::from_utf8_lossy(&body));
  Ok(())
}

fn read_results_from_stdin() -> Result<Value> {
  use std::io::IsTerminal;

  if io::stdin().is_terminal() {
    // No stdin pipe, use empty object
    return Ok(Value::from(serde_json::json!({})));
  }

  let mut input = String::new();
  io::stdin()
    .read_to_string(&mut input)
    .context("failed to read execution results from stdin")?;

  if input.trim().is_empty() {
    Ok(Value::from(serde_json::json!({})))
  } else {
    let json: serde_json::Value =
      serde_json::from_str(&input).context("failed to parse execution results JSON from stdin")?;
    Ok(Value::from(json))
  }
}
