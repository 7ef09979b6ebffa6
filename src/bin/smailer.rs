use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use smailer::config::{Overrides, config_path, load_config, resolve};
use smailer::render::AnsiMarkdown;
use smailer::session::Session;
use smailer::store::s3::S3Store;
use smailer::terminal::run_tui;

#[derive(Parser)]
#[command(name = "smailer")]
#[command(about = "Read emails stored in an S3 bucket from the terminal", long_about = None)]
struct Cli {
    /// Bucket to open; without one the bucket list is shown
    #[arg(long)]
    bucket: Option<String>,

    /// Key prefix the emails live under (default "inbound/")
    #[arg(long)]
    prefix: Option<String>,

    #[arg(long)]
    region: Option<String>,

    /// Config file (default: <config dir>/smailer/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let path = match cli.config {
        Some(p) => p,
        None => config_path()?,
    };
    let file = load_config(&path).context("Configuration error")?;
    let settings = resolve(
        Overrides {
            bucket: cli.bucket,
            prefix: cli.prefix,
            region: cli.region,
            log_file: cli.log_file,
        },
        |key| std::env::var(key).ok(),
        file,
    )?;

    init_logging(&settings.log_file)?;
    log::info!(
        "starting: bucket={:?} prefix={} region={}",
        settings.bucket,
        settings.prefix,
        settings.region
    );

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    let store = runtime.block_on(S3Store::connect(&settings.region));
    let session = Session::new(settings.bucket, settings.prefix, Arc::new(AnsiMarkdown));

    let result = run_tui(session, Arc::new(store), runtime.handle().clone());
    // in-flight requests are abandoned, not awaited
    runtime.shutdown_background();
    result
}

/// The terminal belongs to the UI, so log records go to a file.
fn init_logging(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(())
}
