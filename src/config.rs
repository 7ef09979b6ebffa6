use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_PREFIX: &str = "inbound/";
pub const DEFAULT_REGION: &str = "eu-west-2";

/// Optional on-disk configuration (`~/.config/smailer/config.toml`).
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    pub bucket: Option<String>,
    pub prefix: Option<String>,
    pub region: Option<String>,
    pub log_file: Option<String>,
}

/// Values given on the command line; they win over everything else.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub bucket: Option<String>,
    pub prefix: Option<String>,
    pub region: Option<String>,
    pub log_file: Option<PathBuf>,
}

/// Fully resolved startup settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bucket: Option<String>,
    pub prefix: String,
    pub region: String,
    pub log_file: PathBuf,
}

fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("no config dir available"))?
        .join("smailer"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

pub fn default_log_path() -> Result<PathBuf> {
    let p = config_dir()?;
    fs::create_dir_all(&p)?;
    Ok(p.join("smailer.log"))
}

/// Reads the config file; a missing file yields the empty config.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: Config =
        toml::from_str(&s).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}

/// Strips every trailing `/` and appends exactly one.
pub fn normalize_prefix(prefix: &str) -> String {
    format!("{}/", prefix.trim_end_matches('/'))
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

/// Precedence: CLI > environment > config file > defaults.
pub fn resolve<F>(cli: Overrides, env: F, file: Config) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    let bucket = non_empty(cli.bucket)
        .or_else(|| non_empty(env("BUCKET")))
        .or_else(|| non_empty(file.bucket));

    let prefix = non_empty(cli.prefix)
        .or_else(|| non_empty(env("PREFIX")))
        .or_else(|| non_empty(file.prefix))
        .unwrap_or_else(|| DEFAULT_PREFIX.to_string());

    let region = non_empty(cli.region)
        .or_else(|| non_empty(env("AWS_REGION")))
        .or_else(|| non_empty(env("AWS_DEFAULT_REGION")))
        .or_else(|| non_empty(env("REGION")))
        .or_else(|| non_empty(file.region))
        .unwrap_or_else(|| DEFAULT_REGION.to_string());

    let log_file = match cli.log_file {
        Some(p) => p,
        None => match non_empty(file.log_file) {
            Some(p) => PathBuf::from(p),
            None => default_log_path()?,
        },
    };

    Ok(Settings {
        bucket,
        prefix: normalize_prefix(&prefix),
        region,
        log_file,
    })
}
