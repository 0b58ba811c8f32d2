use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::WeekParity;

const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:54321";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_STATE_FILE: &str = "kelasku-state.json";

/// Resolved portal configuration: CLI arguments layered over an optional
/// YAML/JSON config file, with defaults underneath.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Base URL of the hosted data backend.
    pub backend_url: String,
    /// API key sent with every backend request. An empty key is allowed;
    /// the backend will refuse it and every read falls back to mock data.
    pub api_key: String,
    /// Upper bound on any single backend request.
    pub request_timeout_secs: u64,
    /// Where the login guard persists its attempt/lockout state.
    pub state_file: PathBuf,
    /// Week-parity template fetched by the CLI.
    pub week: WeekParity,
}

impl PortalConfig {
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let CliArgs {
            config,
            backend_url: cli_backend_url,
            api_key: cli_api_key,
            request_timeout_secs: cli_timeout,
            state_file: cli_state_file,
            week: cli_week,
        } = args;

        let file_config = if let Some(path) = config.as_ref() {
            load_config_file(path)?
        } else {
            PartialConfig::default()
        };

        let backend_url = cli_backend_url
            .or(file_config.backend_url)
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        anyhow::ensure!(
            backend_url.starts_with("http://") || backend_url.starts_with("https://"),
            "backend url {backend_url:?} must be http(s)"
        );

        let request_timeout_secs = cli_timeout
            .or(file_config.request_timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        anyhow::ensure!(
            request_timeout_secs >= 1,
            "request timeout must be at least one second"
        );

        Ok(Self {
            backend_url,
            api_key: cli_api_key.or(file_config.api_key).unwrap_or_default(),
            request_timeout_secs,
            state_file: cli_state_file
                .or(file_config.state_file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE)),
            week: cli_week.or(file_config.week).unwrap_or(WeekParity::Ganjil),
        })
    }
}

#[derive(Parser, Debug, Default, Clone)]
#[command(name = "kelasku", about = "Classroom portal data client", version)]
pub struct CliArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "Path to a configuration file (YAML or JSON)",
        global = true
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        env = "KELASKU_BACKEND_URL",
        value_name = "URL",
        help = "Base URL of the hosted data backend"
    )]
    pub backend_url: Option<String>,

    #[arg(
        long,
        env = "KELASKU_API_KEY",
        value_name = "KEY",
        help = "API key for the hosted backend"
    )]
    pub api_key: Option<String>,

    #[arg(
        long,
        env = "KELASKU_TIMEOUT_SECS",
        value_name = "SECS",
        help = "Per-request timeout in seconds",
        value_parser = clap::value_parser!(u64)
    )]
    pub request_timeout_secs: Option<u64>,

    #[arg(
        long,
        env = "KELASKU_STATE_FILE",
        value_name = "FILE",
        help = "Path of the persisted login-guard state file"
    )]
    pub state_file: Option<PathBuf>,

    #[arg(
        long,
        env = "KELASKU_WEEK",
        value_enum,
        value_name = "PARITY",
        help = "Week-parity schedule template to fetch (ganjil or genap)"
    )]
    pub week: Option<WeekParity>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    backend_url: Option<String>,
    api_key: Option<String>,
    request_timeout_secs: Option<u64>,
    state_file: Option<PathBuf>,
    week: Option<WeekParity>,
}

fn load_config_file(path: &Path) -> Result<PartialConfig> {
    if !path.exists() {
        anyhow::bail!("config file {:?} does not exist", path);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let ext = path
        .extension()
        .and_then(|os| os.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse YAML config {:?}", path))?,
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON config {:?}", path))?,
        other => anyhow::bail!("unsupported config extension: {other}"),
    };
    Ok(parsed)
}
