//! Configuration for the server and client binaries
//!
//! Layers, later wins: defaults, TOML file, environment, command line.
//! File path comes from `--config` or `SIMP_CONFIG`.
//! Env overrides: SIMP_HOST, SIMP_PORT.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::AppError;

/// Default bind / server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind / server port, shared by server and client
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml(text: &str) -> Result<Self, AppError> {
        Ok(toml::from_str(text)?)
    }

    /// Apply SIMP_HOST / SIMP_PORT from `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SIMP_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("SIMP_PORT") {
            self.port = parse_port(&port)?;
        }
        Ok(())
    }

    /// Apply `--host` / `--port` flags
    pub fn apply_args(&mut self, args: &CliArgs) {
        if let Some(host) = &args.host {
            self.host = host.clone();
        }
        if let Some(port) = args.port {
            self.port = port;
        }
    }

    /// `host:port` for display and binding
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parsed command-line flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
    pub version: bool,
}

impl CliArgs {
    /// Parse flags (program name already skipped)
    pub fn parse<I>(args: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = CliArgs::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--host" => parsed.host = Some(value_for(&arg, args.next())?),
                "--port" => parsed.port = Some(parse_port(&value_for(&arg, args.next())?)?),
                "--config" => parsed.config = Some(PathBuf::from(value_for(&arg, args.next())?)),
                "--version" | "-V" => parsed.version = true,
                other => {
                    return Err(AppError::Config(format!("unknown argument '{}'", other)));
                }
            }
        }

        Ok(parsed)
    }
}

fn value_for(flag: &str, value: Option<String>) -> Result<String, AppError> {
    value.ok_or_else(|| AppError::Config(format!("{} requires a value", flag)))
}

fn parse_port(value: &str) -> Result<u16, AppError> {
    value
        .parse()
        .map_err(|_| AppError::Config(format!("invalid port '{}'", value)))
}

/// Load config: merge defaults, config file (if any), env vars, then flags
pub fn load(args: &CliArgs) -> Result<Config, AppError> {
    let path = args
        .config
        .clone()
        .or_else(|| std::env::var_os("SIMP_CONFIG").map(PathBuf::from));

    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(&path).map_err(|e| {
                AppError::Config(format!("cannot read {}: {}", path.display(), e))
            })?;
            Config::from_toml(&text)?
        }
        None => Config::default(),
    };

    config.apply_env(|key| std::env::var(key).ok())?;
    config.apply_args(args);
    Ok(config)
}
