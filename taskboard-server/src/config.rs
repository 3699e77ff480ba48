//! Server settings: where to listen and which data file holds the board.
//!
//! Each setting is taken from the first layer that provides it: command
//! line, environment (`TASKBOARD_ADDR`, `TASKBOARD_DATA_FILE`,
//! `TASKBOARD_LOG`), the `[server]` table of a TOML file, then built-in
//! defaults. The TOML file is `--config` when given (and must exist), else
//! `~/.config/taskboard-server/config.toml` if present.
//!
//! A relative `data_file` written in a TOML file is resolved against that
//! file's directory, so a config can sit next to its board.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Listen address used when no layer sets one.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// Data file used when no layer sets one, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "tasks.json";

/// Reasons the server settings could not be assembled.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML file exists (or was named) but could not be read.
    #[error("cannot read {path}: {source}")]
    ReadFile {
        /// File that was read.
        path: PathBuf,
        /// I/O failure.
        source: std::io::Error,
    },

    /// The TOML file is malformed.
    #[error("invalid server config: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// The listen address is not `host:port` with a numeric host.
    #[error("invalid bind address {addr:?}: {source}")]
    BindAddr {
        /// Address as written.
        addr: String,
        /// Parse failure.
        source: std::net::AddrParseError,
    },
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct TomlLayer {
    server: TomlServer,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct TomlServer {
    bind_addr: Option<String>,
    data_file: Option<PathBuf>,
}

/// A parsed TOML layer plus the directory it came from.
#[derive(Debug, Default)]
struct FileLayer {
    settings: TomlServer,
    dir: Option<PathBuf>,
}

impl FileLayer {
    fn parse(text: &str, dir: Option<PathBuf>) -> Result<Self, ConfigError> {
        let layer: TomlLayer = toml::from_str(text)?;
        Ok(Self {
            settings: layer.server,
            dir,
        })
    }

    fn data_file(&self) -> Option<PathBuf> {
        let file = self.settings.data_file.as_ref()?;
        Some(match &self.dir {
            Some(dir) if file.is_relative() => dir.join(file),
            _ => file.clone(),
        })
    }
}

/// Command-line flags of `taskboard-server`.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "JSON-file backed task API for TaskBoard")]
pub struct ServerCliArgs {
    /// Listen address, e.g. `127.0.0.1:8080`.
    #[arg(short, long, env = "TASKBOARD_ADDR")]
    pub bind: Option<String>,

    /// TOML settings file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JSON file holding the task list; created with sample tasks if missing.
    #[arg(long, env = "TASKBOARD_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Tracing filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info", env = "TASKBOARD_LOG")]
    pub log_level: String,
}

/// Settings the server runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address.
    pub bind_addr: SocketAddr,
    /// Task list data file.
    pub data_file: PathBuf,
    /// Tracing filter.
    pub log_level: String,
}

impl ServerConfig {
    /// Assembles settings from `cli` and the TOML layer it points at.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a named or present TOML file cannot be
    /// read or parsed, or if the resulting bind address is invalid.
    pub fn load(cli: &ServerCliArgs) -> Result<Self, ConfigError> {
        let layer = read_layer(cli.config.as_deref())?;
        Self::merge(cli, &layer)
    }

    fn merge(cli: &ServerCliArgs, layer: &FileLayer) -> Result<Self, ConfigError> {
        let addr = cli
            .bind
            .as_deref()
            .or(layer.settings.bind_addr.as_deref())
            .unwrap_or(DEFAULT_BIND_ADDR);
        let bind_addr = addr.parse().map_err(|source| ConfigError::BindAddr {
            addr: addr.to_string(),
            source,
        })?;
        let data_file = cli
            .data_file
            .clone()
            .or_else(|| layer.data_file())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        Ok(Self {
            bind_addr,
            data_file,
            log_level: cli.log_level.clone(),
        })
    }
}

fn read_layer(explicit: Option<&Path>) -> Result<FileLayer, ConfigError> {
    let (path, required) = match explicit {
        Some(p) => (p.to_path_buf(), true),
        None => match dirs::config_dir() {
            Some(dir) => (dir.join("taskboard-server").join("config.toml"), false),
            None => return Ok(FileLayer::default()),
        },
    };

    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(FileLayer::default());
        }
        Err(source) => return Err(ConfigError::ReadFile { path, source }),
    };
    tracing::debug!(path = %path.display(), "read server config");
    FileLayer::parse(&text, path.parent().map(Path::to_path_buf))
}
