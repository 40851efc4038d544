//! Command-line/environment configuration and derived settings.
//!
//! Environment lookups happen here, through `clap`, and nowhere else. The
//! resolved [`ApiConfig`] is built once and handed to the API client.

use std::path::{Path, PathBuf};

use clap::Parser;

/// Backend host name used when neither a host nor an endpoint is configured.
pub const DEFAULT_ENDPOINT: &str = "api";
/// Port appended to the endpoint name.
pub const DEFAULT_PORT: u16 = 8010;
/// Scheme prefix for every request. The backend is reached over plain HTTP.
pub const SCHEME_PREFIX: &str = "http://";

/// Terminal front end for a REST `users` service.
#[derive(Debug, Clone, Parser)]
#[command(name = "userdesk", version, about)]
pub struct Cli {
    /// Full backend host (`host[:port]`), used verbatim.
    #[arg(long, env = "USERDESK_API_HOST")]
    pub host: Option<String>,

    /// Backend host name; the port 8010 is appended.
    #[arg(long, env = "USERDESK_API_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Directory holding theme.conf and keybinds.conf.
    #[arg(long, env = "USERDESK_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Write logs to this file. Logging is off when unset.
    #[arg(long, env = "USERDESK_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::resolve(self.host.as_deref(), self.endpoint.as_deref())
    }

    pub fn config_paths(&self) -> ConfigPaths {
        match &self.config_dir {
            Some(dir) => ConfigPaths::new(dir),
            None => ConfigPaths::new(default_config_dir(
                std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
                std::env::var_os("HOME").map(PathBuf::from),
            )),
        }
    }
}

/// Where the backend lives. Fixed after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    host: String,
}

impl ApiConfig {
    /// Use `host` as given, without appending a port.
    pub fn with_host(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    /// An explicit host wins; otherwise `<endpoint or "api">:8010`.
    pub fn resolve(host: Option<&str>, endpoint: Option<&str>) -> Self {
        match host.filter(|h| !h.is_empty()) {
            Some(h) => Self::with_host(h),
            None => {
                let name = endpoint.filter(|e| !e.is_empty()).unwrap_or(DEFAULT_ENDPOINT);
                Self::with_host(format!("{name}:{DEFAULT_PORT}"))
            }
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// `http://` followed by the host.
    pub fn base_url(&self) -> String {
        format!("{SCHEME_PREFIX}{}", self.host)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::resolve(None, None)
    }
}

/// Locations of the user-editable configuration files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub dir: PathBuf,
}

impl ConfigPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn theme(&self) -> PathBuf {
        self.dir.join("theme.conf")
    }

    pub fn keybinds(&self) -> PathBuf {
        self.dir.join("keybinds.conf")
    }

    /// Create the directory if needed. Failure is not fatal: files are then
    /// simply not written and defaults stay in memory.
    pub fn ensure_dir(&self) {
        if self.dir.as_os_str().is_empty() || self.dir.exists() {
            return;
        }
        if let Err(err) = std::fs::create_dir_all(&self.dir) {
            tracing::warn!(dir = %self.dir.display(), error = %err, "cannot create config dir");
        }
    }
}

/// `$XDG_CONFIG_HOME/userdesk`, then `$HOME/.config/userdesk`, then the
/// working directory.
pub fn default_config_dir(xdg_config_home: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    if let Some(xdg) = xdg_config_home.filter(|p| !p.as_os_str().is_empty()) {
        return xdg.join("userdesk");
    }
    if let Some(home) = home.filter(|p| !p.as_os_str().is_empty()) {
        return home.join(".config").join("userdesk");
    }
    Path::new(".").to_path_buf()
}
