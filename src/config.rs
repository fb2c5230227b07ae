//! Command-line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::api::http::DEFAULT_BASE_URL;
use crate::paginate::DEFAULT_PAGE_SIZE;

#[derive(Clone, Debug, Parser)]
#[command(name = "admin-console", version, about = "Manage admins, departments and roles from the terminal")]
pub struct Config {
    /// Base URL of the REST API.
    #[arg(long, env = "ADMIN_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Bearer token to store in the token file before starting.
    #[arg(long, env = "ADMIN_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// File holding the bearer token. Defaults to `<config-dir>/token`.
    #[arg(long, env = "ADMIN_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    /// Rows per page in every table.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Where tracing output goes; stdout belongs to the UI.
    #[arg(long, env = "ADMIN_LOG_FILE", default_value = "admin-console.log")]
    pub log_file: PathBuf,

    /// Directory for `theme.conf`, `keybinds.conf` and the token file.
    #[arg(long, env = "ADMIN_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            token_file: None,
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: 30,
            log_file: PathBuf::from("admin-console.log"),
            config_dir: None,
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// `--config-dir`, else `$XDG_CONFIG_HOME/admin-console`, else
    /// `$HOME/.config/admin-console`, else the working directory.
    pub fn config_dir(&self) -> PathBuf {
        if let Some(dir) = &self.config_dir {
            return dir.clone();
        }
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
            return PathBuf::from(xdg).join("admin-console");
        }
        if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
            return PathBuf::from(home).join(".config").join("admin-console");
        }
        PathBuf::from(".")
    }

    /// Path of a file inside [`Config::config_dir`], creating the directory if needed.
    pub fn config_path(&self, name: &str) -> PathBuf {
        let dir = self.config_dir();
        let _ = std::fs::create_dir_all(&dir);
        dir.join(name)
    }

    pub fn token_path(&self) -> PathBuf {
        self.token_file.clone().unwrap_or_else(|| self.config_path("token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let cfg = Config::parse_from([
            "admin-console",
            "--api-url",
            "http://api.test/v1",
            "--page-size",
            "10",
            "--config-dir",
            "/tmp/ac",
        ]);
        assert_eq!(cfg.api_url, "http://api.test/v1");
        assert_eq!(cfg.page_size, 10);
        assert_eq!(cfg.config_dir(), PathBuf::from("/tmp/ac"));
    }

    #[test]
    fn explicit_token_file_wins() {
        let cfg = Config { token_file: Some(PathBuf::from("/tmp/t")), ..Config::default() };
        assert_eq!(cfg.token_path(), PathBuf::from("/tmp/t"));
    }

    #[test]
    fn timeout_is_at_least_a_second() {
        let cfg = Config { timeout_secs: 0, ..Config::default() };
        assert_eq!(cfg.timeout(), Duration::from_secs(1));
    }
}
