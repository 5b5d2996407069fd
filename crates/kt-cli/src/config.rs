//! Configuration loading and management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use kt_capture::CaptureConfig;
use kt_db::StoreOptions;
use kt_web::{ECHARTS_CDN, ReportFilter};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,

    /// Address the reporting server listens on.
    pub bind: String,

    /// How long a store operation waits on a locked database.
    pub store_timeout_ms: u64,

    /// Upper bound on one HTTP request.
    pub request_timeout_secs: u64,

    /// URL of the ECharts script the chart pages load.
    pub chart_script: String,

    /// What the charts and `kt report` count by default.
    pub report: ReportFilter,

    pub capture: CaptureSection,
}

/// The `[capture]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSection {
    pub keyboard: bool,
    pub mouse: bool,
    /// Device nodes to read. Empty means discover automatically.
    pub devices: Vec<PathBuf>,
}

impl Default for CaptureSection {
    fn default() -> Self {
        let defaults = CaptureConfig::default();
        Self {
            keyboard: defaults.keyboard,
            mouse: defaults.mouse,
            devices: defaults.devices,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("keytally.db"),
            bind: "127.0.0.1:5000".to_string(),
            store_timeout_ms: 5000,
            request_timeout_secs: 10,
            chart_script: ECHARTS_CDN.to_string(),
            report: ReportFilter::default(),
            capture: CaptureSection::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // KT_REPORT__KIND=mouse sets report.kind
        figment = figment.merge(Env::prefixed("KT_").split("__"));

        figment.extract()
    }

    pub const fn store_options(&self) -> StoreOptions {
        StoreOptions {
            busy_timeout: Duration::from_millis(self.store_timeout_ms),
        }
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            keyboard: self.capture.keyboard,
            mouse: self.capture.mouse,
            devices: self.capture.devices.clone(),
        }
    }
}

/// Returns the platform-specific config directory for keytally.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("keytally"))
}

/// Returns the platform-specific data directory for keytally.
///
/// On Linux: `~/.local/share/keytally`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("keytally"))
}
