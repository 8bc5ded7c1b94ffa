//! Configuration file support for jmx-collector.
//!
//! Provides YAML-based configuration through `jmx-collector.config.yml`
//! files, and the merged settings the binary runs with (CLI flag over
//! config file over default).

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::Level;

use crate::adapters::outbound::nailgun::{HelperAddress, HelperLaunchConfig, NailgunClient};
use crate::application::dto::CollectorOptions;
use crate::collection::services::CatalogSources;
use crate::shared::logging::parse_log_level;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "jmx-collector.config.yml";

const DEFAULT_WORKERS: usize = 5;
const DEFAULT_LOG_LEVEL: &str = "INFO";
const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_SOCKET: &str = "run/psmetric.socket";
const DEFAULT_BLACKOUT_FILE: &str = "blackouts.txt";
const DEFAULT_EXCLUSION_FILE: &str = "exclusions.txt";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 45;
const DEFAULT_STARTUP_TIMEOUT_SECS: u64 = 30;

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub concurrent_workers: Option<usize>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub helper_address: Option<String>,
    pub java_home: Option<PathBuf>,
    pub helper_lib_dir: Option<PathBuf>,
    pub web_metrics: Option<PathBuf>,
    pub app_metrics: Option<PathBuf>,
    pub prc_metrics: Option<PathBuf>,
    pub inventory_file: Option<PathBuf>,
    pub blackout_file: Option<PathBuf>,
    pub exclusion_file: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
    pub startup_timeout_secs: Option<u64>,
    pub collection_timeout_secs: Option<u64>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if config.concurrent_workers == Some(0) {
        bail!(
            "Invalid config: concurrent_workers must be at least 1.\n\n\
             💡 Hint: Remove the key to use the default of {} workers.",
            DEFAULT_WORKERS
        );
    }
    if let Some(address) = &config.helper_address {
        if address.trim().is_empty() {
            bail!(
                "Invalid config: helper_address must not be empty.\n\n\
                 💡 Hint: Use 'local:<socket path>' or '<host>:<port>'."
            );
        }
    }
    for (key, value) in [
        ("request_timeout_secs", config.request_timeout_secs),
        ("startup_timeout_secs", config.startup_timeout_secs),
        ("collection_timeout_secs", config.collection_timeout_secs),
    ] {
        if value == Some(0) {
            bail!("Invalid config: {} must be greater than 0.", key);
        }
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}

/// Values given on the command line, which win over the config file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub workers: Option<usize>,
    pub log_level: Option<String>,
}

/// Fully merged and defaulted settings for one run
#[derive(Debug, Clone)]
pub struct CollectorSettings {
    pub workers: usize,
    pub log_level: Level,
    pub log_dir: PathBuf,
    pub helper_address: HelperAddress,
    pub java_home: Option<PathBuf>,
    pub helper_lib_dir: PathBuf,
    pub catalog: CatalogSources,
    pub inventory_file: PathBuf,
    pub blackout_file: PathBuf,
    pub exclusion_file: PathBuf,
    pub request_timeout: Duration,
    pub startup_timeout: Duration,
    pub collection_timeout: Option<Duration>,
    pub working_dir: PathBuf,
}

impl CollectorSettings {
    /// Merge the config file with CLI overrides. Relative paths are taken
    /// from `working_dir`. `JAVA_HOME` is used when `java_home` is not set.
    pub fn resolve(
        file: ConfigFile,
        overrides: &CliOverrides,
        working_dir: &Path,
    ) -> Result<Self> {
        let workers = overrides
            .workers
            .or(file.concurrent_workers)
            .unwrap_or(DEFAULT_WORKERS);
        if workers == 0 {
            bail!(
                "Invalid worker count: 0.\n\n💡 Hint: At least one concurrent worker is required."
            );
        }

        let level_name = overrides
            .log_level
            .clone()
            .or(file.log_level)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let log_level = parse_log_level(&level_name)?;

        let helper_address = match file.helper_address {
            Some(address) => address.parse::<HelperAddress>().map_err(anyhow::Error::msg)?,
            None => HelperAddress::Local(working_dir.join(DEFAULT_SOCKET)),
        };

        let resolve = |path: PathBuf| {
            if path.is_absolute() {
                path
            } else {
                working_dir.join(path)
            }
        };
        let required = |value: Option<PathBuf>, key: &str| -> Result<PathBuf> {
            match value {
                Some(path) => Ok(resolve(path)),
                None => bail!(
                    "Missing required config field '{}'.\n\n💡 Hint: Add it to {}.",
                    key,
                    CONFIG_FILENAME
                ),
            }
        };

        let catalog = CatalogSources {
            web: required(file.web_metrics, "web_metrics")?,
            app: required(file.app_metrics, "app_metrics")?,
            prc: required(file.prc_metrics, "prc_metrics")?,
        };
        let inventory_file = required(file.inventory_file, "inventory_file")?;

        let java_home = file
            .java_home
            .or_else(|| std::env::var_os("JAVA_HOME").map(PathBuf::from))
            .map(resolve);

        Ok(Self {
            workers,
            log_level,
            log_dir: resolve(file.log_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR))),
            helper_address,
            java_home,
            helper_lib_dir: resolve(file.helper_lib_dir.unwrap_or_else(|| PathBuf::from("."))),
            catalog,
            inventory_file,
            blackout_file: resolve(
                file.blackout_file
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_BLACKOUT_FILE)),
            ),
            exclusion_file: resolve(
                file.exclusion_file
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_EXCLUSION_FILE)),
            ),
            request_timeout: Duration::from_secs(
                file.request_timeout_secs
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            startup_timeout: Duration::from_secs(
                file.startup_timeout_secs
                    .unwrap_or(DEFAULT_STARTUP_TIMEOUT_SECS),
            ),
            collection_timeout: file.collection_timeout_secs.map(Duration::from_secs),
            working_dir: working_dir.to_path_buf(),
        })
    }

    pub fn collector_options(&self) -> CollectorOptions {
        CollectorOptions {
            catalog: self.catalog.clone(),
            inventory_file: self.inventory_file.clone(),
            blackout_file: self.blackout_file.clone(),
            exclusion_file: self.exclusion_file.clone(),
            workers: self.workers,
            collection_timeout: self.collection_timeout,
        }
    }

    /// Launch parameters for the helper JVM. Needs a Java home.
    pub fn launch_config(&self) -> Result<HelperLaunchConfig> {
        let Some(java_home) = self.java_home.clone() else {
            bail!(
                "No Java home configured.\n\n💡 Hint: Set 'java_home' in {} or export JAVA_HOME.",
                CONFIG_FILENAME
            );
        };
        Ok(HelperLaunchConfig {
            java_home,
            lib_dir: self.helper_lib_dir.clone(),
            address: self.helper_address.clone(),
            log_level: self.log_level,
            log_dir: self.log_dir.clone(),
            working_dir: self.working_dir.clone(),
            startup_timeout: self.startup_timeout,
            reap_orphans: true,
        })
    }

    /// Request client for bean queries and diagnostics
    pub fn client(&self) -> NailgunClient {
        NailgunClient::new(self.helper_address.clone())
            .with_request_timeout(self.request_timeout)
            .with_working_dir(self.working_dir.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const FULL_CONFIG: &str = r#"
concurrent_workers: 8
log_level: WARNING
log_dir: /var/log/psmetric
helper_address: "127.0.0.1:2113"
java_home: /opt/java
helper_lib_dir: lib
web_metrics: conf/web.yml
app_metrics: conf/app.yml
prc_metrics: /etc/psmetric/prc.yml
inventory_file: data/domains.txt
blackout_file: data/blackouts.txt
exclusion_file: data/exclude.csv
request_timeout_secs: 20
startup_timeout_secs: 10
collection_timeout_secs: 300
"#;

    const MINIMAL_CONFIG: &str = r#"
web_metrics: web.yml
app_metrics: app.yml
prc_metrics: prc.yml
inventory_file: domains.txt
"#;

    fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_valid_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "config.yml", FULL_CONFIG);

        let config = load_config_from_path(&path).unwrap();
        assert_eq!(config.concurrent_workers, Some(8));
        assert_eq!(config.log_level.as_deref(), Some("WARNING"));
        assert_eq!(config.helper_address.as_deref(), Some("127.0.0.1:2113"));
        assert_eq!(config.collection_timeout_secs, Some(300));
        assert!(config.unknown_fields.is_empty());
    }

    #[test]
    fn test_discover_config_found() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, CONFIG_FILENAME, MINIMAL_CONFIG);

        let config = discover_config(dir.path()).unwrap();
        assert!(config.is_some());
        assert_eq!(
            config.unwrap().inventory_file,
            Some(PathBuf::from("domains.txt"))
        );
    }

    #[test]
    fn test_discover_config_not_found() {
        let dir = TempDir::new().unwrap();
        assert!(discover_config(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config_from_path(Path::new("/nonexistent/config.yml")).unwrap_err();
        assert!(format!("{}", err).contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "bad.yml", "invalid: yaml: [[[broken");

        let err = load_config_from_path(&path).unwrap_err();
        assert!(format!("{}", err).contains("Failed to parse config file"));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "config.yml", "concurrent_workers: 0\n");

        let err = load_config_from_path(&path).unwrap_err();
        assert!(format!("{}", err).contains("concurrent_workers must be at least 1"));
    }

    #[test]
    fn test_empty_helper_address_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "config.yml", "helper_address: \"  \"\n");

        let err = load_config_from_path(&path).unwrap_err();
        assert!(format!("{}", err).contains("helper_address must not be empty"));
    }

    #[test]
    fn test_unknown_fields_warning() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "config.yml",
            "concurrent_workers: 2\nnailgun_port: 2113\nsplunk_index: ps\n",
        );

        let config = load_config_from_path(&path).unwrap();
        assert_eq!(config.unknown_fields.len(), 2);
        assert!(config.unknown_fields.contains_key("nailgun_port"));
    }

    #[test]
    fn test_resolve_defaults() {
        let config: ConfigFile = serde_yaml_ng::from_str(MINIMAL_CONFIG).unwrap();
        let cwd = Path::new("/srv/psmetric");

        let settings = CollectorSettings::resolve(config, &CliOverrides::default(), cwd).unwrap();

        assert_eq!(settings.workers, 5);
        assert_eq!(settings.log_level, Level::INFO);
        assert_eq!(settings.log_dir, cwd.join("logs"));
        assert_eq!(
            settings.helper_address,
            HelperAddress::Local(cwd.join("run/psmetric.socket"))
        );
        assert_eq!(settings.catalog.web, cwd.join("web.yml"));
        assert_eq!(settings.blackout_file, cwd.join("blackouts.txt"));
        assert_eq!(settings.request_timeout, Duration::from_secs(45));
        assert_eq!(settings.startup_timeout, Duration::from_secs(30));
        assert_eq!(settings.collection_timeout, None);
    }

    #[test]
    fn test_resolve_full_config_and_overrides() {
        let config: ConfigFile = serde_yaml_ng::from_str(FULL_CONFIG).unwrap();
        let overrides = CliOverrides {
            workers: Some(2),
            log_level: Some("ALL".to_string()),
        };
        let cwd = Path::new("/srv/psmetric");

        let settings = CollectorSettings::resolve(config, &overrides, cwd).unwrap();

        assert_eq!(settings.workers, 2);
        assert_eq!(settings.log_level, Level::DEBUG);
        assert_eq!(settings.log_dir, PathBuf::from("/var/log/psmetric"));
        assert_eq!(
            settings.helper_address,
            HelperAddress::Tcp("127.0.0.1:2113".to_string())
        );
        assert_eq!(settings.catalog.prc, PathBuf::from("/etc/psmetric/prc.yml"));
        assert_eq!(settings.inventory_file, cwd.join("data/domains.txt"));
        assert_eq!(settings.collection_timeout, Some(Duration::from_secs(300)));

        let launch = settings.launch_config().unwrap();
        assert_eq!(launch.java_home, PathBuf::from("/opt/java"));
        assert_eq!(launch.lib_dir, cwd.join("lib"));
        assert_eq!(launch.startup_timeout, Duration::from_secs(10));

        let options = settings.collector_options();
        assert_eq!(options.workers, 2);
        assert_eq!(options.exclusion_file, cwd.join("data/exclude.csv"));
    }

    #[test]
    fn test_resolve_missing_required_path() {
        let config: ConfigFile = serde_yaml_ng::from_str("web_metrics: web.yml\n").unwrap();
        let err = CollectorSettings::resolve(config, &CliOverrides::default(), Path::new("/tmp"))
            .unwrap_err();
        assert!(format!("{}", err).contains("app_metrics"));
    }

    #[test]
    fn test_resolve_rejects_bad_level_and_zero_override() {
        let config: ConfigFile = serde_yaml_ng::from_str(MINIMAL_CONFIG).unwrap();
        let overrides = CliOverrides {
            workers: None,
            log_level: Some("LOUD".to_string()),
        };
        assert!(CollectorSettings::resolve(config, &overrides, Path::new("/tmp")).is_err());

        let config: ConfigFile = serde_yaml_ng::from_str(MINIMAL_CONFIG).unwrap();
        let overrides = CliOverrides {
            workers: Some(0),
            log_level: None,
        };
        assert!(CollectorSettings::resolve(config, &overrides, Path::new("/tmp")).is_err());
    }
}
