use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings for one deduplication run.
///
/// Loaded from an optional `Dedup.toml` and `DEDUP_*` environment variables, then
/// merged with the command line by the binary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub target_dirs: Vec<String>,
    pub read_only_dirs: Vec<String>,
    /// Delete without asking.
    pub yes: bool,
    pub verbose: bool,
    pub remove_empty_dirs: bool,
    pub print_report: bool,
}

impl AppConfig {
    pub fn target_paths(&self) -> Vec<PathBuf> {
        self.target_dirs.iter().map(PathBuf::from).collect()
    }

    pub fn read_only_paths(&self) -> Vec<PathBuf> {
        self.read_only_dirs.iter().map(PathBuf::from).collect()
    }
}

/// Load configuration. An explicit `path` must exist; the default `Dedup.toml` is
/// optional.
pub fn load_configuration(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let file_source = match path {
        Some(path) => ConfigFile::from(path).required(true),
        None => ConfigFile::with_name("Dedup").required(false),
    };
    let builder = Config::builder()
        .add_source(file_source)
        .add_source(
            Environment::with_prefix("DEDUP")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("target_dirs")
                .with_list_parse_key("read_only_dirs"),
        )
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
