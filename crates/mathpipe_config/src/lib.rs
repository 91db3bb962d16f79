use directories::{BaseDirs, ProjectDirs, UserDirs};
use once_cell::sync::{Lazy, OnceCell};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

static CONFIG: OnceCell<Config> = OnceCell::new();

static PROJECT_DIRS: Lazy<Option<ProjectDirs>> =
    Lazy::new(|| ProjectDirs::from("org", "mathpipe", "mathpipe"));

pub struct LoadedConfig {
    pub config: Config,
    pub file_path: Option<PathBuf>,
    pub maybe_error: Option<toml::de::Error>,
}

/// Default location of the config file.
///
/// Linux: ~/.config/mathpipe/config.toml
/// macOS: ~/Library/Application\ Support/org.mathpipe.mathpipe/config.toml
/// Windows: ~\AppData\Roaming\mathpipe\mathpipe\config\config.toml
pub fn default_config_file() -> Option<PathBuf> {
    PROJECT_DIRS
        .as_ref()
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load the config from `specified_config_file` or the default location.
///
/// A missing file yields the default config. A malformed file also yields the
/// default config, with the parse error returned alongside.
pub fn load_config(specified_config_file: Option<PathBuf>) -> LoadedConfig {
    let file_path = specified_config_file.or_else(default_config_file);

    let mut maybe_error = None;
    let config = file_path
        .as_ref()
        .and_then(|path| std::fs::read_to_string(path).ok())
        .and_then(|contents| {
            toml::from_str(&contents)
                .map_err(|err| {
                    maybe_error.replace(err);
                })
                .ok()
        })
        .unwrap_or_default();

    LoadedConfig {
        config,
        file_path,
        maybe_error,
    }
}

/// Initialize the global [`Config`] once, later calls return the first one.
pub fn load_config_on_startup(
    specified_config_file: Option<PathBuf>,
) -> (&'static Config, Option<toml::de::Error>) {
    let LoadedConfig {
        config: loaded_config,
        file_path,
        maybe_error,
    } = load_config(specified_config_file);

    tracing::debug!(?file_path, "Loaded config");

    let config = CONFIG.get_or_init(|| loaded_config);

    (config, maybe_error)
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct LogConfig {
    /// Specify the log file path.
    ///
    /// This path must be an absolute path.
    pub log_file: Option<String>,

    /// Specify the max log level.
    pub max_level: String,

    /// Specify the log target to enable more detailed logging.
    ///
    /// ```toml
    /// [log]
    /// log-target = "mathpipe_core::mixed=trace"
    /// ```
    pub log_target: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            max_level: "warn".into(),
            log_target: "".into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Whether to render math visually.
    ///
    /// When disabled every math span is shown as escaped source.
    pub visual_delegate: bool,

    /// CSS class of the container wrapping block math.
    pub block_class: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            visual_delegate: true,
            block_class: "math-block".into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Directory exported files are written to.
    ///
    /// A leading `~` is expanded to the home directory. Defaults to the
    /// download directory of the user.
    pub output_dir: Option<String>,

    /// Body font size in points.
    pub font_size: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            font_size: 12.0,
        }
    }
}

impl ExportConfig {
    /// Resolved output directory.
    pub fn output_dir(&self) -> PathBuf {
        match &self.output_dir {
            Some(dir) => expand_home(dir),
            None => UserDirs::new()
                .and_then(|dirs| dirs.download_dir().map(|d| d.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    let home = || BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
    if path == "~" {
        if let Some(home) = home() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Log configuration.
    pub log: LogConfig,

    /// Rendering configuration.
    pub render: RenderConfig,

    /// Export configuration.
    pub export: ExportConfig,
}
