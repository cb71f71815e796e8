use color_eyre::Result;
use directories::ProjectDirs;
use lazy_static::lazy_static;
use registration::{DEFAULT_STORAGE_KEY, FormSettings, NotificationSettings};
use serde::Deserialize;
use std::fs;
use std::{env, path::PathBuf};
use tracing::debug;

pub const STORAGE_FILE: &str = "storage.json";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub config_dir: PathBuf,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UserCountConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for UserCountConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    user_count::DEFAULT_BASE_URL.to_string()
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default, flatten)]
    pub form: FormSettings,
    #[serde(default)]
    pub user_count: UserCountConfig,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

impl Config {
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::load_from(&get_data_dir(), &get_config_dir())
    }

    /// Layers `config.json5` then `config.toml` from `config_dir` over the
    /// built-in defaults. Both files are optional.
    pub fn load_from(
        data_dir: &std::path::Path,
        config_dir: &std::path::Path,
    ) -> Result<Self, config::ConfigError> {
        let defaults = NotificationSettings::default();
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?
            .set_default("storage_key", DEFAULT_STORAGE_KEY)?
            .set_default("require_all_fields", true)?
            .set_default("notification.auto_hide_ms", defaults.auto_hide_ms)?
            .set_default(
                "notification.ignore_background_dismiss",
                defaults.ignore_background_dismiss,
            )?
            .set_default("user_count.base_url", user_count::DEFAULT_BASE_URL)?;

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.toml", config::FileFormat::Toml),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            debug!(dir = %config_dir.display(), "no configuration file found, using defaults");
        }

        builder.build()?.try_deserialize()
    }

    pub fn storage_path(&self) -> PathBuf {
        self.config.data_dir.join(STORAGE_FILE)
    }
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = DATA_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("fr", "registration", env!("CARGO_PKG_NAME"))
}

pub fn ensure_data_and_config_dirs_exist() -> std::io::Result<()> {
    let data_dir = get_data_dir();
    let config_dir = get_config_dir();

    if !data_dir.exists() {
        fs::create_dir_all(&data_dir)?;
    }
    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(())
}
