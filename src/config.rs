use crate::logging;
use crate::settings::{Keymap, Settings};
use eyre::Result;
use serde::de::DeserializeOwned;
use std::{fs, path::PathBuf};

pub const CONFIG_FILE: &str = "configuration.json";
const APP_DIR: &str = "shengjing";

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: Settings,
    pub keymap: Keymap,
    filepath: PathBuf,
}

impl Config {
    pub fn new() -> Result<Self> {
        let prefix = get_app_data_prefix()?;
        let filepath = prefix.join(CONFIG_FILE);

        if filepath.exists() {
            return Self::load_from(filepath);
        }

        // Save initial config if it doesn't exist
        let config = Self {
            settings: Settings::default(),
            keymap: Keymap::default(),
            filepath,
        };
        config.save()?;
        logging::info(format!("Wrote default configuration to {}", config.filepath.display()));
        Ok(config)
    }

    /// Get the configuration file path
    pub fn filepath(&self) -> &PathBuf {
        &self.filepath
    }

    /// Save current configuration to file
    pub fn save(&self) -> Result<()> {
        let config_json = serde_json::json!({
            "Setting": self.settings,
            "Keymap": self.keymap,
        });

        let config_str = serde_json::to_string_pretty(&config_json)?;

        if let Some(parent) = self.filepath.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.filepath, config_str)?;
        Ok(())
    }

    /// Load configuration from a custom path. Each section that is missing
    /// or unreadable falls back to its defaults on its own.
    pub fn load_from(filepath: PathBuf) -> Result<Self> {
        let mut settings = Settings::default();
        let mut keymap = Keymap::default();

        if filepath.exists() {
            let config_str = fs::read_to_string(&filepath)?;
            match serde_json::from_str::<serde_json::Value>(&config_str) {
                Ok(user_config) => {
                    if let Some(user_settings) = section::<Settings>(&user_config, "Setting") {
                        settings.merge(user_settings);
                    }
                    if let Some(user_keymap) = section::<Keymap>(&user_config, "Keymap") {
                        keymap.merge(user_keymap);
                    }
                }
                Err(err) => logging::warn(format!(
                    "Ignoring unreadable {}: {}",
                    filepath.display(),
                    err
                )),
            }
        }

        Ok(Self {
            settings,
            keymap,
            filepath,
        })
    }
}

fn section<T: DeserializeOwned>(config: &serde_json::Value, name: &str) -> Option<T> {
    let value = config.get(name)?;
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            logging::warn(format!("Invalid \"{}\" section, using defaults: {}", name, err));
            None
        }
    }
}

pub fn get_app_data_prefix() -> Result<PathBuf> {
    if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
        let path = PathBuf::from(config_home).join(APP_DIR);
        return Ok(path);
    } else if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home.clone()).join(".config").join(APP_DIR);
        if path.exists() {
            return Ok(path);
        } else {
            return Ok(PathBuf::from(home).join(format!(".{}", APP_DIR)));
        }
    } else if let Some(user_profile) = std::env::var_os("USERPROFILE") {
        return Ok(PathBuf::from(user_profile).join(format!(".{}", APP_DIR)));
    }

    Err(eyre::eyre!(
        "Could not determine application data directory"
    ))
}
