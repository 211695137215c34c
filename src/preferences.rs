use eyre::Result;
use std::str::FromStr;

use crate::logging;
use crate::models::{FontSize, Theme};
use crate::storage::{FONT_SIZE_KEY, SharedStorage, Storage, THEME_KEY};

/// Theme and font size, stored as bare strings.
pub struct Preferences {
    storage: SharedStorage,
    theme: Theme,
    font_size: FontSize,
}

impl Preferences {
    pub fn load(storage: SharedStorage) -> Self {
        let theme = read_value(&storage, THEME_KEY).unwrap_or_default();
        let font_size = read_value(&storage, FONT_SIZE_KEY).unwrap_or_default();
        Self {
            storage,
            theme,
            font_size,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn font_size(&self) -> FontSize {
        self.font_size
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.theme = theme;
        self.storage.borrow_mut().set_item(THEME_KEY, theme.as_str())
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let theme = self.theme.toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }

    pub fn set_font_size(&mut self, font_size: FontSize) -> Result<()> {
        self.font_size = font_size;
        self.storage
            .borrow_mut()
            .set_item(FONT_SIZE_KEY, font_size.as_str())
    }
}

fn read_value<T>(storage: &SharedStorage, key: &str) -> Option<T>
where
    T: FromStr<Err = String>,
{
    let raw = match storage.borrow().get_item(key) {
        Ok(raw) => raw?,
        Err(err) => {
            logging::error(format!("Error loading {}: {}", key, err));
            return None;
        }
    };
    match raw.parse() {
        Ok(value) => Some(value),
        Err(err) => {
            logging::warn(err);
            None
        }
    }
}
