use anyhow::Result;
use log::warn;

use crate::theme::Theme;

use super::storage::Storage;

/// Storage key holding the theme preference string.
pub const THEME_KEY: &str = "theme";

/// Read the saved theme. Unknown values are ignored as if nothing was saved.
pub fn load_theme(storage: &impl Storage) -> Result<Option<Theme>> {
    let Some(raw) = storage.get_item(THEME_KEY)? else {
        return Ok(None);
    };

    let theme = raw.parse::<Theme>().ok();
    if theme.is_none() {
        warn!("ignoring unknown theme preference {raw:?}");
    }
    Ok(theme)
}

pub fn save_theme(storage: &mut impl Storage, theme: Theme) -> Result<()> {
    storage.set_item(THEME_KEY, theme.as_str())
}
