use crate::settings::{AccentColor, Language, Settings, ThemeMode};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Default)]
pub struct Args {
    pub path: PathBuf,
    pub accent_color: Option<AccentColor>,
    pub language: Option<Language>,
    pub mode: Option<ThemeMode>,
    pub cursor_trail: Option<bool>,
    pub site_background: Option<bool>,
}

impl Args {
    /// Overlay the requested changes; returns `true` if anything differs.
    fn apply(&self, settings: &mut Settings) -> bool {
        let before = *settings;

        if let Some(accent_color) = self.accent_color {
            settings.theme.accent_color = accent_color;
        }
        if let Some(language) = self.language {
            settings.language = language;
        }
        if let Some(mode) = self.mode {
            settings.theme.mode = mode;
        }
        if let Some(cursor_trail) = self.cursor_trail {
            settings.theme.cursor_trail = cursor_trail;
        }
        if let Some(site_background) = self.site_background {
            settings.theme.site_background = site_background;
        }

        before != *settings
    }
}

/// Print the current settings, saving any overrides first.
/// # Errors
/// Returns an error if the settings cannot be written or serialized.
pub fn execute(args: &Args) -> Result<()> {
    let mut settings = Settings::load(&args.path);

    if args.apply(&mut settings) {
        settings.save(&args.path)?;
        info!("Saved settings to {}", args.path.display());
    }

    let json = serde_json::to_string_pretty(&settings).context("Failed to serialize settings")?;
    println!("{json}");

    Ok(())
}
