//! Light/dark colour schemes and the persisted preference that picks one.

use std::env;
use std::fmt;
use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown theme {0:?}, expected \"light\" or \"dark\"")]
pub struct ParseThemeError(String);

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Guess the terminal background from `COLORFGBG` ("fg;bg"). Backgrounds
    /// 7 and 15 are the light greys/white of the 16-colour palette.
    pub fn detect() -> Self {
        env::var("COLORFGBG")
            .ok()
            .and_then(|value| Self::from_colorfgbg(&value))
            .unwrap_or_default()
    }

    fn from_colorfgbg(value: &str) -> Option<Self> {
        let bg = value.rsplit(';').next()?.trim().parse::<u8>().ok()?;
        Some(if matches!(bg, 7 | 15) {
            Theme::Light
        } else {
            Theme::Dark
        })
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette {
                base: Style::default().fg(Color::Black).bg(Color::White),
                muted: Style::default().fg(Color::DarkGray),
                accent: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
                highlight: Style::default().fg(Color::White).bg(Color::Blue),
                key: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            },
            Theme::Dark => Palette {
                base: Style::default().fg(Color::White).bg(Color::Reset),
                muted: Style::default().fg(Color::Gray),
                accent: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                highlight: Style::default().fg(Color::Yellow),
                key: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ParseThemeError(other.to_string())),
        }
    }
}

/// Styles the renderer pulls from for the active theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub base: Style,
    pub muted: Style,
    pub accent: Style,
    pub highlight: Style,
    pub key: Style,
}
